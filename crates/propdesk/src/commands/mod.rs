//! Command dispatch: bridges CLI args -> `Desk` calls -> output formatting.

pub mod auth;
pub mod board;
pub mod chains;
pub mod config_cmd;
pub mod dashboard;
pub mod history;
pub mod properties;
pub mod report;
pub mod requests;
pub mod rooms;
pub mod settings;
pub mod tasks;
pub mod tickets;
pub mod users;
pub mod util;

use propdesk_core::Desk;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    desk: &Desk,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(desk, args, resolved, global).await,
        Command::Logout => auth::logout(desk, global),
        Command::Whoami => auth::whoami(desk, global).await,
        Command::Register(args) => auth::register(desk, args, global).await,
        Command::Properties(args) => properties::handle(desk, args, global).await,
        Command::Rooms(args) => rooms::handle(desk, args, resolved, global).await,
        Command::Tickets(args) => tickets::handle(desk, args, resolved, global).await,
        Command::Tasks(args) => tasks::handle(desk, args, resolved, global).await,
        Command::Requests(args) => requests::handle(desk, args, resolved, global).await,
        Command::Users(args) => users::handle(desk, args, global).await,
        Command::Dashboard => dashboard::handle(desk, resolved, global).await,
        Command::Report(args) => report::handle(desk, args, resolved, global).await,
        Command::Board(args) => board::handle(desk, args, resolved, global).await,
        Command::History(args) => history::handle(desk, args, global).await,
        Command::Settings(args) => settings::handle(desk, args, global).await,
        Command::Config(_) | Command::Chains(_) | Command::Completions(_) => Err(
            CliError::Internal("offline command reached the server dispatcher".into()),
        ),
    }
}
