//! Clap derive structures for the `propdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// propdesk -- tickets, tasks, and service requests from the command line
#[derive(Debug, Parser)]
#[command(
    name = "propdesk",
    version,
    about = "Manage properties, tickets, tasks, and service requests from the command line",
    long_about = "A CLI for the property desk service.\n\n\
        Log in once per profile; the session token is stored in the\n\
        platform data directory and reused until the server rejects it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "PROPDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "PROPDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Property id to scope commands to (overrides profile)
    #[arg(long, short = 'P', env = "PROPDESK_PROPERTY", global = true)]
    pub property: Option<i64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PROPDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PROPDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Forget the stored session token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Create an account
    Register(RegisterArgs),

    /// Manage properties
    #[command(alias = "prop")]
    Properties(PropertiesArgs),

    /// Manage rooms of a property
    Rooms(RoomsArgs),

    /// Manage maintenance tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// Manage tasks
    Tasks(TasksArgs),

    /// Manage guest service requests
    #[command(alias = "req")]
    Requests(RequestsArgs),

    /// Manage user accounts
    Users(UsersArgs),

    /// Summary of tickets, tasks, and properties
    #[command(alias = "dash")]
    Dashboard,

    /// Build a report with related items, optionally exported to a file
    Report(ReportArgs),

    /// Show the task board or move a task between columns
    Board(BoardArgs),

    /// Show the change history
    History(HistoryArgs),

    /// View and change server settings
    Settings(SettingsArgs),

    /// Hotel chain and room-type lookup tables
    Chains(ChainsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskStatusArg {
    Pending,
    InProgress,
    Completed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username)
    #[arg(long, short = 'u', env = "PROPDESK_USERNAME")]
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account username
    #[arg(long, short = 'u')]
    pub username: String,

    /// Account email address
    #[arg(long, short = 'e')]
    pub email: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROPERTIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PropertiesArgs {
    #[command(subcommand)]
    pub command: PropertiesCommand,
}

#[derive(Debug, Args)]
pub struct PropertyFields {
    /// Property name
    #[arg(long)]
    pub name: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Property type (e.g. hotel)
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// Status: active, inactive, or maintenance
    #[arg(long)]
    pub status: Option<String>,

    /// Read the full body from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = ["name", "address", "property_type", "status"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum PropertiesCommand {
    /// List properties
    #[command(alias = "ls")]
    List,

    /// Show one property
    Get {
        /// Property id
        id: i64,
    },

    /// Create a property
    Create(PropertyFields),

    /// Update a property (unset flags keep their current value)
    Update {
        /// Property id
        id: i64,

        #[command(flatten)]
        fields: PropertyFields,
    },

    /// Delete a property
    #[command(alias = "rm")]
    Delete {
        /// Property id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROOMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Args)]
pub struct RoomFields {
    /// Room name or number
    #[arg(long)]
    pub name: Option<String>,

    /// Room-type code (see `propdesk chains rooms`)
    #[arg(long = "type")]
    pub room_type: Option<String>,

    /// Floor number
    #[arg(long)]
    pub floor: Option<i64>,

    /// Status: Available, Occupied, Maintenance, or Cleaning
    #[arg(long)]
    pub status: Option<String>,

    /// Guest capacity (1-20)
    #[arg(long)]
    pub capacity: Option<i64>,

    /// Amenity (repeatable)
    #[arg(long = "amenity")]
    pub amenities: Vec<String>,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,

    /// Read the full body from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = ["name", "room_type", "floor", "status", "capacity", "amenities", "description"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List the rooms of a property
    #[command(alias = "ls")]
    List,

    /// Create a room
    Create(RoomFields),

    /// Update a room (unset flags keep their current value)
    Update {
        /// Room id
        id: i64,

        #[command(flatten)]
        fields: RoomFields,
    },

    /// Delete a room
    #[command(alias = "rm")]
    Delete {
        /// Room id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TICKETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

/// Date / room scoping shared by the list commands.
#[derive(Debug, Args)]
pub struct ListScope {
    /// Only items from this day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Only items in this room
    #[arg(long)]
    pub room: Option<i64>,
}

#[derive(Debug, Args)]
pub struct TicketFields {
    /// Ticket title
    #[arg(long)]
    pub title: Option<String>,

    /// Details
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Category (e.g. Plumbing)
    #[arg(long)]
    pub category: Option<String>,

    /// Room id
    #[arg(long)]
    pub room: Option<i64>,

    /// Status: open, in progress, resolved, or closed
    #[arg(long)]
    pub status: Option<String>,

    /// Read the full body from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = ["title", "description", "priority", "category", "room", "status"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets
    #[command(alias = "ls")]
    List(ListScope),

    /// Show one ticket
    Get {
        /// Ticket id
        id: i64,
    },

    /// Create a ticket
    Create(TicketFields),

    /// Update a ticket (unset flags keep their current value)
    Update {
        /// Ticket id
        id: i64,

        #[command(flatten)]
        fields: TicketFields,
    },

    /// Delete a ticket
    #[command(alias = "rm")]
    Delete {
        /// Ticket id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TASKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Args)]
pub struct TaskFields {
    /// Task title
    #[arg(long)]
    pub title: Option<String>,

    /// Details
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    #[arg(long, value_enum)]
    pub status: Option<TaskStatusArg>,

    /// Assignee user id
    #[arg(long)]
    pub assignee: Option<i64>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Linked ticket id
    #[arg(long)]
    pub ticket: Option<i64>,

    /// Room id
    #[arg(long)]
    pub room: Option<i64>,

    /// Read the full body from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = ["title", "description", "priority", "status", "assignee", "due", "ticket", "room"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List tasks
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        scope: ListScope,

        /// Only tasks assigned to this user id
        #[arg(long)]
        assignee: Option<i64>,
    },

    /// Show one task
    Get {
        /// Task id
        id: i64,
    },

    /// Create a task
    Create(TaskFields),

    /// Update a task (unset flags keep their current value)
    Update {
        /// Task id
        id: i64,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Move a task to another board column
    #[command(alias = "mv")]
    Move {
        /// Task id
        id: i64,

        /// Destination column
        #[arg(value_enum)]
        status: TaskStatusArg,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SERVICE REQUESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RequestsArgs {
    #[command(subcommand)]
    pub command: RequestsCommand,
}

#[derive(Debug, Args)]
pub struct RequestFields {
    /// Request group (e.g. Housekeeping)
    #[arg(long)]
    pub group: Option<String>,

    /// Request type within the group (e.g. Extra towels)
    #[arg(long = "type")]
    pub request_type: Option<String>,

    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Status: pending, in progress, completed, or cancelled
    #[arg(long)]
    pub status: Option<String>,

    /// Room id
    #[arg(long)]
    pub room: Option<i64>,

    /// Guest name
    #[arg(long)]
    pub guest: Option<String>,

    /// Notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Read the full body from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = ["group", "request_type", "priority", "status", "room", "guest", "notes"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum RequestsCommand {
    /// List service requests
    #[command(alias = "ls")]
    List(ListScope),

    /// Show one service request
    Get {
        /// Request id
        id: i64,
    },

    /// Create a service request
    Create(RequestFields),

    /// Update a service request (unset flags keep their current value)
    Update {
        /// Request id
        id: i64,

        #[command(flatten)]
        fields: RequestFields,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Args)]
pub struct UserFields {
    /// Login name
    #[arg(long)]
    pub username: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Role: user, manager, general_manager, or super_admin
    #[arg(long)]
    pub role: Option<String>,

    /// Group name
    #[arg(long)]
    pub group: Option<String>,

    /// Assigned property id (repeatable)
    #[arg(long = "assign")]
    pub assigned_properties: Vec<i64>,

    /// Prompt for a new password
    #[arg(long)]
    pub password: bool,

    /// Read the full body from a JSON file instead of flags
    #[arg(long, short = 'F', conflicts_with_all = ["username", "email", "role", "group", "assigned_properties"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List,

    /// List users with the manager role
    Managers,

    /// Show one user
    Get {
        /// User id
        id: i64,
    },

    /// Create a user (prompts for a password)
    Create(UserFields),

    /// Update a user (unset flags keep their current value)
    Update {
        /// User id
        id: i64,

        #[command(flatten)]
        fields: UserFields,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User id
        id: i64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REPORTS & BOARD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKindArg {
    Tickets,
    Tasks,
    Requests,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Which collection to report on
    #[arg(value_enum)]
    pub kind: ReportKindArg,

    #[command(flatten)]
    pub scope: ListScope,

    /// Only tasks assigned to this user id
    #[arg(long)]
    pub assignee: Option<i64>,

    /// Write a paginated text document to FILE
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Body lines per exported page
    #[arg(long, default_value = "50", requires = "export")]
    pub page_lines: usize,
}

#[derive(Debug, Args)]
pub struct BoardArgs {
    /// Task id to move
    #[arg(long = "move", value_name = "TASK", requires = "to")]
    pub move_task: Option<i64>,

    /// Destination column
    #[arg(long, value_enum, requires = "move_task")]
    pub to: Option<TaskStatusArg>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Entity type (e.g. ticket, task)
    #[arg(long)]
    pub entity: Option<String>,

    /// Entity id
    #[arg(long, requires = "entity")]
    pub id: Option<i64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingsSectionArg {
    System,
    Security,
    General,
    Sms,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show a settings section
    Get {
        #[arg(value_enum)]
        section: SettingsSectionArg,
    },

    /// Change values in a settings section
    Set {
        #[arg(value_enum)]
        section: SettingsSectionArg,

        /// KEY=VALUE pair (repeatable); VALUE is parsed as JSON when possible
        #[arg(value_name = "KEY=VALUE", required_unless_present = "from_file")]
        pairs: Vec<String>,

        /// Replace the section with the JSON object in FILE
        #[arg(long, short = 'F', conflicts_with = "pairs")]
        from_file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CHAINS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ChainsArgs {
    #[command(subcommand)]
    pub command: ChainsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChainsCommand {
    /// List known hotel chains
    #[command(alias = "ls")]
    List,

    /// Guess the chain from a property name
    Detect {
        /// Property name, e.g. "Hampton Inn Downtown"
        name: String,
    },

    /// List room-type codes, optionally for one chain
    Rooms {
        /// Chain code (e.g. HAM)
        chain: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: api_url, username, password_env, property, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
