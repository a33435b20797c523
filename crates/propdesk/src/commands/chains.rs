//! Offline lookup tables: hotel chains and room-type codes.

use serde::Serialize;
use tabled::Tabled;

use propdesk_core::lookup::{self, CHAINS, Chain};

use crate::cli::{ChainsArgs, ChainsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Clone, Serialize, Tabled)]
struct ChainRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Family")]
    family: &'static str,
}

impl From<&Chain> for ChainRow {
    fn from(c: &Chain) -> Self {
        Self {
            code: c.code,
            name: c.name,
            family: c.family,
        }
    }
}

#[derive(Clone, Serialize, Tabled)]
struct RoomTypeRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Room type")]
    label: &'static str,
}

pub fn handle(args: ChainsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ChainsCommand::List => {
            let rows: Vec<ChainRow> = CHAINS.iter().map(ChainRow::from).collect();
            let out = output::render_list(global.output, &rows, ChainRow::clone, |r| r.code.to_owned());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ChainsCommand::Detect { name } => {
            let chain = lookup::detect_chain(&name).ok_or_else(|| CliError::NotFound {
                message: format!("no known chain matches '{name}'"),
                list_command: "chains list".into(),
            })?;
            let row = ChainRow::from(chain);
            let out = output::render_single(
                global.output,
                &row,
                |r| output::detail_lines(&[("Code", r.code.into()), ("Name", r.name.into()), ("Family", r.family.into())]),
                |r| r.code.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ChainsCommand::Rooms { chain } => {
            if let Some(code) = chain.as_deref() {
                if lookup::chain(code).is_none() {
                    return Err(CliError::NotFound {
                        message: format!("unknown chain code '{code}'"),
                        list_command: "chains list".into(),
                    });
                }
            }
            let rows: Vec<RoomTypeRow> = lookup::room_types(chain.as_deref())
                .into_iter()
                .map(|(code, label)| RoomTypeRow { code, label })
                .collect();
            let out = output::render_list(global.output, &rows, RoomTypeRow::clone, |r| r.code.to_owned());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
