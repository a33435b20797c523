//! Change history.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::models::HistoryEntry;

use crate::cli::{GlobalOpts, HistoryArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "When")]
    changed_at: String,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "By")]
    changed_by: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(h: &HistoryEntry) -> Self {
        let entity = match (&h.entity_type, h.entity_id) {
            (Some(kind), Some(id)) => format!("{kind} #{id}"),
            (Some(kind), None) => kind.clone(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "-".into(),
        };
        Self {
            changed_at: output::or_dash(h.changed_at.as_ref()),
            entity,
            action: output::or_dash(h.action.as_ref()),
            changed_by: output::or_dash(h.changed_by.as_ref()),
        }
    }
}

pub async fn handle(desk: &Desk, args: HistoryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let entries = util::with_spinner(
        global,
        "Loading history...",
        desk.history(args.entity.as_deref(), args.id),
    )
    .await?;
    let out = output::render_list(global.output, &entries, |h| HistoryRow::from(h), |h| h.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
