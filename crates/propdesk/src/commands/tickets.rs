//! Ticket command handlers.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::models::{ListFilter, Ticket, TicketForm, TicketStatus};

use crate::cli::{GlobalOpts, ListScope, TicketFields, TicketsArgs, TicketsCommand};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl TicketRow {
    fn new(t: &Ticket, color: bool) -> Self {
        Self {
            id: t.id,
            title: t.title.clone(),
            priority: t
                .priority
                .as_ref()
                .map_or_else(|| "-".to_owned(), |p| output::paint_status(p.as_str(), color)),
            status: t
                .status
                .as_ref()
                .map_or_else(|| "-".to_owned(), |s| output::paint_status(s.as_str(), color)),
            room: output::or_dash(t.room_id),
            category: output::or_dash(t.category.as_ref()),
            created_at: output::or_dash(t.created_at.as_ref()),
        }
    }
}

fn detail(t: &Ticket) -> String {
    output::detail_lines(&[
        ("ID", t.id.to_string()),
        ("Title", t.title.clone()),
        ("Priority", output::or_dash(t.priority.as_ref())),
        ("Status", output::or_dash(t.status.as_ref())),
        ("Category", output::or_dash(t.category.as_ref())),
        ("Property", output::or_dash(t.property_id)),
        ("Room", output::or_dash(t.room_id)),
        ("Created by", output::or_dash(t.created_by.as_ref())),
        ("Created", output::or_dash(t.created_at.as_ref())),
        ("Description", output::or_dash(t.description.as_ref())),
    ])
}

pub(crate) fn scope_filter(resolved: &Resolved, scope: &ListScope) -> ListFilter {
    ListFilter {
        property_id: resolved.property(),
        date: scope.date.clone(),
        room_id: scope.room,
        assigned_to_id: None,
    }
}

// ── Form building ───────────────────────────────────────────────────

fn form_from(
    current: Option<&Ticket>,
    fields: TicketFields,
    resolved: &Resolved,
) -> Result<TicketForm, CliError> {
    if let Some(path) = fields.from_file {
        return util::read_json_file(&path);
    }
    let mut form = current.map_or_else(
        || TicketForm {
            property_id: resolved.property(),
            ..TicketForm::default()
        },
        |t| TicketForm {
            property_id: t.property_id,
            room_id: t.room_id,
            title: t.title.clone(),
            description: t.description.clone(),
            priority: t.priority.clone(),
            category: t.category.clone(),
            status: t.status.clone(),
        },
    );
    if let Some(title) = fields.title {
        form.title = title;
    }
    if fields.description.is_some() {
        form.description = fields.description;
    }
    if let Some(p) = fields.priority {
        form.priority = Some(util::priority(p));
    }
    if fields.category.is_some() {
        form.category = fields.category;
    }
    if fields.room.is_some() {
        form.room_id = fields.room;
    }
    if let Some(status) = fields.status {
        form.status = Some(TicketStatus::parse(&status));
    }
    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    desk: &Desk,
    args: TicketsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TicketsCommand::List(scope) => {
            let filter = scope_filter(resolved, &scope);
            let tickets = util::with_spinner(global, "Loading tickets...", desk.tickets(&filter)).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &tickets,
                |t| TicketRow::new(t, color),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Get { id } => {
            let ticket = desk
                .ticket(id)
                .await
                .map_err(|e| CliError::not_found(e, "tickets list"))?;
            let out = output::render_single(global.output, &ticket, detail, |t| t.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Create(fields) => {
            let form = form_from(None, fields, resolved)?;
            let created = desk.create_ticket(&form).await?;
            output::notice(&format!("✓ Ticket created (#{})", created.id), global.quiet);
            Ok(())
        }

        TicketsCommand::Update { id, fields } => {
            let current = desk
                .ticket(id)
                .await
                .map_err(|e| CliError::not_found(e, "tickets list"))?;
            let form = form_from(Some(&current), fields, resolved)?;
            desk.update_ticket(id, &form).await?;
            output::notice("✓ Ticket updated", global.quiet);
            Ok(())
        }

        TicketsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete ticket #{id}?"), global.yes)? {
                return Ok(());
            }
            desk.delete_ticket(id).await?;
            output::notice("✓ Ticket deleted", global.quiet);
            Ok(())
        }
    }
}
