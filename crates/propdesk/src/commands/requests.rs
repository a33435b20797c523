//! Service request command handlers.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::models::{RequestStatus, ServiceRequest, ServiceRequestForm};

use crate::cli::{GlobalOpts, RequestFields, RequestsArgs, RequestsCommand};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::{tickets, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RequestRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Type")]
    request_type: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Guest")]
    guest: String,
}

impl RequestRow {
    fn new(r: &ServiceRequest, color: bool) -> Self {
        Self {
            id: r.id,
            group: output::or_dash(r.request_group.as_ref()),
            request_type: output::or_dash(r.request_type.as_ref()),
            priority: r
                .priority
                .as_ref()
                .map_or_else(|| "-".to_owned(), |p| output::paint_status(p.as_str(), color)),
            status: r
                .status
                .as_ref()
                .map_or_else(|| "-".to_owned(), |s| output::paint_status(s.as_str(), color)),
            room: output::or_dash(r.room_id),
            guest: output::or_dash(r.guest_name.as_ref()),
        }
    }
}

fn detail(r: &ServiceRequest) -> String {
    output::detail_lines(&[
        ("ID", r.id.to_string()),
        ("Group", output::or_dash(r.request_group.as_ref())),
        ("Type", output::or_dash(r.request_type.as_ref())),
        ("Priority", output::or_dash(r.priority.as_ref())),
        ("Status", output::or_dash(r.status.as_ref())),
        ("Property", output::or_dash(r.property_id)),
        ("Room", output::or_dash(r.room_id)),
        ("Guest", output::or_dash(r.guest_name.as_ref())),
        ("Created", output::or_dash(r.created_at.as_ref())),
        ("Notes", output::or_dash(r.notes.as_ref())),
    ])
}

// ── Form building ───────────────────────────────────────────────────

fn form_from(
    current: Option<&ServiceRequest>,
    fields: RequestFields,
    resolved: &Resolved,
) -> Result<ServiceRequestForm, CliError> {
    if let Some(path) = fields.from_file {
        return util::read_json_file(&path);
    }
    let mut form = current.map_or_else(
        || ServiceRequestForm {
            property_id: resolved.property(),
            ..ServiceRequestForm::default()
        },
        |r| ServiceRequestForm {
            property_id: r.property_id,
            room_id: r.room_id,
            request_group: r.request_group.clone().unwrap_or_default(),
            request_type: r.request_type.clone().unwrap_or_default(),
            priority: r.priority.clone(),
            status: r.status.clone(),
            guest_name: r.guest_name.clone(),
            notes: r.notes.clone(),
        },
    );
    if let Some(group) = fields.group {
        form.request_group = group;
    }
    if let Some(kind) = fields.request_type {
        form.request_type = kind;
    }
    if let Some(p) = fields.priority {
        form.priority = Some(util::priority(p));
    }
    if let Some(status) = fields.status {
        form.status = Some(RequestStatus::parse(&status));
    }
    if fields.room.is_some() {
        form.room_id = fields.room;
    }
    if fields.guest.is_some() {
        form.guest_name = fields.guest;
    }
    if fields.notes.is_some() {
        form.notes = fields.notes;
    }
    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    desk: &Desk,
    args: RequestsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RequestsCommand::List(scope) => {
            let filter = tickets::scope_filter(resolved, &scope);
            let requests = util::with_spinner(
                global,
                "Loading service requests...",
                desk.service_requests(&filter),
            )
            .await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &requests,
                |r| RequestRow::new(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RequestsCommand::Get { id } => {
            let request = desk
                .service_request(id)
                .await
                .map_err(|e| CliError::not_found(e, "requests list"))?;
            let out = output::render_single(global.output, &request, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RequestsCommand::Create(fields) => {
            let form = form_from(None, fields, resolved)?;
            let created = desk.create_service_request(&form).await?;
            output::notice(
                &format!("✓ Service request created (#{})", created.id),
                global.quiet,
            );
            Ok(())
        }

        RequestsCommand::Update { id, fields } => {
            let current = desk
                .service_request(id)
                .await
                .map_err(|e| CliError::not_found(e, "requests list"))?;
            let form = form_from(Some(&current), fields, resolved)?;
            desk.update_service_request(id, &form).await?;
            output::notice("✓ Service request updated", global.quiet);
            Ok(())
        }
    }
}
