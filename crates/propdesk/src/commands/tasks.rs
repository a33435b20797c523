//! Task command handlers.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::models::{Task, TaskForm};

use crate::cli::{GlobalOpts, TaskFields, TasksArgs, TasksCommand};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::{tickets, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Ticket")]
    ticket: String,
}

impl TaskRow {
    fn new(t: &Task, color: bool) -> Self {
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
            assignee: output::or_dash(t.assigned_to_id),
            due: output::or_dash(t.due_date.as_ref()),
            ticket: output::or_dash(t.ticket_id),
        }
    }
}

fn detail(t: &Task) -> String {
    output::detail_lines(&[
        ("ID", t.id.to_string()),
        ("Title", t.title.clone()),
        ("Priority", output::or_dash(t.priority.as_ref())),
        ("Status", output::or_dash(t.status.as_ref())),
        ("Assignee", output::or_dash(t.assigned_to_id)),
        ("Due", output::or_dash(t.due_date.as_ref())),
        ("Property", output::or_dash(t.property_id)),
        ("Room", output::or_dash(t.room_id)),
        ("Ticket", output::or_dash(t.ticket_id)),
        ("Description", output::or_dash(t.description.as_ref())),
    ])
}

// ── Form building ───────────────────────────────────────────────────

fn form_from(current: Option<&Task>, fields: TaskFields, resolved: &Resolved) -> Result<TaskForm, CliError> {
    if let Some(path) = fields.from_file {
        return util::read_json_file(&path);
    }
    let mut form = current.map_or_else(
        || TaskForm {
            property_id: resolved.property(),
            ..TaskForm::default()
        },
        |t| TaskForm {
            property_id: t.property_id,
            title: t.title.clone(),
            description: t.description.clone(),
            priority: t.priority.clone(),
            status: t.status.clone(),
            assigned_to_id: t.assigned_to_id,
            due_date: t.due_date.clone(),
            ticket_id: t.ticket_id,
            room_id: t.room_id,
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
    if let Some(s) = fields.status {
        form.status = Some(util::task_status(s));
    }
    if fields.assignee.is_some() {
        form.assigned_to_id = fields.assignee;
    }
    if fields.due.is_some() {
        form.due_date = fields.due;
    }
    if fields.ticket.is_some() {
        form.ticket_id = fields.ticket;
    }
    if fields.room.is_some() {
        form.room_id = fields.room;
    }
    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    desk: &Desk,
    args: TasksArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List { scope, assignee } => {
            let mut filter = tickets::scope_filter(resolved, &scope);
            filter.assigned_to_id = assignee;
            let tasks = util::with_spinner(global, "Loading tasks...", desk.tasks(&filter)).await?;
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &tasks,
                |t| TaskRow::new(t, color),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Get { id } => {
            let task = desk
                .task(id)
                .await
                .map_err(|e| CliError::not_found(e, "tasks list"))?;
            let out = output::render_single(global.output, &task, detail, |t| t.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Create(fields) => {
            let form = form_from(None, fields, resolved)?;
            let created = desk.create_task(&form).await?;
            output::notice(&format!("✓ Task created (#{})", created.id), global.quiet);
            Ok(())
        }

        TasksCommand::Update { id, fields } => {
            let current = desk
                .task(id)
                .await
                .map_err(|e| CliError::not_found(e, "tasks list"))?;
            let form = form_from(Some(&current), fields, resolved)?;
            desk.update_task(id, &form).await?;
            output::notice("✓ Task updated", global.quiet);
            Ok(())
        }

        TasksCommand::Move { id, status } => {
            let status = util::task_status(status);
            let moved = desk.update_task_status(id, &status).await?;
            output::notice(
                &format!("✓ Task #{} moved to {}", moved.id, output::or_dash(moved.status.as_ref())),
                global.quiet,
            );
            Ok(())
        }

        TasksCommand::Delete { id } => {
            if !util::confirm(&format!("Delete task #{id}?"), global.yes)? {
                return Ok(());
            }
            desk.delete_task(id).await?;
            output::notice("✓ Task deleted", global.quiet);
            Ok(())
        }
    }
}
