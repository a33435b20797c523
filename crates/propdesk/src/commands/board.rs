//! Task board: three status columns, and moving a card between them.

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use propdesk_core::models::{ListFilter, Task};
use propdesk_core::{Board, BoardCapabilities, Column, Desk};

use crate::cli::{BoardArgs, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

/// Structured output: one array per column.
#[derive(Serialize)]
struct BoardView<'a> {
    pending: &'a [Task],
    in_progress: &'a [Task],
    completed: &'a [Task],
}

fn card(task: &Task) -> String {
    let mut line = format!("#{} {}", task.id, task.title);
    if let Some(priority) = &task.priority {
        line.push_str(&format!(" [{priority}]"));
    }
    line
}

fn render_columns(board: &Board) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        Column::ALL
            .iter()
            .map(|c| format!("{} ({})", c.title(), board.column(*c).len())),
    );
    let depth = Column::ALL
        .iter()
        .map(|c| board.column(*c).len())
        .max()
        .unwrap_or(0);
    for i in 0..depth {
        builder.push_record(
            Column::ALL
                .iter()
                .map(|c| board.column(*c).get(i).map(card).unwrap_or_default()),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

pub async fn handle(
    desk: &Desk,
    args: BoardArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filter = ListFilter {
        property_id: resolved.property(),
        ..ListFilter::default()
    };
    let tasks = util::with_spinner(global, "Loading board...", desk.tasks(&filter)).await?;
    let mut board = Board::from_tasks(tasks, BoardCapabilities::default());

    if let (Some(task_id), Some(to)) = (args.move_task, args.to) {
        let status = util::task_status(to);
        if board.find(task_id).is_none() {
            return Err(CliError::NotFound {
                message: format!("task #{task_id} is not on the board"),
                list_command: "board".into(),
            });
        }

        let mut requested = None;
        let moved = board.drag_end(task_id, Column::for_status(&status), |id, status| {
            requested = Some((id, status));
        });
        match (moved, requested) {
            (Some(m), Some((id, status))) => {
                desk.update_task_status(id, &status).await?;
                output::notice(
                    &format!("✓ Task #{id} moved: {} → {}", m.from.title(), m.to.title()),
                    global.quiet,
                );
            }
            _ => output::notice(
                &format!("Task #{task_id} is already in {status}"),
                global.quiet,
            ),
        }
        return Ok(());
    }

    let view = BoardView {
        pending: board.column(Column::Pending),
        in_progress: board.column(Column::InProgress),
        completed: board.column(Column::Completed),
    };
    let out = output::render_single(
        global.output,
        &view,
        |_| render_columns(&board),
        |v| {
            v.pending
                .iter()
                .chain(v.in_progress)
                .chain(v.completed)
                .map(|t| t.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
