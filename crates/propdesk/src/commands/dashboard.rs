//! Dashboard: counts by status plus the server's report summary.

use serde_json::Value;

use propdesk_core::models::{TaskStatus, TicketStatus};
use propdesk_core::{Dashboard, Desk};

use crate::cli::GlobalOpts;
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

fn count_by<T, S: PartialEq>(items: &[T], status: impl Fn(&T) -> Option<&S>, wanted: &S) -> usize {
    items.iter().filter(|i| status(i) == Some(wanted)).count()
}

fn breakdown<T, S: PartialEq + std::fmt::Display>(
    items: &[T],
    known: &[S],
    status: impl Fn(&T) -> Option<&S> + Copy,
) -> String {
    let parts: Vec<String> = known
        .iter()
        .map(|s| format!("{s} {}", count_by(items, status, s)))
        .collect();
    format!("{} ({})", items.len(), parts.join(", "))
}

fn summary_lines(summary: &Value) -> Vec<(String, String)> {
    let Some(map) = summary.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(k, v)| {
            let rendered = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((k.replace('_', " "), rendered))
        })
        .collect()
}

fn detail(d: &Dashboard) -> String {
    let mut fields: Vec<(String, String)> = vec![
        ("Properties".into(), d.properties.len().to_string()),
        (
            "Tickets".into(),
            breakdown(&d.tickets, TicketStatus::KNOWN, |t| t.status.as_ref()),
        ),
        (
            "Tasks".into(),
            breakdown(&d.tasks, TaskStatus::KNOWN, |t| t.status.as_ref()),
        ),
    ];
    fields.extend(summary_lines(&d.summary));
    let borrowed: Vec<(&str, String)> = fields.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    output::detail_lines(&borrowed)
}

pub async fn handle(desk: &Desk, resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let dashboard = util::with_spinner(
        global,
        "Loading dashboard...",
        desk.dashboard(resolved.property()),
    )
    .await?;
    let out = output::render_single(global.output, &dashboard, detail, |d| {
        format!("{} {} {}", d.properties.len(), d.tickets.len(), d.tasks.len())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use propdesk_core::models::Task;

    use super::*;

    fn task(id: i64, status: TaskStatus) -> Task {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": "t", "status": status.as_str()
        }))
        .unwrap_or_else(|e| panic!("bad fixture: {e}"))
    }

    #[test]
    fn breakdown_counts_each_known_status() {
        let tasks = vec![
            task(1, TaskStatus::Pending),
            task(2, TaskStatus::Pending),
            task(3, TaskStatus::Completed),
        ];
        let line = breakdown(&tasks, TaskStatus::KNOWN, |t| t.status.as_ref());
        assert_eq!(line, "3 (pending 2, in progress 0, completed 1)");
    }

    #[test]
    fn summary_keeps_scalars_only() {
        let mut lines = summary_lines(&serde_json::json!({
            "open_tickets": 4, "by_room": {"101": 2}, "label": "Today"
        }));
        lines.sort();
        assert_eq!(
            lines,
            vec![
                ("label".to_owned(), "Today".to_owned()),
                ("open tickets".to_owned(), "4".to_owned()),
            ]
        );
    }
}
