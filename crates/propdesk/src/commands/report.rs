//! Report command: filtered rows with related-item counts, or a
//! paginated text export.

use serde::Serialize;
use tabled::Tabled;

use propdesk_core::models::Id;
use propdesk_core::report::DEFAULT_PAGE_CAPACITY;
use propdesk_core::{Desk, Document, ReportData, ReportKind, ReportQuery};

use crate::cli::{GlobalOpts, ReportArgs, ReportKindArg};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

fn report_kind(arg: ReportKindArg) -> ReportKind {
    match arg {
        ReportKindArg::Tickets => ReportKind::Tickets,
        ReportKindArg::Tasks => ReportKind::Tasks,
        ReportKindArg::Requests => ReportKind::Requests,
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "ID")]
    id: Id,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Related")]
    related: String,
}

fn rows_for(kind: ReportKind, data: &ReportData) -> Vec<ReportRow> {
    let related = |id: Id| {
        data.related_for(kind.entity(), id)
            .map_or_else(|| "-".to_owned(), |items| format!("{} related items", items.total()))
    };
    match kind {
        ReportKind::Tickets => data
            .rows
            .tickets
            .iter()
            .map(|t| ReportRow {
                id: t.id,
                title: t.title.clone(),
                status: output::or_dash(t.status.as_ref()),
                priority: output::or_dash(t.priority.as_ref()),
                room: output::or_dash(t.room_id),
                related: related(t.id),
            })
            .collect(),
        ReportKind::Tasks => data
            .rows
            .tasks
            .iter()
            .map(|t| ReportRow {
                id: t.id,
                title: t.title.clone(),
                status: output::or_dash(t.status.as_ref()),
                priority: output::or_dash(t.priority.as_ref()),
                room: output::or_dash(t.room_id),
                related: related(t.id),
            })
            .collect(),
        ReportKind::Requests => data
            .rows
            .requests
            .iter()
            .map(|r| ReportRow {
                id: r.id,
                title: format!(
                    "{} / {}",
                    r.request_group.as_deref().unwrap_or("-"),
                    r.request_type.as_deref().unwrap_or("-")
                ),
                status: output::or_dash(r.status.as_ref()),
                priority: output::or_dash(r.priority.as_ref()),
                room: output::or_dash(r.room_id),
                related: related(r.id),
            })
            .collect(),
    }
}

/// Structured output: the listed collection plus the related index.
#[derive(Serialize)]
struct ReportView<'a> {
    kind: ReportKind,
    scope: Vec<String>,
    total: usize,
    #[serde(flatten)]
    data: &'a ReportData,
}

fn row_ids(kind: ReportKind, data: &ReportData) -> String {
    rows_for(kind, data)
        .iter()
        .map(|r| r.id.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    desk: &Desk,
    args: ReportArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = report_kind(args.kind);
    let query = ReportQuery {
        property_id: resolved.property(),
        date: args.scope.date,
        room_id: args.scope.room,
        assigned_to_id: args.assignee,
    };

    let property = async {
        match query.property_id {
            Some(id) => desk.property(id).await.map(Some),
            None => Ok(None),
        }
    };
    let (data, property) = util::with_spinner(global, "Building report...", async {
        tokio::try_join!(desk.report(&query), property)
    })
    .await?;
    let scope = query.describe(property.as_ref().map(|p| p.name.as_str()));

    if let Some(path) = args.export {
        let capacity = if args.page_lines == 0 {
            DEFAULT_PAGE_CAPACITY
        } else {
            args.page_lines
        };
        let title = format!("{} Report", kind.label());
        let document = Document::build(kind, &title, &scope, &data, capacity);
        std::fs::write(&path, document.render())?;
        output::notice(
            &format!(
                "✓ Exported {} {} on {} page(s) to {}",
                data.rows.count(kind),
                kind.label().to_lowercase(),
                document.page_count(),
                path.display()
            ),
            global.quiet,
        );
        return Ok(());
    }

    let view = ReportView {
        kind,
        scope,
        total: data.rows.count(kind),
        data: &data,
    };
    let out = output::render_single(
        global.output,
        &view,
        |v| {
            let mut text = v.scope.join("\n");
            text.push_str("\n\n");
            text.push_str(&output::render_table(&rows_for(v.kind, v.data)));
            text.push_str(&format!("\nTotal {}: {}", v.kind.label(), v.total));
            text
        },
        |v| row_ids(v.kind, v.data),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
