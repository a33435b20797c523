// ── Report export ──
//
// Lays a report out as a paginated plain-text document: a title block on
// the first page, a column table whose header repeats on every page the
// table continues onto, then a "Related Items Details" section for each
// row that has related items. Every page ends with
// `Page X of Y - Total <type>: <count>`.

use propdesk_api::models::{Id, ServiceRequest, Task, Ticket};

use super::related::RelatedItems;
use super::{ReportData, ReportKind};

/// Body lines per page, excluding the footer.
pub const DEFAULT_PAGE_CAPACITY: usize = 50;

const MAX_CELL_WIDTH: usize = 32;
const COLUMN_GAP: &str = "  ";
const PAGE_BREAK: char = '\u{c}';

/// One laid-out page. The footer is added at render time, once the page
/// count is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<String>,
}

/// A paginated report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    kind: ReportKind,
    total: usize,
    pages: Vec<Page>,
}

struct Row {
    id: Id,
    label: String,
    cells: Vec<String>,
}

/// Accumulates lines, breaking pages at `capacity`.
struct Layout {
    capacity: usize,
    pages: Vec<Page>,
    current: Page,
}

impl Layout {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(4),
            pages: Vec::new(),
            current: Page::default(),
        }
    }

    fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.current.lines.len())
    }

    fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
    }

    fn push(&mut self, line: impl Into<String>) {
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current.lines.push(line.into());
    }

    /// Push a group of lines that should not be split across pages
    /// unless it is larger than a whole page.
    fn push_block(&mut self, lines: Vec<String>) {
        let fits_on_fresh_page = lines.len() <= self.capacity;
        if lines.len() > self.remaining() && fits_on_fresh_page && !self.current.lines.is_empty() {
            self.break_page();
        }
        for line in lines {
            self.push(line);
        }
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.lines.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

impl Document {
    /// Lay out `data` as a `kind` report.
    pub fn build(
        kind: ReportKind,
        title: &str,
        subtitle: &[String],
        data: &ReportData,
        page_capacity: usize,
    ) -> Self {
        let (headers, rows) = table_for(kind, data);
        let mut layout = Layout::new(page_capacity);

        // Title block
        layout.push(title);
        layout.push("=".repeat(title.chars().count()));
        for line in subtitle {
            layout.push(line.clone());
        }
        layout.push(String::new());

        // Table
        let widths = column_widths(&headers, &rows);
        let header_line = format_cells(&headers, &widths);
        let rule = "-".repeat(header_line.chars().count());
        layout.push_block(vec![header_line.clone(), rule.clone()]);
        if rows.is_empty() {
            layout.push(format!("No {} found.", kind.label().to_lowercase()));
        }
        for row in &rows {
            if layout.remaining() == 0 {
                layout.break_page();
            }
            if layout.current.lines.is_empty() {
                layout.push(header_line.clone());
                layout.push(rule.clone());
            }
            layout.push(format_cells(&row.cells, &widths));
        }

        // Related items
        let entity = kind.entity();
        let mut detailed = rows
            .iter()
            .filter_map(|row| data.related_for(entity, row.id).map(|items| (row, items)))
            .peekable();
        if detailed.peek().is_some() {
            layout.push(String::new());
        }
        for (row, items) in detailed {
            layout.push_block(related_block(&row.label, items));
        }

        Self {
            kind,
            total: rows.len(),
            pages: layout.finish(),
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Footer line for page `number` (1-based).
    pub fn footer(&self, number: usize) -> String {
        format!(
            "Page {number} of {} - Total {}: {}",
            self.pages.len(),
            self.kind.label(),
            self.total
        )
    }

    /// Render to text. Pages are separated by a form feed.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, page) in self.pages.iter().enumerate() {
            if idx > 0 {
                out.push(PAGE_BREAK);
                out.push('\n');
            }
            for line in &page.lines {
                out.push_str(line.trim_end());
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&self.footer(idx + 1));
            out.push('\n');
        }
        out
    }
}

// ── Table construction ──────────────────────────────────────────────

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

fn room(room_id: Option<Id>) -> String {
    room_id.map_or_else(|| "-".to_owned(), |id| format!("#{id}"))
}

fn table_for(kind: ReportKind, data: &ReportData) -> (Vec<String>, Vec<Row>) {
    let headers: &[&str] = match kind {
        ReportKind::Tickets => &["ID", "Title", "Room", "Priority", "Category", "Status", "Created"],
        ReportKind::Tasks => &["ID", "Title", "Room", "Priority", "Status", "Assignee", "Due"],
        ReportKind::Requests => &["ID", "Room", "Group", "Type", "Priority", "Status", "Guest", "Created"],
    };
    let rows = match kind {
        ReportKind::Tickets => data.rows.tickets.iter().map(ticket_row).collect(),
        ReportKind::Tasks => data.rows.tasks.iter().map(task_row).collect(),
        ReportKind::Requests => data.rows.requests.iter().map(request_row).collect(),
    };
    (headers.iter().map(|h| (*h).to_owned()).collect(), rows)
}

fn ticket_row(t: &Ticket) -> Row {
    Row {
        id: t.id,
        label: format!("Ticket #{}: {}", t.id, t.title),
        cells: vec![
            t.id.to_string(),
            t.title.clone(),
            room(t.room_id),
            opt(t.priority.as_ref()),
            opt(t.category.as_deref()),
            opt(t.status.as_ref()),
            opt(t.created_at.as_deref()),
        ],
    }
}

fn task_row(t: &Task) -> Row {
    Row {
        id: t.id,
        label: format!("Task #{}: {}", t.id, t.title),
        cells: vec![
            t.id.to_string(),
            t.title.clone(),
            room(t.room_id),
            opt(t.priority.as_ref()),
            opt(t.status.as_ref()),
            t.assigned_to_id.map_or_else(|| "-".to_owned(), |id| format!("user #{id}")),
            opt(t.due_date.as_deref()),
        ],
    }
}

fn request_row(r: &ServiceRequest) -> Row {
    Row {
        id: r.id,
        label: format!(
            "Request #{}: {}",
            r.id,
            r.request_type.as_deref().unwrap_or("service request")
        ),
        cells: vec![
            r.id.to_string(),
            room(r.room_id),
            opt(r.request_group.as_deref()),
            opt(r.request_type.as_deref()),
            opt(r.priority.as_ref()),
            opt(r.status.as_ref()),
            opt(r.guest_name.as_deref()),
            opt(r.created_at.as_deref()),
        ],
    }
}

fn column_widths(headers: &[String], rows: &[Row]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.cells.get(idx))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect()
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_owned();
    }
    let kept: String = cell.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn format_cells(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", truncate(cell, *width), width = *width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}

fn related_block(label: &str, items: &RelatedItems) -> Vec<String> {
    let heading = format!("Related Items Details - {label}");
    let mut lines = vec![heading.clone(), "-".repeat(heading.chars().count())];
    if !items.tickets.is_empty() {
        lines.push(format!("  Tickets ({}):", items.tickets.len()));
        lines.extend(items.tickets.iter().map(|t| {
            format!("    - #{} {} [{}]", t.id, t.title, opt(t.status.as_ref()))
        }));
    }
    if !items.tasks.is_empty() {
        lines.push(format!("  Tasks ({}):", items.tasks.len()));
        lines.extend(items.tasks.iter().map(|t| {
            format!("    - #{} {} [{}]", t.id, t.title, opt(t.status.as_ref()))
        }));
    }
    if !items.requests.is_empty() {
        lines.push(format!("  Service Requests ({}):", items.requests.len()));
        lines.extend(items.requests.iter().map(|r| {
            format!(
                "    - #{} {} / {} [{}]",
                r.id,
                opt(r.request_group.as_deref()),
                opt(r.request_type.as_deref()),
                opt(r.status.as_ref())
            )
        }));
    }
    lines.push(String::new());
    lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::report::related::tests::{request, task, ticket};
    use crate::report::{ReportFilter, ReportRows};

    fn data(tickets: Vec<Ticket>, tasks: Vec<Task>, requests: Vec<ServiceRequest>) -> ReportData {
        ReportData::assemble(
            ReportRows {
                tickets,
                tasks,
                requests,
            },
            &ReportFilter::default(),
        )
    }

    fn subtitle() -> Vec<String> {
        vec!["Property: Hampton Inn".into(), "Date: 2024-05-01".into()]
    }

    #[test]
    fn single_page_report_has_title_table_and_footer() {
        let data = data(vec![ticket(1, Some(101)), ticket(2, None)], vec![], vec![]);
        let doc = Document::build(ReportKind::Tickets, "Ticket Report", &subtitle(), &data, 50);

        assert_eq!(doc.page_count(), 1);
        let text = doc.render();
        assert!(text.starts_with("Ticket Report\n=============\nProperty: Hampton Inn\n"));
        assert!(text.contains("ID  Title"));
        assert!(text.contains("Ticket 2"));
        assert!(text.trim_end().ends_with("Page 1 of 1 - Total Tickets: 2"));
        assert!(!text.contains("Related Items Details"));
    }

    #[test]
    fn long_tables_repeat_headers_on_each_page() {
        let tickets: Vec<Ticket> = (1..=30).map(|id| ticket(id, None)).collect();
        let data = data(tickets, vec![], vec![]);
        let doc = Document::build(ReportKind::Tickets, "Tickets", &[], &data, 10);

        assert!(doc.page_count() > 1);
        for page in &doc.pages()[1..] {
            assert!(page.lines[0].starts_with("ID"));
            assert!(page.lines[1].starts_with("---"));
        }
        for page in doc.pages() {
            assert!(page.lines.len() <= 10);
        }
        let text = doc.render();
        let last = doc.page_count();
        assert!(text.contains(&format!("Page 1 of {last} - Total Tickets: 30")));
        assert!(text.contains(&format!("Page {last} of {last} - Total Tickets: 30")));
        assert_eq!(text.matches('\u{c}').count(), last - 1);
    }

    #[test]
    fn related_details_follow_the_table() {
        let data = data(
            vec![ticket(5, Some(101))],
            vec![task(7, Some(101), Some(5), None)],
            vec![request(9, Some(101))],
        );
        let doc = Document::build(ReportKind::Tasks, "Task Report", &subtitle(), &data, 50);
        let text = doc.render();

        assert!(text.contains("Related Items Details - Task #7: Task 7"));
        assert!(text.contains("  Tickets (1):"));
        assert!(text.contains("    - #5 Ticket 5"));
        assert!(text.contains("  Service Requests (1):"));
        assert!(text.contains("Total Tasks: 1"));
    }

    #[test]
    fn empty_report_still_renders_one_page() {
        let doc = Document::build(ReportKind::Requests, "Requests", &[], &ReportData::default(), 50);
        assert_eq!(doc.page_count(), 1);
        let text = doc.render();
        assert!(text.contains("No service requests found."));
        assert!(text.contains("Page 1 of 1 - Total Service Requests: 0"));
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
