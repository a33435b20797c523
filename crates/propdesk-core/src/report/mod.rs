//! Reporting: fetch scoping, the client-side fallback filter, the
//! related-items index, and paginated text export.

mod export;
mod filter;
mod related;

use std::fmt;
use std::str::FromStr;

use propdesk_api::models::{Id, ListFilter, ServiceRequest, Task, Ticket};
use serde::Serialize;

pub use export::{DEFAULT_PAGE_CAPACITY, Document, Page};
pub use filter::ReportFilter;
pub use related::{EntityKind, RelatedIndex, RelatedItems, build_related, related_key};

/// Which collection a report lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Tickets,
    Tasks,
    Requests,
}

impl ReportKind {
    pub const ALL: [Self; 3] = [Self::Tickets, Self::Tasks, Self::Requests];

    /// Label used in headings and the page footer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tickets => "Tickets",
            Self::Tasks => "Tasks",
            Self::Requests => "Service Requests",
        }
    }

    /// The entity kind each row of this report represents.
    pub fn entity(self) -> EntityKind {
        match self {
            Self::Tickets => EntityKind::Ticket,
            Self::Tasks => EntityKind::Task,
            Self::Requests => EntityKind::Request,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tickets" | "ticket" => Ok(Self::Tickets),
            "tasks" | "task" => Ok(Self::Tasks),
            "requests" | "request" | "service-requests" => Ok(Self::Requests),
            other => Err(format!(
                "unknown report type '{other}' (expected tickets, tasks, or requests)"
            )),
        }
    }
}

/// Report scope chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub property_id: Option<Id>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub room_id: Option<Id>,
    pub assigned_to_id: Option<Id>,
}

impl ReportQuery {
    /// Query parameters sent to the list endpoints.
    pub fn list_filter(&self) -> ListFilter {
        ListFilter {
            property_id: self.property_id,
            date: self.date.clone(),
            room_id: self.room_id,
            assigned_to_id: self.assigned_to_id,
        }
    }

    /// The client-side fallback for the optional filters.
    pub fn fallback_filter(&self) -> ReportFilter {
        ReportFilter {
            room_id: self.room_id,
            assigned_to_id: self.assigned_to_id,
        }
    }

    /// Human-readable scope lines for report headers.
    pub fn describe(&self, property_name: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();
        match (property_name, self.property_id) {
            (Some(name), _) => lines.push(format!("Property: {name}")),
            (None, Some(id)) => lines.push(format!("Property: #{id}")),
            (None, None) => lines.push("Property: all".to_owned()),
        }
        lines.push(format!(
            "Date: {}",
            self.date.as_deref().unwrap_or("all dates")
        ));
        if let Some(room) = self.room_id {
            lines.push(format!("Room: #{room}"));
        }
        if let Some(user) = self.assigned_to_id {
            lines.push(format!("Assigned to: user #{user}"));
        }
        lines
    }
}

/// The three collections a report is built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportRows {
    pub tickets: Vec<Ticket>,
    pub tasks: Vec<Task>,
    pub requests: Vec<ServiceRequest>,
}

impl ReportRows {
    /// Number of rows the given report lists.
    pub fn count(&self, kind: ReportKind) -> usize {
        match kind {
            ReportKind::Tickets => self.tickets.len(),
            ReportKind::Tasks => self.tasks.len(),
            ReportKind::Requests => self.requests.len(),
        }
    }
}

/// Filtered rows plus their related-items index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportData {
    pub rows: ReportRows,
    pub related: RelatedIndex,
}

impl ReportData {
    /// Apply the fallback filter and build the related-items index.
    pub fn assemble(rows: ReportRows, filter: &ReportFilter) -> Self {
        let rows = filter.apply(rows);
        let related = build_related(&rows.tickets, &rows.tasks, &rows.requests);
        Self { rows, related }
    }

    /// Related items for one row, if it has any.
    pub fn related_for(&self, kind: EntityKind, id: Id) -> Option<&RelatedItems> {
        self.related.get(&related_key(kind, id))
    }
}
