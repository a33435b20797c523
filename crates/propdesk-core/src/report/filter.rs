// ── Client-side fallback filter ──
//
// The server is authoritative when it honours `room_id` / `assigned_to_id`.
// This predicate re-applies them over already-fetched rows; when the
// server did filter, it keeps everything.

use propdesk_api::models::Id;

use super::ReportRows;

/// Exact-match filters re-applied after fetching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Applied to tickets, tasks, and requests.
    pub room_id: Option<Id>,
    /// Applied to tasks only.
    pub assigned_to_id: Option<Id>,
}

impl ReportFilter {
    pub fn is_empty(&self) -> bool {
        self.room_id.is_none() && self.assigned_to_id.is_none()
    }

    fn room_matches(&self, room: Option<Id>) -> bool {
        self.room_id.is_none_or(|wanted| room == Some(wanted))
    }

    /// Keep only rows matching every set filter.
    pub fn apply(&self, rows: ReportRows) -> ReportRows {
        if self.is_empty() {
            return rows;
        }
        let ReportRows {
            mut tickets,
            mut tasks,
            mut requests,
        } = rows;

        tickets.retain(|t| self.room_matches(t.room_id));
        tasks.retain(|t| {
            self.room_matches(t.room_id)
                && self
                    .assigned_to_id
                    .is_none_or(|wanted| t.assigned_to_id == Some(wanted))
        });
        requests.retain(|r| self.room_matches(r.room_id));

        ReportRows {
            tickets,
            tasks,
            requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use propdesk_api::models::{ServiceRequest, Task, Ticket};

    use super::*;
    use crate::report::related::tests::{request, task, ticket};

    fn sample() -> ReportRows {
        ReportRows {
            tickets: vec![ticket(1, Some(101)), ticket(2, Some(102))],
            tasks: vec![
                task(10, Some(101), None, Some(7)),
                task(11, Some(101), None, Some(8)),
                task(12, Some(102), None, Some(7)),
            ],
            requests: vec![request(20, Some(101)), request(21, None)],
        }
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> Id) -> Vec<Id> {
        items.iter().map(id).collect()
    }

    #[test]
    fn empty_filter_is_identity() {
        let rows = sample();
        assert_eq!(ReportFilter::default().apply(rows.clone()), rows);
    }

    #[test]
    fn room_filter_applies_to_all_collections() {
        let filter = ReportFilter {
            room_id: Some(101),
            assigned_to_id: None,
        };
        let out = filter.apply(sample());
        assert_eq!(ids(&out.tickets, |t: &Ticket| t.id), vec![1]);
        assert_eq!(ids(&out.tasks, |t: &Task| t.id), vec![10, 11]);
        assert_eq!(ids(&out.requests, |r: &ServiceRequest| r.id), vec![20]);
    }

    #[test]
    fn assignee_filter_touches_tasks_only() {
        let filter = ReportFilter {
            room_id: None,
            assigned_to_id: Some(7),
        };
        let out = filter.apply(sample());
        assert_eq!(out.tickets.len(), 2);
        assert_eq!(ids(&out.tasks, |t: &Task| t.id), vec![10, 12]);
        assert_eq!(out.requests.len(), 2);
    }

    #[test]
    fn already_filtered_rows_pass_through() {
        let filter = ReportFilter {
            room_id: Some(101),
            assigned_to_id: Some(7),
        };
        let once = filter.apply(sample());
        assert_eq!(filter.apply(once.clone()), once);
    }
}
