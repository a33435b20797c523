// ── Related-items index ──
//
// Cross-links tickets, tasks, and service requests by shared ticket id
// or room id. Each direction is computed on its own: a link found from
// A to B is not mirrored into B's entry unless B's own pass finds it.
// Nothing is de-duplicated, and only rows with at least one related
// item get an entry. Keys keep insertion order: tasks, then tickets,
// then requests.

use indexmap::IndexMap;
use propdesk_api::models::{Id, ServiceRequest, Task, Ticket};
use serde::Serialize;

/// Row kind used in related-item keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ticket,
    Task,
    Request,
}

impl EntityKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Ticket => "ticket",
            Self::Task => "task",
            Self::Request => "request",
        }
    }
}

/// `"<entity>_<id>"`, e.g. `task_7`.
pub fn related_key(kind: EntityKind, id: Id) -> String {
    format!("{}_{id}", kind.prefix())
}

/// Items linked to one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelatedItems {
    pub tickets: Vec<Ticket>,
    pub tasks: Vec<Task>,
    pub requests: Vec<ServiceRequest>,
}

impl RelatedItems {
    /// Count behind the "N related items" affordance.
    pub fn total(&self) -> usize {
        self.tickets.len() + self.tasks.len() + self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub type RelatedIndex = IndexMap<String, RelatedItems>;

fn same_room(a: Option<Id>, b: Option<Id>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

fn insert(index: &mut RelatedIndex, kind: EntityKind, id: Id, items: RelatedItems) {
    if !items.is_empty() {
        index.insert(related_key(kind, id), items);
    }
}

/// Build the index from freshly fetched collections.
pub fn build_related(tickets: &[Ticket], tasks: &[Task], requests: &[ServiceRequest]) -> RelatedIndex {
    let mut index = RelatedIndex::new();

    for task in tasks {
        let mut items = RelatedItems::default();
        if let Some(ticket_id) = task.ticket_id {
            if let Some(ticket) = tickets.iter().find(|t| t.id == ticket_id) {
                items.tickets.push(ticket.clone());
            }
        }
        if task.room_id.is_some() {
            items.requests.extend(
                requests
                    .iter()
                    .filter(|r| same_room(r.room_id, task.room_id))
                    .cloned(),
            );
        }
        insert(&mut index, EntityKind::Task, task.id, items);
    }

    for ticket in tickets {
        let items = RelatedItems {
            tickets: Vec::new(),
            tasks: tasks
                .iter()
                .filter(|t| t.ticket_id == Some(ticket.id))
                .cloned()
                .collect(),
            requests: requests
                .iter()
                .filter(|r| same_room(r.room_id, ticket.room_id))
                .cloned()
                .collect(),
        };
        insert(&mut index, EntityKind::Ticket, ticket.id, items);
    }

    for request in requests {
        let items = RelatedItems {
            tickets: tickets
                .iter()
                .filter(|t| same_room(t.room_id, request.room_id))
                .cloned()
                .collect(),
            tasks: tasks
                .iter()
                .filter(|t| same_room(t.room_id, request.room_id))
                .cloned()
                .collect(),
            requests: Vec::new(),
        };
        insert(&mut index, EntityKind::Request, request.id, items);
    }

    index
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) fn ticket(id: Id, room_id: Option<Id>) -> Ticket {
        Ticket {
            id,
            property_id: Some(1),
            room_id,
            title: format!("Ticket {id}"),
            description: None,
            priority: None,
            category: None,
            status: None,
            created_by: None,
            created_at: None,
        }
    }

    pub(crate) fn task(id: Id, room_id: Option<Id>, ticket_id: Option<Id>, assignee: Option<Id>) -> Task {
        Task {
            id,
            property_id: Some(1),
            title: format!("Task {id}"),
            description: None,
            priority: None,
            status: None,
            assigned_to_id: assignee,
            due_date: None,
            ticket_id,
            room_id,
        }
    }

    pub(crate) fn request(id: Id, room_id: Option<Id>) -> ServiceRequest {
        ServiceRequest {
            id,
            property_id: Some(1),
            room_id,
            request_group: Some("Housekeeping".into()),
            request_type: Some("Towels".into()),
            priority: None,
            status: None,
            guest_name: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn task_links_its_ticket_exactly_once() {
        let tickets = vec![ticket(5, Some(201)), ticket(6, Some(202))];
        let tasks = vec![task(7, Some(301), Some(5), None)];
        let index = build_related(&tickets, &tasks, &[]);

        let entry = &index["task_7"];
        assert_eq!(entry.tickets.len(), 1);
        assert_eq!(entry.tickets[0].id, 5);
        assert_eq!(index["ticket_5"].tasks[0].id, 7);
    }

    #[test]
    fn no_shared_ids_gives_empty_index() {
        let tickets = vec![ticket(1, Some(101))];
        let tasks = vec![task(2, Some(102), None, None)];
        let requests = vec![request(3, Some(103)), request(4, None)];
        assert!(build_related(&tickets, &tasks, &requests).is_empty());
    }

    #[test]
    fn shared_room_links_every_direction() {
        let tickets = vec![ticket(1, Some(101))];
        let tasks = vec![task(2, Some(101), None, None)];
        let requests = vec![request(3, Some(101))];
        let index = build_related(&tickets, &tasks, &requests);

        let keys: Vec<&str> = index.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["task_2", "ticket_1", "request_3"]);

        // task -> ticket is by ticket_id only
        assert!(index["task_2"].tickets.is_empty());
        assert_eq!(index["task_2"].requests[0].id, 3);
        assert_eq!(index["ticket_1"].requests[0].id, 3);
        assert!(index["ticket_1"].tasks.is_empty());
        assert_eq!(index["request_3"].total(), 2);
    }

    #[test]
    fn missing_rooms_never_match() {
        let tickets = vec![ticket(1, None)];
        let requests = vec![request(2, None)];
        assert!(build_related(&tickets, &[], &requests).is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let tickets = vec![ticket(1, Some(101))];
        let requests = vec![request(2, Some(101)), request(2, Some(101))];
        let index = build_related(&tickets, &[], &requests);
        assert_eq!(index["ticket_1"].requests.len(), 2);
        assert_eq!(index["ticket_1"].total(), 2);
    }

    #[test]
    fn dangling_ticket_reference_is_ignored() {
        let tasks = vec![task(1, None, Some(99), None)];
        assert!(build_related(&[], &tasks, &[]).is_empty());
    }
}
