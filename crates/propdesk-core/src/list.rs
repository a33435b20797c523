// ── Entity list state ──
//
// Per-view CRUD state: the fetched items plus loading / error / success
// banners. Mutations mirror what the server confirmed; nothing is
// applied optimistically, so a failure leaves `items` untouched.

use propdesk_api::models::{Id, Property, Room, ServiceRequest, Task, Ticket, User};
use tracing::debug;

use crate::error::CoreError;
use crate::sequence::{LoadToken, RequestSequencer};

/// Anything with a wire id.
pub trait Identified {
    fn id(&self) -> Id;
}

macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> Id {
                    self.id
                }
            }
        )+
    };
}

identified!(Property, Room, Ticket, Task, ServiceRequest, User);

/// List state for one entity view.
#[derive(Debug)]
pub struct EntityList<T> {
    label: &'static str,
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
    sequencer: RequestSequencer,
}

impl<T: Identified> EntityList<T> {
    /// `label` is the singular entity name used in banners, e.g. `"Ticket"`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            items: Vec::new(),
            loading: false,
            error: None,
            success: None,
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mark a fetch as started and return its token.
    pub fn begin_load(&mut self) -> LoadToken {
        self.loading = true;
        self.error = None;
        self.sequencer.begin()
    }

    /// Apply a fetch result if `token` is still the latest load.
    ///
    /// Returns `false` (and changes nothing) for a superseded response.
    pub fn finish_load(&mut self, token: LoadToken, result: Result<Vec<T>, CoreError>) -> bool {
        if !self.sequencer.is_current(token) {
            debug!(label = self.label, ?token, "discarding stale response");
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => self.items = items,
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Append a record the server just created.
    pub fn apply_created(&mut self, item: T) {
        self.items.push(item);
        self.error = None;
        self.success = Some(format!("{} created successfully", self.label));
    }

    /// Replace the record with the same id. Returns `false` if it wasn't listed.
    pub fn apply_updated(&mut self, item: T) -> bool {
        let id = item.id();
        let replaced = match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        };
        self.error = None;
        self.success = Some(format!("{} updated successfully", self.label));
        replaced
    }

    /// Remove exactly the record with `id`.
    pub fn apply_deleted(&mut self, id: Id) -> Option<T> {
        let removed = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .map(|idx| self.items.remove(idx));
        self.error = None;
        self.success = Some(format!("{} deleted successfully", self.label));
        removed
    }

    /// Show an error banner; items are left as they were.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.success = None;
    }

    /// Clear both banners.
    pub fn dismiss(&mut self) {
        self.error = None;
        self.success = None;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn ticket(id: Id, title: &str) -> Ticket {
        Ticket {
            id,
            property_id: Some(1),
            room_id: None,
            title: title.into(),
            description: None,
            priority: None,
            category: None,
            status: None,
            created_by: None,
            created_at: None,
        }
    }

    fn loaded(items: Vec<Ticket>) -> EntityList<Ticket> {
        let mut list = EntityList::new("Ticket");
        let token = list.begin_load();
        assert!(list.finish_load(token, Ok(items)));
        list
    }

    #[test]
    fn fetch_result_is_shown_verbatim() {
        let list = loaded(vec![ticket(1, "Leak"), ticket(2, "Noise")]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[0].title, "Leak");
        assert_eq!(list.items()[1].title, "Noise");
        assert!(!list.is_loading());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut list = EntityList::new("Ticket");
        let slow = list.begin_load();
        let fast = list.begin_load();

        assert!(list.finish_load(fast, Ok(vec![ticket(2, "new")])));
        assert!(!list.finish_load(slow, Ok(vec![ticket(1, "old")])));
        assert_eq!(list.items()[0].title, "new");
    }

    #[test]
    fn delete_removes_exactly_that_item() {
        let mut list = loaded(vec![ticket(1, "a"), ticket(2, "b"), ticket(3, "c")]);
        let removed = list.apply_deleted(2).unwrap();
        assert_eq!(removed.id, 2);
        let ids: Vec<Id> = list.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(list.success(), Some("Ticket deleted successfully"));
    }

    #[test]
    fn update_replaces_in_place() {
        let mut list = loaded(vec![ticket(1, "a"), ticket(2, "b")]);
        assert!(list.apply_updated(ticket(2, "b2")));
        assert_eq!(list.items()[1].title, "b2");
        assert!(!list.apply_updated(ticket(9, "ghost")));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn failure_keeps_items_and_dismiss_clears_banners() {
        let mut list = loaded(vec![ticket(1, "a")]);
        list.fail("Failed to delete ticket");
        assert_eq!(list.len(), 1);
        assert_eq!(list.error(), Some("Failed to delete ticket"));
        list.dismiss();
        assert!(list.error().is_none());
        assert!(list.success().is_none());
    }

    #[test]
    fn failed_load_sets_error_banner() {
        let mut list: EntityList<Ticket> = EntityList::new("Ticket");
        let token = list.begin_load();
        list.finish_load(token, Err(CoreError::NotAuthenticated));
        assert!(list.error().unwrap().contains("Not logged in"));
        assert!(list.is_empty());
    }
}
