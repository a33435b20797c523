//! Data bridge — connects the [`Desk`] to TUI actions.
//!
//! Two halves: a background task that verifies the session and follows the
//! auth context's watch channel, and [`Requests`], which turns fetch and
//! command actions into spawned `Desk` calls whose results come back as
//! actions. Responses carry the screen's load token; screens drop the ones
//! that are no longer current.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use propdesk_core::Desk;
use propdesk_core::models::{Id, ListFilter, Task, TaskForm};

use crate::action::{Action, Notification};

/// Verify the stored session, then report every later session change.
pub async fn spawn_data_bridge(
    desk: Desk,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut session = desk.auth().subscribe();
    let had_session = desk.auth().is_authenticated();

    match desk.verify().await {
        Ok(user) => {
            let _ = action_tx.send(Action::SessionVerified {
                username: user.username,
                role: user.role,
            });
        }
        Err(e) => {
            warn!(error = %e, "session verification failed");
            // A rejected token clears the auth context, and the watch arm
            // below reports that change.
            if !reported_by_watch(had_session, desk.auth().is_authenticated()) {
                let _ = action_tx.send(Action::SessionLost(e.to_string()));
            }
        }
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = session.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = session.borrow_and_update().clone();
                if current.is_none() {
                    debug!("session cleared");
                    let _ = action_tx.send(Action::SessionLost(
                        "Session expired -- run `propdesk login`".into(),
                    ));
                }
            }
        }
    }

    debug!("data bridge shut down");
}

fn reported_by_watch(had_session: bool, has_session: bool) -> bool {
    had_session && !has_session
}

/// Runs `Desk` calls on behalf of screens.
#[derive(Clone)]
pub struct Requests {
    desk: Desk,
    property: Option<Id>,
    tx: mpsc::UnboundedSender<Action>,
}

impl Requests {
    pub fn new(desk: Desk, property: Option<Id>, tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { desk, property, tx }
    }

    /// Start the call behind `action`. Returns `false` for actions that
    /// aren't requests.
    pub fn dispatch(&self, action: &Action) -> bool {
        match action {
            Action::FetchTasks(token) => {
                let token = *token;
                let filter = ListFilter {
                    property_id: self.property,
                    ..ListFilter::default()
                };
                self.spawn(move |desk| async move {
                    let result = desk.tasks(&filter).await.map_err(|e| e.to_string());
                    Action::TasksLoaded { token, result }
                });
            }

            Action::FetchReport { token, query } => {
                let (token, query) = (*token, query.clone());
                self.spawn(move |desk| async move {
                    let result = desk
                        .report(&query)
                        .await
                        .map(Arc::new)
                        .map_err(|e| e.to_string());
                    Action::ReportLoaded { token, result }
                });
            }

            Action::MoveTask { task_id, status } => {
                let (task_id, status) = (*task_id, status.clone());
                self.spawn(move |desk| async move {
                    let result = desk
                        .update_task_status(task_id, &status)
                        .await
                        .map_err(|e| e.to_string());
                    Action::TaskMoved { task_id, result }
                });
            }

            Action::CreateTask { title, status } => {
                let form = TaskForm {
                    property_id: self.property,
                    title: title.clone(),
                    status: Some(status.clone()),
                    ..TaskForm::default()
                };
                self.spawn(move |desk| async move {
                    Action::TaskCreated(desk.create_task(&form).await.map_err(|e| e.to_string()))
                });
            }

            Action::SetTaskPriority { task, priority } => {
                let form = TaskForm {
                    priority: Some(priority.clone()),
                    ..form_from(task)
                };
                let id = task.id;
                self.spawn(move |desk| async move {
                    Action::TaskUpdated(desk.update_task(id, &form).await.map_err(|e| e.to_string()))
                });
            }

            _ => return false,
        }
        true
    }

    pub fn delete_task(&self, id: Id) {
        self.spawn(move |desk| async move {
            Action::TaskDeleted(desk.delete_task(id).await.map(|()| id).map_err(|e| e.to_string()))
        });
    }

    fn spawn<F, Fut>(&self, call: F)
    where
        F: FnOnce(Desk) -> Fut + Send + 'static,
        Fut: Future<Output = Action> + Send + 'static,
    {
        let desk = self.desk.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = call(desk).await;
            if let Some(message) = failure_message(&action) {
                let _ = tx.send(Action::Notify(Notification::error(message)));
            }
            let _ = tx.send(action);
        });
    }
}

/// Error text of a finished command, for the toast.
fn failure_message(action: &Action) -> Option<String> {
    match action {
        Action::TaskMoved { result: Err(e), .. }
        | Action::TaskCreated(Err(e))
        | Action::TaskUpdated(Err(e))
        | Action::TaskDeleted(Err(e)) => Some(e.clone()),
        _ => None,
    }
}

/// The update body that leaves every field of `task` as it is.
fn form_from(task: &Task) -> TaskForm {
    TaskForm {
        property_id: task.property_id,
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority.clone(),
        status: task.status.clone(),
        assigned_to_id: task.assigned_to_id,
        due_date: task.due_date.clone(),
        ticket_id: task.ticket_id,
        room_id: task.room_id,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use propdesk_core::models::{Priority, TaskStatus};
    use propdesk_core::{MemorySessionStore, Session, TransportConfig};
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Run the bridge against `server` until it settles, and count the
    /// `SessionLost` actions it sent.
    async fn sessions_lost(server: &MockServer, session: Option<Session>) -> usize {
        let store = Arc::new(match session {
            Some(s) => MemorySessionStore::with_session(s),
            None => MemorySessionStore::new(),
        });
        let desk = Desk::new(
            Url::parse(&server.uri()).unwrap(),
            &TransportConfig::default(),
            store,
        )
        .unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(desk, tx, cancel.clone()));

        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
        bridge.await.unwrap();

        let mut lost = 0;
        while let Ok(action) = rx.try_recv() {
            if matches!(action, Action::SessionLost(_)) {
                lost += 1;
            }
        }
        lost
    }

    #[tokio::test]
    async fn rejected_token_is_reported_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/verify-token"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"msg":"Token has expired"}"#))
            .mount(&server)
            .await;

        assert_eq!(sessions_lost(&server, Some(Session::new("abc", "demo"))).await, 1);
    }

    #[tokio::test]
    async fn missing_session_is_reported_once() {
        let server = MockServer::start().await;
        assert_eq!(sessions_lost(&server, None).await, 1);
    }

    #[test]
    fn only_a_cleared_session_is_left_to_the_watch() {
        assert!(reported_by_watch(true, false));
        assert!(!reported_by_watch(false, false));
        assert!(!reported_by_watch(true, true));
    }

    #[test]
    fn form_keeps_every_task_field() {
        let task = Task {
            id: 4,
            property_id: Some(1),
            title: "Fix sink".into(),
            description: Some("Room 12".into()),
            priority: Some(Priority::Low),
            status: Some(TaskStatus::InProgress),
            assigned_to_id: Some(9),
            due_date: Some("2024-03-01".into()),
            ticket_id: Some(5),
            room_id: Some(12),
        };
        let form = form_from(&task);
        assert_eq!(form.title, "Fix sink");
        assert_eq!(form.status, Some(TaskStatus::InProgress));
        assert_eq!(form.assigned_to_id, Some(9));
        assert_eq!(form.ticket_id, Some(5));
        assert_eq!(form.room_id, Some(12));
    }

    #[test]
    fn only_failed_commands_raise_a_toast() {
        assert_eq!(
            failure_message(&Action::TaskDeleted(Err("nope".into()))).as_deref(),
            Some("nope")
        );
        assert!(failure_message(&Action::TaskDeleted(Ok(3))).is_none());
        assert_eq!(
            failure_message(&Action::TaskCreated(Err("Failed to create task".into()))).as_deref(),
            Some("Failed to create task")
        );
        assert!(failure_message(&Action::Tick).is_none());
    }
}
