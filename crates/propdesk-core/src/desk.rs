// ── Desk facade ──
//
// The entry point for consumers. Owns the API client and the auth
// context, validates forms before any request goes out, and turns API
// errors into user-facing `CoreError`s with a per-operation fallback
// message. Multi-collection views fetch jointly with `tokio::try_join!`.

use std::sync::Arc;

use propdesk_api::models::{
    AuthUser, HistoryEntry, Id, ListFilter, Property, PropertyForm, Registration, Room, RoomForm,
    ServiceRequest, ServiceRequestForm, Task, TaskForm, TaskStatus, Ticket, TicketForm, User,
    UserForm,
};
use propdesk_api::{ApiClient, Session, SessionStore, SettingsSection, TransportConfig};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::auth::AuthContext;
use crate::error::{CoreError, Operation};
use crate::report::{ReportData, ReportQuery, ReportRows};
use crate::validate::Validate;

/// Everything the dashboard shows, fetched in one go.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub tickets: Vec<Ticket>,
    pub tasks: Vec<Task>,
    pub properties: Vec<Property>,
    pub summary: Value,
}

/// Data behind task assignment: who can take what.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentData {
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub tickets: Vec<Ticket>,
    pub managers: Vec<User>,
}

/// The main entry point for consumers. Cheaply cloneable.
#[derive(Clone)]
pub struct Desk {
    inner: Arc<DeskInner>,
}

struct DeskInner {
    api: ApiClient,
    auth: AuthContext,
}

fn op(verb: &'static str, entity: &'static str) -> impl FnOnce(propdesk_api::Error) -> CoreError {
    move |err| CoreError::from_api(err, Operation::new(verb, entity))
}

impl Desk {
    /// Build a desk against `base_url`, reading the persisted session from `store`.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, CoreError> {
        let auth = AuthContext::load(Arc::clone(&store))?;
        let api = ApiClient::new(base_url, transport, store)?.with_listener(Arc::new(auth.clone()));
        Ok(Self {
            inner: Arc::new(DeskInner { api, auth }),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in and persist the returned token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, CoreError> {
        if username.trim().is_empty() {
            return Err(CoreError::validation("username", "is required"));
        }
        let resp = self
            .inner
            .api
            .login(username, password)
            .await
            .map_err(op("log", "in"))?;
        let token = resp.token.ok_or_else(|| CoreError::AuthenticationFailed {
            message: resp
                .msg
                .clone()
                .unwrap_or_else(|| "server response did not include a token".into()),
        })?;
        let name = resp.user.map_or_else(|| username.to_owned(), |u| u.username);
        let session = Session::new(token, name);
        self.inner.auth.login(session.clone())?;
        Ok(session)
    }

    /// Register an account. Logs in when the server returns a token.
    pub async fn register(&self, registration: &Registration) -> Result<Option<Session>, CoreError> {
        registration.validate()?;
        let resp = self
            .inner
            .api
            .register(registration)
            .await
            .map_err(op("register", "account"))?;
        info!(username = %registration.username, "registered");
        match resp.token {
            Some(token) => {
                let name = resp
                    .user
                    .map_or_else(|| registration.username.clone(), |u| u.username);
                let session = Session::new(token, name);
                self.inner.auth.login(session.clone())?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    pub fn logout(&self) -> Result<(), CoreError> {
        self.inner.auth.logout()
    }

    /// Confirm the stored token is still accepted.
    pub async fn verify(&self) -> Result<AuthUser, CoreError> {
        self.require_session()?;
        self.inner
            .api
            .verify_token()
            .await
            .map_err(op("verify", "session"))
    }

    /// Whether the next registration will be the first account.
    pub async fn check_first_user(&self) -> Result<bool, CoreError> {
        let status = self
            .inner
            .api
            .check_first_user()
            .await
            .map_err(op("check", "first user"))?;
        Ok(status.is_first_user)
    }

    fn require_session(&self) -> Result<(), CoreError> {
        if self.inner.auth.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    // ── Properties ───────────────────────────────────────────────────

    pub async fn properties(&self) -> Result<Vec<Property>, CoreError> {
        self.inner
            .api
            .list_properties()
            .await
            .map_err(op("load", "properties"))
    }

    pub async fn property(&self, id: Id) -> Result<Property, CoreError> {
        self.inner
            .api
            .get_property(id)
            .await
            .map_err(op("load", "property"))
    }

    pub async fn create_property(&self, form: &PropertyForm) -> Result<Property, CoreError> {
        form.validate()?;
        self.inner
            .api
            .create_property(form)
            .await
            .map_err(op("create", "property"))
    }

    pub async fn update_property(&self, id: Id, form: &PropertyForm) -> Result<Property, CoreError> {
        form.validate()?;
        self.inner
            .api
            .update_property(id, form)
            .await
            .map_err(op("update", "property"))
    }

    pub async fn delete_property(&self, id: Id) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_property(id)
            .await
            .map_err(op("delete", "property"))
    }

    // ── Rooms ────────────────────────────────────────────────────────

    pub async fn rooms(&self, property_id: Id) -> Result<Vec<Room>, CoreError> {
        self.inner
            .api
            .list_rooms(property_id)
            .await
            .map_err(op("load", "rooms"))
    }

    pub async fn create_room(&self, property_id: Id, form: &RoomForm) -> Result<Room, CoreError> {
        form.validate()?;
        self.inner
            .api
            .create_room(property_id, form)
            .await
            .map_err(op("create", "room"))
    }

    pub async fn update_room(&self, property_id: Id, id: Id, form: &RoomForm) -> Result<Room, CoreError> {
        form.validate()?;
        self.inner
            .api
            .update_room(property_id, id, form)
            .await
            .map_err(op("update", "room"))
    }

    pub async fn delete_room(&self, property_id: Id, id: Id) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_room(property_id, id)
            .await
            .map_err(op("delete", "room"))
    }

    // ── Tickets ──────────────────────────────────────────────────────

    pub async fn tickets(&self, filter: &ListFilter) -> Result<Vec<Ticket>, CoreError> {
        self.inner
            .api
            .list_tickets(filter)
            .await
            .map_err(op("load", "tickets"))
    }

    pub async fn ticket(&self, id: Id) -> Result<Ticket, CoreError> {
        self.inner
            .api
            .get_ticket(id)
            .await
            .map_err(op("load", "ticket"))
    }

    pub async fn create_ticket(&self, form: &TicketForm) -> Result<Ticket, CoreError> {
        form.validate()?;
        self.inner
            .api
            .create_ticket(form)
            .await
            .map_err(op("create", "ticket"))
    }

    pub async fn update_ticket(&self, id: Id, form: &TicketForm) -> Result<Ticket, CoreError> {
        form.validate()?;
        self.inner
            .api
            .update_ticket(id, form)
            .await
            .map_err(op("update", "ticket"))
    }

    pub async fn delete_ticket(&self, id: Id) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_ticket(id)
            .await
            .map_err(op("delete", "ticket"))
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub async fn tasks(&self, filter: &ListFilter) -> Result<Vec<Task>, CoreError> {
        self.inner
            .api
            .list_tasks(filter)
            .await
            .map_err(op("load", "tasks"))
    }

    pub async fn task(&self, id: Id) -> Result<Task, CoreError> {
        self.inner
            .api
            .get_task(id)
            .await
            .map_err(op("load", "task"))
    }

    pub async fn create_task(&self, form: &TaskForm) -> Result<Task, CoreError> {
        form.validate()?;
        self.inner
            .api
            .create_task(form)
            .await
            .map_err(op("create", "task"))
    }

    pub async fn update_task(&self, id: Id, form: &TaskForm) -> Result<Task, CoreError> {
        form.validate()?;
        self.inner
            .api
            .update_task(id, form)
            .await
            .map_err(op("update", "task"))
    }

    /// Move a task to another board column.
    pub async fn update_task_status(&self, id: Id, status: &TaskStatus) -> Result<Task, CoreError> {
        if !status.is_known() {
            return Err(CoreError::validation(
                "status",
                format!("'{status}' is not a board column"),
            ));
        }
        debug!(id, %status, "moving task");
        self.inner
            .api
            .update_task_status(id, status)
            .await
            .map_err(op("update", "task status"))
    }

    pub async fn delete_task(&self, id: Id) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_task(id)
            .await
            .map_err(op("delete", "task"))
    }

    // ── Service requests ─────────────────────────────────────────────

    pub async fn service_requests(&self, filter: &ListFilter) -> Result<Vec<ServiceRequest>, CoreError> {
        self.inner
            .api
            .list_service_requests(filter)
            .await
            .map_err(op("load", "service requests"))
    }

    pub async fn service_request(&self, id: Id) -> Result<ServiceRequest, CoreError> {
        self.inner
            .api
            .get_service_request(id)
            .await
            .map_err(op("load", "service request"))
    }

    pub async fn create_service_request(&self, form: &ServiceRequestForm) -> Result<ServiceRequest, CoreError> {
        form.validate()?;
        self.inner
            .api
            .create_service_request(form)
            .await
            .map_err(op("create", "service request"))
    }

    pub async fn update_service_request(
        &self,
        id: Id,
        form: &ServiceRequestForm,
    ) -> Result<ServiceRequest, CoreError> {
        form.validate()?;
        self.inner
            .api
            .update_service_request(id, form)
            .await
            .map_err(op("update", "service request"))
    }

    // ── Users ────────────────────────────────────────────────────────

    pub async fn users(&self) -> Result<Vec<User>, CoreError> {
        self.inner
            .api
            .list_users()
            .await
            .map_err(op("load", "users"))
    }

    pub async fn managers(&self) -> Result<Vec<User>, CoreError> {
        self.inner
            .api
            .list_managers()
            .await
            .map_err(op("load", "managers"))
    }

    pub async fn user(&self, id: Id) -> Result<User, CoreError> {
        self.inner
            .api
            .get_user(id)
            .await
            .map_err(op("load", "user"))
    }

    /// Create a user. A password is required for new accounts.
    pub async fn create_user(&self, form: &UserForm) -> Result<User, CoreError> {
        form.validate()?;
        if form.password.as_deref().is_none_or(|p| p.trim().is_empty()) {
            return Err(CoreError::validation("password", "is required"));
        }
        self.inner
            .api
            .create_user(form)
            .await
            .map_err(op("create", "user"))
    }

    pub async fn update_user(&self, id: Id, form: &UserForm) -> Result<User, CoreError> {
        form.validate()?;
        self.inner
            .api
            .update_user(id, form)
            .await
            .map_err(op("update", "user"))
    }

    pub async fn delete_user(&self, id: Id) -> Result<(), CoreError> {
        self.inner
            .api
            .delete_user(id)
            .await
            .map_err(op("delete", "user"))
    }

    // ── Aggregate views ──────────────────────────────────────────────

    /// Tickets, tasks, properties, and the report summary, fetched jointly.
    pub async fn dashboard(&self, property_id: Option<Id>) -> Result<Dashboard, CoreError> {
        let filter = ListFilter {
            property_id,
            ..ListFilter::default()
        };
        let summary = async {
            self.inner
                .api
                .report_summary(property_id)
                .await
                .map_err(op("load", "report summary"))
        };
        let (tickets, tasks, properties, summary) = tokio::try_join!(
            self.tickets(&filter),
            self.tasks(&filter),
            self.properties(),
            summary,
        )?;
        Ok(Dashboard {
            tickets,
            tasks,
            properties,
            summary,
        })
    }

    /// Fetch a report's three collections, re-apply the room / assignee
    /// filters locally, and build the related-items index.
    pub async fn report(&self, query: &ReportQuery) -> Result<ReportData, CoreError> {
        let filter = query.list_filter();
        let (tickets, tasks, requests) = tokio::try_join!(
            self.tickets(&filter),
            self.tasks(&filter),
            self.service_requests(&filter),
        )?;
        let data = ReportData::assemble(
            ReportRows {
                tickets,
                tasks,
                requests,
            },
            &query.fallback_filter(),
        );
        debug!(related = data.related.len(), "report assembled");
        Ok(data)
    }

    /// Tasks, users, tickets, and managers, fetched jointly.
    pub async fn assignment_data(&self) -> Result<AssignmentData, CoreError> {
        let all = ListFilter::default();
        let (tasks, users, tickets, managers) = tokio::try_join!(
            self.tasks(&all),
            self.users(),
            self.tickets(&all),
            self.managers(),
        )?;
        Ok(AssignmentData {
            tasks,
            users,
            tickets,
            managers,
        })
    }

    // ── Settings & history ───────────────────────────────────────────

    pub async fn settings(&self, section: SettingsSection) -> Result<Value, CoreError> {
        self.inner
            .api
            .get_settings(section)
            .await
            .map_err(op("load", "settings"))
    }

    pub async fn update_settings(&self, section: SettingsSection, values: &Value) -> Result<Value, CoreError> {
        if !values.is_object() {
            return Err(CoreError::validation("settings", "must be a JSON object"));
        }
        self.inner
            .api
            .put_settings(section, values)
            .await
            .map_err(op("update", "settings"))
    }

    pub async fn history(&self, entity_type: Option<&str>, entity_id: Option<Id>) -> Result<Vec<HistoryEntry>, CoreError> {
        self.inner
            .api
            .history(entity_type, entity_id)
            .await
            .map_err(op("load", "history"))
    }
}
