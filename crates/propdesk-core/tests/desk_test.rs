#![allow(clippy::unwrap_used)]
// End-to-end `Desk` flows against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use propdesk_core::models::{ListFilter, Priority, RoomForm, TicketForm};
use propdesk_core::{
    CoreError, Desk, MemorySessionStore, ReportQuery, RetryPolicy, Session, SessionStore,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn transport() -> TransportConfig {
    TransportConfig::default().with_retry(RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
    })
}

async fn setup(session: Option<Session>) -> (MockServer, Desk, Arc<MemorySessionStore>) {
    let server = MockServer::start().await;
    let store = Arc::new(match session {
        Some(s) => MemorySessionStore::with_session(s),
        None => MemorySessionStore::new(),
    });
    let desk = Desk::new(
        Url::parse(&server.uri()).unwrap(),
        &transport(),
        store.clone(),
    )
    .unwrap();
    (server, desk, store)
}

fn logged_in() -> Option<Session> {
    Some(Session::new("abc", "demo"))
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Login → dashboard ───────────────────────────────────────────────

#[tokio::test]
async fn test_login_then_dashboard_uses_bearer_token() {
    let (server, desk, store) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "demo", "password": "demo123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "user": {"username": "demo"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "/tickets", json!({"tickets": [{"id": 1, "title": "Leak"}]})).await;
    mount_json(&server, "/tasks", json!({"tasks": []})).await;
    mount_json(&server, "/properties", json!([{"id": 1, "name": "Hampton Inn"}])).await;
    mount_json(&server, "/reports/summary", json!({"open_tickets": 1})).await;

    let password: secrecy::SecretString = "demo123".to_string().into();
    let session = desk.login("demo", &password).await.unwrap();
    assert_eq!(session.token, "abc");
    assert_eq!(store.load().unwrap().unwrap().username, "demo");
    assert!(desk.auth().is_authenticated());

    let dashboard = desk.dashboard(None).await.unwrap();
    assert_eq!(dashboard.tickets.len(), 1);
    assert_eq!(dashboard.tickets[0].title, "Leak");
    assert_eq!(dashboard.properties[0].name, "Hampton Inn");
    assert_eq!(dashboard.summary["open_tickets"], 1);
}

#[tokio::test]
async fn test_dashboard_fails_as_a_whole() {
    let (server, desk, _store) = setup(logged_in()).await;

    mount_json(&server, "/tickets", json!([])).await;
    mount_json(&server, "/tasks", json!([])).await;
    mount_json(&server, "/reports/summary", json!({})).await;
    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = desk.dashboard(None).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load properties");
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_form_issues_no_request() {
    let (server, desk, _store) = setup(logged_in()).await;

    let form = TicketForm {
        title: String::new(),
        ..TicketForm::default()
    };
    let err = desk.create_ticket(&form).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "title"));

    let room = RoomForm {
        name: "101".into(),
        capacity: Some(25),
        ..RoomForm::default()
    };
    assert!(desk.create_room(1, &room).await.is_err());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_valid_form_issues_exactly_one_request() {
    let (server, desk, _store) = setup(logged_in()).await;

    Mock::given(method("POST"))
        .and(path("/tickets"))
        .and(body_json(json!({"property_id": 1, "title": "Broken AC", "priority": "High"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "property_id": 1, "title": "Broken AC", "priority": "High"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let form = TicketForm {
        property_id: Some(1),
        title: "Broken AC".into(),
        priority: Some(Priority::High),
        ..TicketForm::default()
    };
    let ticket = desk.create_ticket(&form).await.unwrap();
    assert_eq!(ticket.id, 3);
}

#[tokio::test]
async fn test_server_rejection_surfaces_server_message() {
    let (server, desk, _store) = setup(logged_in()).await;

    Mock::given(method("DELETE"))
        .and(path("/properties/4"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"msg": "Property has open tickets"})),
        )
        .mount(&server)
        .await;

    let err = desk.delete_property(4).await.unwrap_err();
    assert_eq!(err.to_string(), "Property has open tickets");
}

// ── Session invalidation ────────────────────────────────────────────

#[tokio::test]
async fn test_expired_token_logs_the_desk_out() {
    let (server, desk, store) = setup(logged_in()).await;
    let mut rx = desk.auth().subscribe();

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = desk.tasks(&ListFilter::default()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    assert!(store.load().unwrap().is_none());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
    assert!(!desk.auth().is_authenticated());
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_applies_fallback_filter_and_links() {
    let (server, desk, _store) = setup(logged_in()).await;

    // Server ignores room_id and returns everything.
    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(query_param("room_id", "101"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tickets": [
            {"id": 5, "title": "Leak", "room_id": 101},
            {"id": 6, "title": "Noise", "room_id": 102}
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tasks": [
            {"id": 7, "title": "Fix leak", "room_id": 101, "ticket_id": 5, "status": "pending"}
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/service-requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"requests": [
            {"id": 9, "room_id": 101, "request_type": "Towels"}
        ]})))
        .mount(&server)
        .await;

    let query = ReportQuery {
        property_id: Some(1),
        date: Some("2024-05-01".into()),
        room_id: Some(101),
        assigned_to_id: None,
    };
    let data = desk.report(&query).await.unwrap();

    assert_eq!(data.rows.tickets.len(), 1);
    assert_eq!(data.rows.tickets[0].id, 5);
    assert_eq!(data.related["task_7"].tickets.len(), 1);
    assert_eq!(data.related["task_7"].requests[0].id, 9);
    assert_eq!(data.related["ticket_5"].total(), 2);
}

#[tokio::test]
async fn test_task_move_rejects_unknown_status() {
    let (server, desk, _store) = setup(logged_in()).await;

    let status = propdesk_core::models::TaskStatus::parse("archived");
    assert!(desk.update_task_status(1, &status).await.is_err());
    assert!(server.received_requests().await.unwrap().is_empty());
}
