#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use propdesk_api::models::{ListFilter, TaskStatus, TicketForm};
use propdesk_api::{
    ApiClient, Error, MemorySessionStore, RetryPolicy, Session, SessionListener, SessionStore,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn fast_transport() -> TransportConfig {
    TransportConfig::default().with_retry(RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
    })
}

async fn setup_with(store: Arc<MemorySessionStore>) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::new(base_url, &fast_transport(), store).unwrap();
    (server, client)
}

async fn setup_logged_in() -> (MockServer, ApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::with_session(Session::new("abc", "demo")));
    let (server, client) = setup_with(Arc::clone(&store)).await;
    (server, client, store)
}

#[derive(Default)]
struct CountingListener {
    calls: AtomicUsize,
}

impl SessionListener for CountingListener {
    fn session_invalidated(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Bearer token ────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_header_attached_from_store() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/tickets"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let tickets = client.list_tickets(&ListFilter::default()).await.unwrap();
    assert!(tickets.is_empty());
}

#[tokio::test]
async fn test_no_header_without_session() {
    let (server, client) = setup_with(Arc::new(MemorySessionStore::new())).await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.list_properties().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

// ── Session invalidation ────────────────────────────────────────────

#[tokio::test]
async fn test_401_clears_session_and_next_request_is_anonymous() {
    let (server, client, store) = setup_logged_in().await;
    let listener = Arc::new(CountingListener::default());
    let client = client.with_listener(listener.clone());

    Mock::given(method("GET"))
        .and(path("/tickets"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Token expired"})))
        .mount(&server)
        .await;

    let result = client.list_tickets(&ListFilter::default()).await;
    assert!(
        matches!(result, Err(Error::AuthenticationRequired)),
        "expected AuthenticationRequired, got: {result:?}"
    );
    assert!(store.load().unwrap().is_none());
    assert_eq!(listener.calls.load(Ordering::SeqCst), 1);

    let _ = client.list_tickets(&ListFilter::default()).await;
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.contains_key("authorization"));
    assert!(!requests[1].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_422_also_invalidates_session() {
    let (server, client, store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let err = client.list_tasks(&ListFilter::default()).await.unwrap_err();
    assert!(err.is_auth_expired());
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_login_rejection_leaves_store_alone() {
    let (server, client, store) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Invalid credentials"})))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("demo", &secret).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(store.load().unwrap().is_some());
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let (server, client) = setup_with(Arc::new(MemorySessionStore::new())).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "demo", "password": "demo123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "user": {"id": 1, "username": "demo", "role": "manager"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "demo123".to_string().into();
    let resp = client.login("demo", &secret).await.unwrap();
    assert_eq!(resp.token.as_deref(), Some("abc"));
    assert_eq!(resp.user.unwrap().username, "demo");
}

// ── Retries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_retried_three_times_then_fails() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(4)
        .mount(&server)
        .await;

    let err = client.list_properties().await.unwrap_err();
    match err {
        Error::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("boom"));
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_recovers_on_retry() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": [{"id": 1, "name": "Hampton Inn Downtown", "status": "active"}]
        })))
        .mount(&server)
        .await;

    let properties = client.list_properties().await.unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name, "Hampton Inn Downtown");
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/tickets/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"msg": "Ticket not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_ticket(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Ticket not found"));
}

// ── Envelopes & endpoints ───────────────────────────────────────────

#[tokio::test]
async fn test_list_filters_become_query_params() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("property_id", "3"))
        .and(query_param("date", "2024-05-01"))
        .and(query_param("assigned_to_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tasks": [
                {"id": 1, "title": "Replace filter", "status": "pending", "assigned_to_id": 7},
                {"id": 2, "title": "Paint hallway", "status": "in progress", "assigned_to_id": 7}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = ListFilter {
        property_id: Some(3),
        date: Some("2024-05-01".into()),
        room_id: None,
        assigned_to_id: Some(7),
    };
    let tasks = client.list_tasks(&filter).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].status, Some(TaskStatus::InProgress));
}

#[tokio::test]
async fn test_create_ticket_sends_form_and_unwraps_record() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("POST"))
        .and(path("/tickets"))
        .and(body_json(json!({"property_id": 1, "title": "Broken AC", "priority": "High"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ticket": {"id": 10, "property_id": 1, "title": "Broken AC", "priority": "High"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let form = TicketForm {
        property_id: Some(1),
        title: "Broken AC".into(),
        priority: Some(propdesk_api::models::Priority::High),
        ..TicketForm::default()
    };
    let ticket = client.create_ticket(&form).await.unwrap();
    assert_eq!(ticket.id, 10);
}

#[tokio::test]
async fn test_update_task_status_patches_status_only() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/tasks/4"))
        .and(body_json(json!({"status": "completed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "title": "Clean lobby", "status": "completed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .update_task_status(4, &TaskStatus::Completed)
        .await
        .unwrap();
    assert_eq!(task.status, Some(TaskStatus::Completed));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/properties/2/rooms/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_room(2, 5).await.unwrap();
}

#[tokio::test]
async fn test_managers_use_role_query() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "manager"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "username": "maria", "role": "manager"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let managers = client.list_managers().await.unwrap();
    assert_eq!(managers[0].username, "maria");
}

#[tokio::test]
async fn test_settings_round_trip_as_json() {
    let (server, client, _store) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/settings/sms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"enabled": true})))
        .mount(&server)
        .await;

    let sms = client
        .get_settings(propdesk_api::SettingsSection::Sms)
        .await
        .unwrap();
    assert_eq!(sms["enabled"], true);
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_unreachable_server_is_connectivity_error() {
    let store = Arc::new(MemorySessionStore::new());
    let transport = TransportConfig::default().with_retry(RetryPolicy::none());
    let client = ApiClient::new(
        Url::parse("http://127.0.0.1:1/api").unwrap(),
        &transport,
        store,
    )
    .unwrap();

    let err = client.list_properties().await.unwrap_err();
    assert!(
        matches!(err, Error::Connectivity { .. }),
        "expected Connectivity error, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_slow_response_is_timeout_error() {
    let store = Arc::new(MemorySessionStore::new());
    let server = MockServer::start().await;
    let transport = TransportConfig::default()
        .with_timeout(Duration::from_millis(50))
        .with_retry(RetryPolicy::none());
    let client = ApiClient::new(Url::parse(&server.uri()).unwrap(), &transport, store).unwrap();

    Mock::given(method("GET"))
        .and(path("/properties"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = client.list_properties().await.unwrap_err();
    assert!(
        matches!(err, Error::Timeout { .. }),
        "expected Timeout error, got: {err:?}"
    );
}
