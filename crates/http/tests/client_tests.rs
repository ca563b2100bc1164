//! Integration tests for the CRM HTTP client

use crm_http::client::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};
use crm_http::{
    ApiResponse, BusyIndicator, BuildError, CrmClient, CrmClientBuilder, MemoryTokenStore,
    Navigator, Notifier, RequestError, Severity, TokenStore, TransactionStatus,
};
use mockall::mock;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mock! {
    pub Navigator {}

    impl Navigator for Navigator {
        fn redirect_to(&self, path: &str);
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, String, Severity)>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<(String, String, Severity)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string(), severity));
    }
}

#[derive(Default)]
struct CountingBusy {
    begun: AtomicUsize,
    ended: AtomicUsize,
}

impl BusyIndicator for CountingBusy {
    fn begin(&self) {
        self.begun.fetch_add(1, Ordering::SeqCst);
    }

    fn end(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    client: CrmClient,
    store: Arc<MemoryTokenStore>,
    notifier: Arc<RecordingNotifier>,
    busy: Arc<CountingBusy>,
}

fn harness(base_url: &str, navigator: MockNavigator) -> Harness {
    build_harness(CrmClient::builder().base_url(base_url), navigator)
}

/// Harness whose requests give up after a short client-side timeout
fn impatient_harness(base_url: &str, navigator: MockNavigator) -> Harness {
    let builder = CrmClient::builder()
        .base_url(base_url)
        .timeout(Duration::from_millis(300));
    build_harness(builder, navigator)
}

fn build_harness(builder: CrmClientBuilder, navigator: MockNavigator) -> Harness {
    let _ = crm_core::tracing::init_tracing(&crm_core::tracing::InstrumentationConfig::dev());

    let store = Arc::new(MemoryTokenStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let busy = Arc::new(CountingBusy::default());
    let client = builder
        .token_store(store.clone())
        .notifier(notifier.clone())
        .busy_indicator(busy.clone())
        .navigator(Arc::new(navigator))
        .build()
        .unwrap();

    Harness {
        client,
        store,
        notifier,
        busy,
    }
}

fn never_redirects() -> MockNavigator {
    let mut navigator = MockNavigator::new();
    navigator.expect_redirect_to().times(0);
    navigator
}

fn redirects_to_login_once() -> MockNavigator {
    let mut navigator = MockNavigator::new();
    navigator
        .expect_redirect_to()
        .withf(|path| path == "/login/")
        .times(1)
        .return_const(());
    navigator
}

fn sign_in(store: &MemoryTokenStore, access: &str, refresh: &str) {
    store.set(ACCESS_TOKEN_KEY, access);
    store.set(REFRESH_TOKEN_KEY, refresh);
    store.set(USER_KEY, r#"{"id":7,"username":"alice"}"#);
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = CrmClient::builder().build();
    assert!(matches!(result, Err(BuildError::Configuration(_))));
}

#[tokio::test]
async fn test_success_returns_body_unchanged() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    let body = json!({"results": [{"id": 1, "name": "Acme"}], "count": 1});
    Mock::given(method("GET"))
        .and(path("/api/accounts/"))
        .and(header("authorization", "Bearer abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = h.client.get("accounts/").await.unwrap();

    assert_eq!(response, ApiResponse::Json(body));
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.busy.begun.load(Ordering::SeqCst), 1);
    assert_eq!(h.busy.ended.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_token_is_sent_as_null_bearer() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());

    Mock::given(method("GET"))
        .and(path("/api/leads/"))
        .and(header("authorization", "Bearer null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = h.client.get("leads/").await.unwrap();
    assert_eq!(response.into_json(), Some(json!([])));
}

#[tokio::test]
async fn test_non_json_success_is_returned_as_text() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());

    Mock::given(method("GET"))
        .and(path("/api/export/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("id,name\n1,Acme", "text/csv"))
        .mount(&mock_server)
        .await;

    let response = h.client.get("export/").await.unwrap();
    assert_eq!(response, ApiResponse::Text("id,name\n1,Acme".to_string()));
}

#[tokio::test]
async fn test_post_sends_exact_payload_and_get_sends_none() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("POST"))
        .and(path("/api/contacts/"))
        .and(body_string(r#"{"email":"a@b.com"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/contacts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = h
        .client
        .post("contacts/", &json!({"email": "a@b.com"}))
        .await
        .unwrap();
    assert_eq!(created.into_json(), Some(json!({"id": 3})));

    h.client.get("contacts/").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let get = requests
        .iter()
        .find(|request| request.method.as_str() == "GET")
        .unwrap();
    assert!(get.body.is_empty());
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_replayed_once() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "old", "r1");

    Mock::given(method("GET"))
        .and(path("/api/deals/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({"refresh": "r1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/deals/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 9}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = h.client.get("deals/").await.unwrap();

    assert_eq!(response.into_json(), Some(json!([{"id": 9}])));
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("new"));
    assert_eq!(h.store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
    assert!(h.notifier.messages().is_empty());
    // One busy cycle per attempt; the refresh itself shows none
    assert_eq!(h.busy.begun.load(Ordering::SeqCst), 2);
    assert_eq!(h.busy.ended.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_replay_network_failure_still_ends_busy_cycle() {
    let mock_server = MockServer::start().await;
    let h = impatient_harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "old", "r1");

    Mock::given(method("GET"))
        .and(path("/api/deals/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/deals/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = h.client.get("deals/").await;

    assert!(matches!(result, Err(RequestError::Network(_))));
    assert_eq!(h.busy.begun.load(Ordering::SeqCst), 2);
    assert_eq!(h.busy.ended.load(Ordering::SeqCst), 2);
    assert_eq!(
        h.notifier.messages(),
        vec![(
            "Error".to_string(),
            "Network error occurred".to_string(),
            Severity::Error
        )]
    );
    // The refresh succeeded, so the session survives the failed replay
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("new"));
}

#[tokio::test]
async fn test_refresh_transport_failure_clears_session_and_redirects() {
    let mock_server = MockServer::start().await;
    let h = impatient_harness(&mock_server.uri(), redirects_to_login_once());
    sign_in(&h.store, "old", "r1");

    Mock::given(method("GET"))
        .and(path("/api/contacts/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "new"}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = h.client.get("contacts/").await;

    assert!(matches!(result, Err(RequestError::AuthExpired)));
    assert!(h.store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(h.store.get(REFRESH_TOKEN_KEY).is_none());
    assert!(h.store.get(USER_KEY).is_none());
}

#[tokio::test]
async fn test_rejected_refresh_clears_session_and_redirects() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), redirects_to_login_once());
    sign_in(&h.store, "old", "stale");

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "invalid"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = h.client.get("tasks/").await;

    assert!(matches!(result, Err(RequestError::AuthExpired)));
    assert!(h.store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(h.store.get(REFRESH_TOKEN_KEY).is_none());
    assert!(h.store.get(USER_KEY).is_none());
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), redirects_to_login_once());
    h.store.set(ACCESS_TOKEN_KEY, "old");

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = h.client.get("tasks/").await;

    assert!(matches!(result, Err(RequestError::AuthExpired)));
    assert!(h.store.get(ACCESS_TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_failed_replay_is_reported_without_second_refresh() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "old", "r1");

    Mock::given(method("GET"))
        .and(path("/api/accounts/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = h.client.get("accounts/").await;

    match result {
        Err(RequestError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(
        h.notifier.messages(),
        vec![("Error".to_string(), "boom".to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn test_replay_rejected_again_redirects_once() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), redirects_to_login_once());
    sign_in(&h.store, "old", "r1");

    Mock::given(method("GET"))
        .and(path("/api/accounts/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "nope"})))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "new"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = h.client.get("accounts/").await;

    assert!(matches!(result, Err(RequestError::AuthExpired)));
    assert_eq!(h.notifier.messages().len(), 1);
}

#[tokio::test]
async fn test_error_body_message_is_notified() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("POST"))
        .and(path("/api/leads/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"non_field_errors": ["Email taken", "Phone invalid"]})),
        )
        .mount(&mock_server)
        .await;

    let result = h.client.post("leads/", &json!({"email": "x"})).await;

    assert!(matches!(result, Err(RequestError::Server { status: 400, .. })));
    assert_eq!(
        h.notifier.messages(),
        vec![(
            "Error".to_string(),
            "Email taken, Phone invalid".to_string(),
            Severity::Error
        )]
    );
}

#[tokio::test]
async fn test_html_error_page_is_undecodable() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("GET"))
        .and(path("/api/dashboard/"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("<html>oops</html>", "text/html"))
        .mount(&mock_server)
        .await;

    let result = h.client.get("dashboard/").await;

    assert!(matches!(result, Err(RequestError::Undecodable { status: 500 })));
    assert_eq!(
        h.notifier.messages(),
        vec![("Error".to_string(), "Server error".to_string(), Severity::Error)]
    );
}

#[tokio::test]
async fn test_network_failure_is_notified() {
    let h = harness("http://127.0.0.1:1", never_redirects());

    let result = h.client.get("leads/").await;

    assert!(matches!(result, Err(RequestError::Network(_))));
    assert_eq!(
        h.notifier.messages(),
        vec![(
            "Error".to_string(),
            "Network error occurred".to_string(),
            Severity::Error
        )]
    );
    assert_eq!(h.busy.begun.load(Ordering::SeqCst), 1);
    assert_eq!(h.busy.ended.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_starts_session_without_bearer() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());

    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1",
            "user": {"id": 7, "username": "alice", "email": "alice@example.com"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = h.client.login("alice", "pw").await.unwrap();

    assert_eq!(user.id, 7);
    assert_eq!(user.username, "alice");
    assert_eq!(h.store.get(ACCESS_TOKEN_KEY).as_deref(), Some("a1"));
    assert_eq!(h.store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
    assert_eq!(h.client.current_user().map(|u| u.email), Some("alice@example.com".to_string()));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_rejected_login_does_not_redirect() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());

    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = h.client.login("alice", "wrong").await;

    assert!(matches!(result, Err(RequestError::Server { status: 401, .. })));
    assert!(!h.client.session().is_authenticated());
    assert_eq!(h.notifier.messages()[0].1, "Invalid credentials");
}

#[tokio::test]
async fn test_logout_clears_session_and_redirects() {
    let h = harness("http://localhost:8000", redirects_to_login_once());
    sign_in(&h.store, "abc", "r1");

    h.client.logout();

    assert!(h.store.get(ACCESS_TOKEN_KEY).is_none());
    assert!(h.store.get(REFRESH_TOKEN_KEY).is_none());
    assert!(h.client.current_user().is_none());
}

#[tokio::test]
async fn test_dashboard_is_scoped_to_user() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "role": "sales", "manager_username": "boss man"
        })))
        .mount(&mock_server)
        .await;

    let collection = |records: serde_json::Value| {
        ResponseTemplate::new(200).set_body_json(json!({"count": 0, "results": records}))
    };
    let routes = [
        ("/api/dashboard/", ResponseTemplate::new(200).set_body_json(json!({
            "recent_leads": [],
            "recent_deals": [{"id": 50, "manager_username": "boss man", "assigned_to": null}],
            "upcoming_tasks": []
        }))),
        ("/api/leads/", collection(json!([
            {"id": 1, "manager_username": "boss man", "created_at": "2024-01-01T00:00:00Z"},
            {
                "id": 2,
                "manager_username": "boss man",
                "assigned_to": 7,
                "created_at": "2024-02-01T00:00:00Z"
            },
            {"id": 3, "manager_username": "boss man", "assigned_to": 8},
            {"id": 4, "manager_username": "someone", "assigned_to": 7}
        ]))),
        ("/api/contacts/", ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "manager_username": "boss man", "assigned_to": {"id": 7}}
        ]))),
        ("/api/accounts/", collection(json!([]))),
        ("/api/deals/", collection(json!([
            {"id": 60, "manager_username": "boss man", "assigned_to": 7}
        ]))),
        ("/api/tasks/", collection(json!([
            {"id": 1, "manager_username": "boss man", "assigned_to": "alice",
             "due_date": "2024-03-02"},
            {"id": 2, "manager_username": "boss man", "assigned_to": {"id": 7},
             "due_date": "2024-03-01"},
            {"id": 3, "manager_username": "boss man", "due_date": "2024-01-01"}
        ]))),
    ];
    for (route, template) in routes {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("manager_username", "boss man"))
            .respond_with(template)
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let summary = h.client.load_dashboard().await;

    assert_eq!(summary.leads_count, 2);
    assert_eq!(summary.contacts_count, 1);
    assert_eq!(summary.accounts_count, 0);
    assert_eq!(summary.deals_count, 1);
    let lead_ids: Vec<_> = summary.recent_leads.iter().map(|l| l["id"].clone()).collect();
    assert_eq!(lead_ids, vec![json!(2), json!(1)]);
    assert_eq!(summary.recent_deals[0]["id"], json!(50));
    let task_ids: Vec<_> = summary.upcoming_tasks.iter().map(|t| t["id"].clone()).collect();
    assert_eq!(task_ids, vec![json!(2), json!(1)]);
}

#[tokio::test]
async fn test_dashboard_without_manager_is_empty() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("GET"))
        .and(path("/api/profile/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "manager_username": null})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let summary = h.client.load_dashboard().await;
    assert_eq!(summary, crm_http::client::dashboard::DashboardSummary::default());
}

#[tokio::test]
async fn test_transaction_detail_is_typed() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("GET"))
        .and(path("/api/transactions/42/"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "transaction_type": "payment",
            "transaction_type_display": "Payment",
            "amount": "250.00",
            "date": "2024-05-10",
            "status": "completed",
            "reference_number": null,
            "description": "Second instalment",
            "account_name": "Acme",
            "deal_name": "Renewal"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transaction = h.client.transaction(42).await.unwrap();

    assert_eq!(transaction.transaction_type_display, "Payment");
    assert_eq!(transaction.amount_label(), "$250.00");
    assert_eq!(transaction.status, TransactionStatus::Completed);
    assert_eq!(transaction.status.css_class(), Some("status-completed"));
    assert_eq!(transaction.reference_label(), "N/A");
    assert_eq!(transaction.description_text(), Some("Second instalment"));
    assert_eq!(transaction.deal_label(), Some("Renewal"));
}

#[tokio::test]
async fn test_missing_transaction_is_notified() {
    let mock_server = MockServer::start().await;
    let h = harness(&mock_server.uri(), never_redirects());
    sign_in(&h.store, "abc", "r1");

    Mock::given(method("GET"))
        .and(path("/api/transactions/7/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&mock_server)
        .await;

    let result = h.client.transaction(7).await;

    assert!(matches!(result, Err(RequestError::Server { status: 404, .. })));
    assert_eq!(h.notifier.messages()[0].1, "Not found.");
}
