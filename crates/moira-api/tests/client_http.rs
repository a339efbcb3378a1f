//! HTTP behavior of the gateway against an in-process mock API.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use moira_api::{ApiError, MoiraClient, LOGIN_HEADER};
use moira_core::{GlobalSettings, SilentPattern, SilentPatternList, SilentPatternType};
use tokio::net::TcpListener;

/// A request seen by the mock.
#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    login: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

/// Mock API answering every path with a canned response.
struct MockApi {
    addr: SocketAddr,
    state: MockState,
}

impl MockApi {
    async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(record).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    fn respond(&self, path: &str, status: StatusCode, body: &str) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    fn client(&self) -> MoiraClient {
        MoiraClient::new(format!("http://{}/api", self.addr)).unwrap()
    }

    fn last(&self) -> Recorded {
        self.state.seen.lock().unwrap().last().cloned().unwrap()
    }
}

async fn record(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let path = uri.path().to_string();
    state.seen.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_string),
        login: headers
            .get(LOGIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    let (status, body) = state
        .routes
        .lock()
        .unwrap()
        .get(&path)
        .cloned()
        .unwrap_or((StatusCode::OK, "{}".to_string()));
    Response::builder()
        .status(status)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn success_parses_the_body() {
    let mock = MockApi::start().await;
    mock.respond("/api/tag", StatusCode::OK, r#"{"list":["prod","db"]}"#);

    let tags = mock.client().get_tag_list().await.unwrap();
    assert_eq!(tags.list, vec!["prod", "db"]);

    let seen = mock.last();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/api/tag");
}

#[tokio::test]
async fn error_envelope_message_is_surfaced() {
    let mock = MockApi::start().await;
    mock.respond("/api/trigger/x", StatusCode::NOT_FOUND, r#"{"error":"X"}"#);

    let err = mock.client().get_trigger("x").await.unwrap_err();
    assert_eq!(err.to_string(), "X");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn plain_text_error_is_surfaced_verbatim() {
    let mock = MockApi::start().await;
    mock.respond("/api/contact", StatusCode::INTERNAL_SERVER_ERROR, "plain text");

    let err = mock.client().get_contact_list().await.unwrap_err();
    assert!(matches!(err, ApiError::Remote { status: 500, .. }));
    assert_eq!(err.to_string(), "plain text");
}

#[tokio::test]
async fn void_endpoints_ignore_the_body() {
    let mock = MockApi::start().await;
    mock.respond("/api/trigger/t1/throttling", StatusCode::OK, "not json");

    mock.client().delete_throttling("t1").await.unwrap();
    assert_eq!(mock.last().method, Method::DELETE);
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let mock = MockApi::start().await;
    mock.respond("/api/config", StatusCode::OK, "<html>");

    let err = mock.client().get_config().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn settings_derive_legacy_flags() {
    let mock = MockApi::start().await;
    mock.respond(
        "/api/user/settings",
        StatusCode::OK,
        r#"{
            "login": "ops",
            "contacts": [],
            "subscriptions": [
                {"id": "a", "tags": ["DEGRADATION", "prod"]},
                {"id": "b", "tags": ["prod"]},
                {"id": "c", "tags": ["DEGRADATION", "ERROR"],
                 "sendNotificationsOnTriggerDegradedOnly": false,
                 "doNotSendWarnNotifications": false}
            ]
        }"#,
    );

    let settings = mock.client().get_settings().await.unwrap();
    let flags: Vec<_> = settings
        .subscriptions
        .iter()
        .map(|s| (s.degraded_only, s.no_warn_notifications))
        .collect();
    assert_eq!(
        flags,
        vec![
            (Some(true), Some(false)),
            (Some(false), Some(false)),
            (Some(false), Some(false)),
        ]
    );
}

#[tokio::test]
async fn settings_with_null_subscriptions() {
    let mock = MockApi::start().await;
    mock.respond(
        "/api/user/settings",
        StatusCode::OK,
        r#"{"login": "ops", "contacts": null, "subscriptions": null}"#,
    );

    let settings = mock.client().get_settings().await.unwrap();
    assert!(settings.subscriptions.is_empty());
    assert!(settings.contacts.is_empty());
}

#[tokio::test]
async fn trigger_page_query_uses_index_arrays() {
    let mock = MockApi::start().await;
    mock.respond("/api/trigger/page", StatusCode::OK, r#"{"list":[],"total":0,"page":2,"size":20}"#);

    let tags = vec!["prod".to_string(), "db main".to_string()];
    mock.client()
        .get_trigger_list(2, true, &tags, Some("cpu"))
        .await
        .unwrap();
    assert_eq!(
        mock.last().query.as_deref(),
        Some("onlyProblems=true&p=2&size=20&tags[0]=prod&tags[1]=db+main&triggerName=cpu")
    );

    mock.client().get_trigger_list(0, false, &[], Some("  ")).await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("onlyProblems=false&p=0&size=20"));
}

#[tokio::test]
async fn event_and_stats_queries() {
    let mock = MockApi::start().await;
    let client = mock.client();

    client.get_trigger_events("t1", 3).await.unwrap();
    let seen = mock.last();
    assert_eq!(seen.path, "/api/event/t1");
    assert_eq!(seen.query.as_deref(), Some("p=3&size=100"));

    client
        .get_metric_stats(3600, false, &["prod".to_string()])
        .await
        .unwrap();
    let seen = mock.last();
    assert_eq!(seen.path, "/api/stats/metrics");
    assert_eq!(seen.query.as_deref(), Some("intervalLength=3600&onlyProblems=false&tags[0]=prod"));
}

#[tokio::test]
async fn notification_feed_uses_literal_range() {
    let mock = MockApi::start().await;
    mock.respond("/api/notification", StatusCode::OK, r#"{"total":0,"list":[]}"#);
    let client = mock.client();

    client.get_notification_list().await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("start=0&end=-1"));

    client.delete_notification("123abc").await.unwrap();
    let seen = mock.last();
    assert_eq!(seen.method, Method::DELETE);
    assert_eq!(seen.query.as_deref(), Some("id=123abc"));
}

#[tokio::test]
async fn path_segments_are_encoded() {
    let mock = MockApi::start().await;
    let client = mock.client();

    client.delete_tag("team/db").await.unwrap();
    assert_eq!(mock.last().path, "/api/tag/team%2Fdb");

    client.delete_metric("t1", "servers.a b.cpu").await.unwrap();
    let seen = mock.last();
    assert_eq!(seen.path, "/api/trigger/t1/metrics");
    assert_eq!(seen.query.as_deref(), Some("name=servers.a+b.cpu"));
}

#[tokio::test]
async fn mutations_send_json_bodies() {
    let mock = MockApi::start().await;
    let client = mock.client();

    client.set_trigger_maintenance("t1", 1_700_000_000).await.unwrap();
    let seen = mock.last();
    assert_eq!(seen.method, Method::PUT);
    assert_eq!(seen.path, "/api/trigger/t1/triggerMaintenance");
    assert_eq!(seen.body, r#"{"until":1700000000}"#);

    let metrics = BTreeMap::from([("servers.a.cpu".to_string(), 0_i64)]);
    client.set_maintenance("t1", &metrics).await.unwrap();
    assert_eq!(mock.last().body, r#"{"servers.a.cpu":0}"#);

    client
        .set_global_settings(&GlobalSettings::default().toggled())
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&mock.last().body).unwrap();
    assert_eq!(body["notifications"]["disabled"], true);
}

#[tokio::test]
async fn silent_pattern_verbs() {
    let mock = MockApi::start().await;
    let client = mock.client();
    let patterns = SilentPatternList {
        list: vec![SilentPattern::new(SilentPatternType::Tag, "prod", 100)],
    };

    client.get_silent_pattern_list(SilentPatternType::Tag).await.unwrap();
    assert_eq!(mock.last().query.as_deref(), Some("type=1"));

    client.add_silent_patterns(&patterns).await.unwrap();
    assert_eq!(mock.last().method, Method::PUT);
    client.update_silent_patterns(&patterns).await.unwrap();
    assert_eq!(mock.last().method, Method::POST);
    client.delete_silent_patterns(&patterns).await.unwrap();
    let seen = mock.last();
    assert_eq!(seen.method, Method::DELETE);
    assert!(seen.body.contains(r#""pattern":"prod""#));
}

#[tokio::test]
async fn login_header_is_sent() {
    let mock = MockApi::start().await;
    let client = MoiraClient::builder(format!("http://{}/api", mock.addr))
        .with_login("ops")
        .build()
        .unwrap();

    client.test_contact("c1").await.unwrap();
    let seen = mock.last();
    assert_eq!(seen.login.as_deref(), Some("ops"));
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/api/contact/c1/test");
}
