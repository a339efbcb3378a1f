//! Screen controllers against an in-process mock API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use moira_api::MoiraClient;
use moira_core::{ContactType, SilentPattern, SilentPatternType, TimeOffset, Trigger};
use moira_console::containers::{
    MetricStatsContainer, SettingsContainer, SilentPatternsContainer, SubscriptionSearchContainer,
    TriggerEditContainer, TriggerListContainer, TriggerListLoad,
};
use moira_console::filters::{FilterDefaults, FilterStore};
use moira_console::location::{MetricStatsSearch, TriggerListSearch};
use moira_console::{ConsoleError, ScreenStatus, Settled};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    query: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct MockState {
    routes: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

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

    fn respond(&self, path: &str, body: &str) {
        self.respond_with(path, StatusCode::OK, body);
    }

    fn respond_with(&self, path: &str, status: StatusCode, body: &str) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    fn client(&self) -> MoiraClient {
        MoiraClient::new(format!("http://{}/api", self.addr)).unwrap()
    }

    fn seen(&self) -> Vec<Recorded> {
        self.state.seen.lock().unwrap().clone()
    }

    fn writes(&self) -> Vec<Recorded> {
        self.seen().into_iter().filter(|r| r.method != Method::GET).collect()
    }
}

async fn record(State(state): State<MockState>, method: Method, uri: Uri, body: String) -> Response {
    let path = uri.path().to_string();
    state.seen.lock().unwrap().push(Recorded {
        method,
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body,
    });
    let (status, body) = state
        .routes
        .lock()
        .unwrap()
        .get(&path)
        .cloned()
        .unwrap_or((StatusCode::OK, "{}".to_string()));
    Response::builder().status(status).body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn trigger_list_applies_stored_defaults_before_fetching() {
    let mock = MockApi::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = FilterStore::new(dir.path().join("filters.json"));
    let mut container = TriggerListContainer::new(mock.client(), Some(store.clone()));

    let defaults = FilterDefaults {
        tags: vec!["prod".into()],
        only_problems: true,
    };
    let load = container.load(TriggerListSearch::default(), &defaults).await.unwrap();

    let TriggerListLoad::Redirect(target) = load else {
        panic!("expected a redirect");
    };
    assert_eq!(target.tags, vec!["prod"]);
    assert!(target.only_problems);
    assert!(mock.seen().is_empty());
    assert_eq!(store.load(), defaults);
}

#[tokio::test]
async fn trigger_list_redirects_past_the_last_page() {
    let mock = MockApi::start().await;
    mock.respond("/api/tag", r#"{"list":["prod"]}"#);
    mock.respond("/api/trigger/page", r#"{"list":[],"total":45,"page":9,"size":20}"#);
    let mut container = TriggerListContainer::new(mock.client(), None);

    let search = TriggerListSearch {
        page: 10,
        ..TriggerListSearch::default()
    };
    let load = container.load(search, &FilterDefaults::default()).await.unwrap();

    assert_eq!(
        load,
        TriggerListLoad::Redirect(TriggerListSearch {
            page: 3,
            ..TriggerListSearch::default()
        })
    );
    assert!(container.screen().data().is_none());
}

#[tokio::test]
async fn trigger_list_loads_page_and_tag_buckets() {
    let mock = MockApi::start().await;
    mock.respond("/api/tag", r#"{"list":["prod","db","web"]}"#);
    mock.respond(
        "/api/trigger/page",
        r#"{"list":[{"id":"t1","name":"cpu","targets":["a.b"],"tags":["prod"]}],"total":1,"page":0,"size":20}"#,
    );
    mock.respond(
        "/api/user/settings",
        r#"{"login":"ops","contacts":[],"subscriptions":[{"id":"s1","contacts":[],"tags":["db"],"enabled":true}]}"#,
    );
    let mut container = TriggerListContainer::new(mock.client(), None);

    let search = TriggerListSearch {
        tags: vec!["prod".into(), "gone".into()],
        ..TriggerListSearch::default()
    };
    let load = container.load(search, &FilterDefaults::default()).await.unwrap();
    assert_eq!(load, TriggerListLoad::Loaded);

    let view = container.screen().require().unwrap();
    assert_eq!(view.triggers.list.len(), 1);
    assert_eq!(view.tags.selected, vec!["prod"]);
    assert_eq!(view.tags.subscribed, vec!["db"]);
    assert_eq!(view.tags.remaining, vec!["web"]);

    let page = mock
        .seen()
        .into_iter()
        .find(|r| r.path == "/api/trigger/page")
        .unwrap();
    assert_eq!(page.query.as_deref(), Some("onlyProblems=false&p=0&size=20&tags[0]=prod"));
}

#[tokio::test]
async fn failed_fetch_leaves_screen_in_error() {
    let mock = MockApi::start().await;
    mock.respond_with("/api/tag", StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#);
    let mut container = TriggerListContainer::new(mock.client(), None);

    let load = container
        .load(TriggerListSearch::default(), &FilterDefaults::default())
        .await
        .unwrap();

    assert_eq!(load, TriggerListLoad::Loaded);
    assert!(matches!(container.screen().status(), ScreenStatus::Error(_)));
    assert_eq!(container.screen().error(), Some("boom"));
}

#[tokio::test]
async fn invalid_trigger_is_not_sent() {
    let mock = MockApi::start().await;
    let mut editor = TriggerEditContainer::new(mock.client());
    editor.load_new(Trigger::default()).await.unwrap();

    let err = editor.create().await.unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(mock.writes().is_empty());
}

#[tokio::test]
async fn settings_actions_require_a_loaded_screen() {
    let mock = MockApi::start().await;
    let mut settings = SettingsContainer::new(mock.client());

    let err = settings
        .add_contact(ContactType::Mail, "ops@example.com", None)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::InvalidProgramState(_)));
    assert!(mock.seen().is_empty());
}

#[tokio::test]
async fn contact_is_created_for_current_user_without_disallowed_fallback() {
    let mock = MockApi::start().await;
    mock.respond("/api/config", r#"{"contacts":[{"type":"mail","validation":""}]}"#);
    mock.respond("/api/user/settings", r#"{"login":"ops"}"#);
    mock.respond("/api/contact", r#"{"id":"c1","type":"mail","value":"ops@example.com","user":"ops"}"#);
    let mut settings = SettingsContainer::new(mock.client());
    settings.load().await.unwrap();

    let contact = settings
        .add_contact(ContactType::Mail, "ops@example.com", Some("backup@example.com"))
        .await
        .unwrap();
    assert_eq!(contact.id, "c1");

    let put = mock.writes().pop().unwrap();
    assert_eq!(put.method, Method::PUT);
    assert_eq!(put.path, "/api/contact");
    let body: serde_json::Value = serde_json::from_str(&put.body).unwrap();
    assert_eq!(body["user"], "ops");
    assert_eq!(body["type"], "mail");
    assert!(body.get("fallback_value").is_none());
}

#[tokio::test]
async fn invalid_contact_is_rejected_without_request() {
    let mock = MockApi::start().await;
    mock.respond("/api/config", r#"{"contacts":[{"type":"mail","validation":"^.+@.+$"}]}"#);
    let mut settings = SettingsContainer::new(mock.client());
    settings.load().await.unwrap();

    let err = settings.add_contact(ContactType::Mail, "not-an-address", None).await.unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(mock.writes().is_empty());
}

#[tokio::test]
async fn silent_patterns_are_stamped_with_screen_type() {
    let mock = MockApi::start().await;
    let mut container = SilentPatternsContainer::new(mock.client(), SilentPatternType::Tag);
    container.load().await.unwrap();

    container
        .create(vec![SilentPattern::new(SilentPatternType::Pattern, "prod", 100)])
        .await
        .unwrap();

    let put = mock.writes().pop().unwrap();
    assert_eq!(put.path, "/api/silent-pattern");
    let body: serde_json::Value = serde_json::from_str(&put.body).unwrap();
    assert_eq!(body["list"][0]["type"], 1);
    assert_eq!(body["list"][0]["pattern"], "prod");
}

#[tokio::test]
async fn prolong_moves_until_relative_to_now() {
    let mock = MockApi::start().await;
    mock.respond(
        "/api/silent-pattern",
        r#"{"list":[{"id":"p1","login":"ops","pattern":"a.*","created_at":1,"until":50,"type":0}]}"#,
    );
    let mut container = SilentPatternsContainer::new(mock.client(), SilentPatternType::Pattern);
    container.load().await.unwrap();

    let now = 1_700_000_000;
    container
        .prolong(&["p1".to_string()], TimeOffset::OneHour, now)
        .await
        .unwrap();

    let post = mock.writes().pop().unwrap();
    let body: serde_json::Value = serde_json::from_str(&post.body).unwrap();
    assert_eq!(body["list"][0]["until"], now + 3600);
    assert_eq!(body["list"][0]["id"], "p1");
}

#[tokio::test]
async fn prolong_of_unknown_pattern_fails() {
    let mock = MockApi::start().await;
    let mut container = SilentPatternsContainer::new(mock.client(), SilentPatternType::Pattern);
    container.load().await.unwrap();

    let err = container
        .prolong(&["missing".to_string()], TimeOffset::OneDay, 0)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::NotFound(_)));
    assert!(mock.writes().is_empty());
}

#[tokio::test]
async fn short_subscription_search_is_rejected() {
    let mock = MockApi::start().await;
    let mut container = SubscriptionSearchContainer::new(mock.client());

    let err = container.search("ab").await.unwrap_err();

    assert!(matches!(err, ConsoleError::InvalidArgument(_)));
    assert!(mock.seen().is_empty());
}

#[tokio::test]
async fn subscription_search_keeps_matching_contacts() {
    let mock = MockApi::start().await;
    mock.respond(
        "/api/subscription/search",
        r##"{"list":[{"id":"s1","tags":["prod"],"enabled":true,"matched_sub":true,
            "contacts":[{"id":"c1","type":"mail","value":"Ops@Example.com"},{"id":"c2","type":"slack","value":"#dev"}]}]}"##,
    );
    let mut container = SubscriptionSearchContainer::new(mock.client());

    let view = container.search("OPS@").await.unwrap();

    assert_eq!(view.search, "ops@");
    assert_eq!(view.matches.len(), 1);
    let ids: Vec<_> = view.matches[0].contacts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1"]);
}

#[tokio::test]
async fn superseded_stats_fetch_is_dropped() {
    let mock = MockApi::start().await;
    mock.respond("/api/tag", r#"{"list":["prod"]}"#);
    let mut container = MetricStatsContainer::new(mock.client());
    container.set_search(MetricStatsSearch::default());

    let (first, first_fetch) = container.start_fetch();
    let (second, second_fetch) = container.start_fetch();

    let second_result = second_fetch.await;
    assert_eq!(container.settle(second, second_result), Settled::Committed);
    let first_result = first_fetch.await;
    assert_eq!(container.settle(first, first_result), Settled::Stale);

    assert_eq!(container.screen().status(), &ScreenStatus::Loaded);
    assert_eq!(container.screen().require().unwrap().tags, vec!["prod"]);
}

#[tokio::test]
async fn stats_without_tags_skip_the_stats_request() {
    let mock = MockApi::start().await;
    mock.respond("/api/tag", r#"{"list":["prod"]}"#);
    let mut container = MetricStatsContainer::new(mock.client());

    container.load().await.unwrap();

    assert!(container.rows().unwrap().is_empty());
    assert!(mock.seen().iter().all(|r| r.path != "/api/stats/metrics"));
}
