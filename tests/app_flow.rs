mod common;

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use onecard::api::{ChatClient, ChatService, FALLBACK_MESSAGE};
use onecard::app::{App, Screen};
use onecard::auth::SharedSecretAuthenticator;
use onecard::conversation::SUGGESTIONS;
use onecard::error::{AuthError, ChatError};
use onecard::models::{Role, ThemeMode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn banker(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.lock().unwrap().push(body);
    Json(json!({ "response": "Your available limit is **₹42,000**." }))
}

async fn app_with_server() -> (App, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/chat", post(banker))
        .with_state(seen.clone());
    let base = common::spawn_server(router).await;
    let chat = ChatClient::new(format!("{}/chat", base), 5).unwrap();
    let app = App::new(
        Box::new(SharedSecretAuthenticator::new("1234")),
        Arc::new(chat),
        ThemeMode::Light,
    );
    (app, seen)
}

/// Answers every query with a fixed string and counts calls.
struct Canned {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatService for Canned {
    async fn send_query(&self, _user_id: &str, query: &str) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(query.to_string());
        Ok(format!("re: {}", query))
    }
}

fn app_with_canned() -> (App, Arc<Canned>) {
    let canned = Arc::new(Canned {
        calls: Mutex::new(Vec::new()),
    });
    let app = App::new(
        Box::new(SharedSecretAuthenticator::new("1234")),
        canned.clone(),
        ThemeMode::Light,
    );
    (app, canned)
}

#[tokio::test]
async fn test_login_gate() {
    let (mut app, _) = app_with_canned();
    assert_eq!(app.screen(), Screen::Login);

    assert_eq!(app.login("alice", "0000").unwrap_err(), AuthError::LoginRejected);
    assert_eq!(app.screen(), Screen::Login);
    assert!(app.user_id().is_none());

    app.login("alice", "1234").unwrap();
    assert_eq!(app.screen(), Screen::Main);
    assert_eq!(app.user_id(), Some("alice"));
}

#[tokio::test]
async fn test_input_ignored_before_login() {
    let (mut app, canned) = app_with_canned();
    assert!(app.send("hello").await.is_none());
    assert!(app.conversation().is_empty());
    assert!(canned.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_suggestion_sends_exactly_one_query() {
    let (mut app, seen) = app_with_server().await;
    app.login("alice", "1234").unwrap();

    let reply = app.send(SUGGESTIONS[0]).await.unwrap();
    assert_eq!(reply.role(), Role::Bot);
    assert_eq!(reply.content(), "Your available limit is **₹42,000**.");

    let messages = app.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role(), Role::User);
    assert_eq!(messages[0].content(), "Check Credit Limit");
    assert!(!app.conversation().is_awaiting());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], json!({"user_id": "alice", "query": "Check Credit Limit"}));
}

#[tokio::test]
async fn test_begin_needs_a_session() {
    let (mut app, _) = app_with_canned();
    assert!(app.begin("hello").is_none());
    assert!(app.conversation().is_empty());
    assert!(!app.conversation().is_awaiting());

    app.login("alice", "1234").unwrap();
    let (user_id, pending) = app.begin("  hello ").unwrap();
    assert_eq!(user_id, "alice");
    assert_eq!(pending.query, "hello");
    assert!(app.conversation().is_awaiting());
}

#[tokio::test]
async fn test_abandoned_request_keeps_question_only() {
    let (mut app, _) = app_with_canned();
    app.login("alice", "1234").unwrap();

    let (_, pending) = app.begin("slow question").unwrap();
    app.abandon(pending.ticket);
    assert!(!app.conversation().is_awaiting());
    assert!(app.complete(pending.ticket, Ok("late answer".into())).is_none());
    assert_eq!(app.conversation().len(), 1);

    let reply = app.send("next").await.unwrap();
    assert_eq!(reply.content(), "re: next");
    assert_eq!(app.conversation().len(), 3);
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let (mut app, canned) = app_with_canned();
    app.login("alice", "1234").unwrap();

    for input in ["", "   ", "\t\n"] {
        assert!(app.send(input).await.is_none());
    }
    assert!(app.conversation().is_empty());
    assert!(canned.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_appends_fallback() {
    let chat = ChatClient::new(common::dead_endpoint().await, 2).unwrap();
    let mut app = App::new(
        Box::new(SharedSecretAuthenticator::new("1234")),
        Arc::new(chat),
        ThemeMode::Dark,
    );
    app.login("bob", "1234").unwrap();

    let reply = app.send("What is my bill?").await.unwrap();
    assert_eq!(reply.content(), FALLBACK_MESSAGE);
    assert_eq!(app.conversation().len(), 2);
    assert_eq!(app.screen(), Screen::Main);
}

#[tokio::test]
async fn test_out_of_order_replies_keep_only_latest() {
    let (mut app, _) = app_with_canned();
    app.login("alice", "1234").unwrap();

    let first = app.submit("first question").unwrap();
    let second = app.submit("second question").unwrap();

    assert!(app.complete(second.ticket, Ok("second answer".into())).is_some());
    assert!(app.complete(first.ticket, Ok("first answer".into())).is_none());

    let contents: Vec<&str> = app
        .conversation()
        .messages()
        .iter()
        .map(|m| m.content())
        .collect();
    assert_eq!(contents, vec!["first question", "second question", "second answer"]);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let (mut app, _) = app_with_canned();
    app.login("alice", "1234").unwrap();
    app.send("hello").await.unwrap();
    assert_eq!(app.conversation().len(), 2);

    app.logout();
    assert_eq!(app.screen(), Screen::Login);
    assert!(app.user_id().is_none());
    assert!(app.conversation().is_empty());
}

#[tokio::test]
async fn test_theme_toggle_pair_is_identity() {
    let (mut app, _) = app_with_canned();
    let original = app.theme();
    assert_ne!(app.toggle_theme(), original);
    assert_eq!(app.toggle_theme(), original);
}

#[tokio::test]
async fn test_snapshot_serializes() {
    let (mut app, _) = app_with_canned();
    app.login("alice", "1234").unwrap();
    app.send("hello").await.unwrap();

    let snapshot = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(snapshot["screen"], "main");
    assert_eq!(snapshot["theme"], "light");
    assert_eq!(snapshot["session"]["user_id"], "alice");
    assert_eq!(snapshot["conversation"]["awaiting"], false);
    assert_eq!(snapshot["conversation"]["messages"][1]["role"], "bot");
    assert_eq!(snapshot["conversation"]["messages"][1]["content"], "re: hello");
}
