//! Webhook transport against a local fixture server
//!
//! The fixture records every request so the tests can check the JSON body,
//! the bearer token, and how non-2xx answers surface in the scheduler.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use donezo::config::{NotifierConfig, NotifierKind};
use donezo::error::NotifyError;
use donezo::notify::{notifier_from_config, Notifier, WebhookNotifier};
use donezo::scheduler::ReminderScheduler;
use donezo::store::TaskStore;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn accept(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    recorded.requests.lock().unwrap().push((auth, body));
    StatusCode::CREATED
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "destination is not verified")
}

async fn start_fixture() -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/send", post(accept))
        .route("/reject", post(reject))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorded)
}

#[tokio::test]
async fn test_webhook_posts_json_with_bearer_token() {
    let (addr, recorded) = start_fixture().await;

    let notifier = WebhookNotifier::new(&format!("http://{addr}/send"))
        .unwrap()
        .with_auth_token(Some("s3cret".to_string()))
        .with_sender(Some("+15550001".to_string()))
        .with_message_prefix("Reminder: ");

    notifier.send("+15550000", "Feed the cat").await.unwrap();

    let requests = recorded.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0.as_deref(), Some("Bearer s3cret"));
    assert_eq!(
        requests[0].1,
        json!({ "to": "+15550000", "from": "+15550001", "body": "Reminder: Feed the cat" })
    );
}

#[tokio::test]
async fn test_webhook_rejection_carries_status_and_body() {
    let (addr, _) = start_fixture().await;
    let notifier = WebhookNotifier::new(&format!("http://{addr}/reject")).unwrap();

    let err = notifier.send("+1", "x").await.unwrap_err();
    match err {
        NotifyError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "destination is not verified");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_scheduler_over_configured_webhook() {
    let (addr, recorded) = start_fixture().await;
    let config = NotifierConfig {
        kind: NotifierKind::Webhook,
        url: Some(format!("http://{addr}/send")),
        ..NotifierConfig::default()
    };
    let notifier = notifier_from_config(&config).unwrap();

    let store = Arc::new(TaskStore::open_in_memory().unwrap());
    let id = store.insert("Stand-up", "2001-01-01 09:00", "+44700").unwrap();
    let scheduler = ReminderScheduler::new(Arc::clone(&store), notifier);

    let report = scheduler.run_cycle().await.unwrap();

    assert_eq!(report.sent, vec![id]);
    let requests = recorded.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, None);
    assert_eq!(requests[0].1["to"], "+44700");
    assert_eq!(requests[0].1["body"], "🔔 Reminder: Stand-up");
}
