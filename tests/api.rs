use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use pomodoro_timer::{
    api::create_router,
    state::{AppState, Settings},
    storage::MemoryStorage,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Router, Arc<AppState>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Settings::default(),
        Box::new(storage.clone()),
    ));
    (create_router(Arc::clone(&state)), state, storage)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _, _) = app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn start_stop_reset_cycle() {
    let (app, state, _) = app();

    let (status, body) = call(&app, Method::POST, "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["running"], true);
    assert_eq!(body["timer"]["state"], json!({"cycle": 0, "phase": "work"}));

    let (_, body) = call(&app, Method::POST, "/stop", None).await;
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["timer"]["time"], 1500);
    assert_eq!(body["timer"]["paused"], false);
    assert_eq!(body["timer"]["detailedTime"], json!({"h": 0, "m": 25, "s": 0}));

    let (_, body) = call(&app, Method::POST, "/reset", None).await;
    assert_eq!(body["timer"]["running"], false);

    let (_, body) = call(&app, Method::GET, "/status", None).await;
    assert_eq!(body["last_action"], "reset");
    assert!(!state.get_status().unwrap().running);
}

#[tokio::test]
async fn settings_merge_leniently() {
    let (app, _, _) = app();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/settings",
        Some(json!({"workTime": "50", "breakTime": "soon", "restPeriodicity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["settings"],
        json!({"workTime": 50, "breakTime": 5, "restTime": 25, "restPeriodicity": 3})
    );

    let (_, body) = call(&app, Method::POST, "/restart-phase", None).await;
    assert_eq!(body["timer"]["time"], 3000);
}

#[tokio::test]
async fn state_endpoint_accepts_numeric_phase() {
    let (app, _, _) = app();
    let (_, body) = call(&app, Method::PUT, "/state", Some(json!({"cycle": 3, "phase": 2}))).await;
    assert_eq!(body["timer"]["state"], json!({"cycle": 3, "phase": "rest"}));
}

#[tokio::test]
async fn data_endpoints_round_trip_and_report_failure() {
    let (app, _, storage) = app();

    let (_, body) = call(&app, Method::POST, "/data/load", None).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["snapshot"], Value::Null);

    let (_, body) = call(&app, Method::POST, "/data/save", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["snapshot"]["time"], 1500);
    assert_eq!(storage.len(), 3);

    let (_, body) = call(&app, Method::POST, "/data/load", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["snapshot"]["state"]["phase"], "work");

    storage.insert("state", "garbage");
    let (_, body) = call(&app, Method::POST, "/data/load", None).await;
    assert_eq!(body["snapshot"]["state"], Value::Null);
    assert_eq!(body["snapshot"]["time"], 1500);

    let (_, body) = call(&app, Method::DELETE, "/data", None).await;
    assert_eq!(body["status"], "ok");
    assert!(storage.is_empty());
}
