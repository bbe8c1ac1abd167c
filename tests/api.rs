use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use multi_countdown::{create_router, AppState};

fn app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(20560, "127.0.0.1".to_string(), 3, "60"));
    (Arc::clone(&state), create_router(state))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn lists_three_idle_timers() {
    let (_, app) = app();
    let (status, body) = send(&app, Method::GET, "/timers", None).await;

    assert_eq!(status, StatusCode::OK);
    let timers = body["timers"].as_array().unwrap();
    assert_eq!(timers.len(), 3);
    for (index, timer) in timers.iter().enumerate() {
        assert_eq!(timer["id"], index as u64 + 1);
        assert_eq!(timer["label"], format!("Timer {}", index + 1));
        assert_eq!(timer["status"], "idle");
        assert_eq!(timer["formatted_time"], "00:00");
        assert_eq!(timer["remaining_text"], "Remaining: 0s");
        assert_eq!(timer["input"], "60");
    }
}

#[tokio::test(start_paused = true)]
async fn start_pause_resume_reset_cycle() {
    let (_, app) = app();

    let (status, body) = send(&app, Method::POST, "/timers/1/start", Some(json!({"duration": "10"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["formatted_time"], "00:10");
    assert_eq!(body["timer"]["controls"]["start_enabled"], false);
    assert_eq!(body["timer"]["controls"]["input_editable"], false);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let (status, body) = send(&app, Method::POST, "/timers/1/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 7);
    assert_eq!(body["timer"]["progress"], 0.3);

    let (status, body) = send(&app, Method::POST, "/timers/1/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["remaining_seconds"], 7);

    let (status, body) = send(&app, Method::POST, "/timers/1/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 10);
    assert_eq!(body["timer"]["controls"]["reset_enabled"], false);
}

#[tokio::test]
async fn start_without_body_uses_stored_input() {
    let (_, app) = app();
    let (status, body) = send(&app, Method::PUT, "/timers/2/input", Some(json!({"value": "125"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["input"], "125");

    let (status, body) = send(&app, Method::POST, "/timers/2/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["formatted_time"], "02:05");

    let (status, body) = send(&app, Method::PUT, "/timers/2/input", Some(json!({"value": "5"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "input_locked");
}

#[tokio::test]
async fn malformed_duration_is_a_bad_request_without_state_change() {
    let (state, app) = app();
    let before = state.snapshot(multi_countdown::TimerId(3)).unwrap();

    for input in ["abc", "-5", ""] {
        let (status, body) = send(&app, Method::POST, "/timers/3/start", Some(json!({"duration": input}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "invalid_duration");
    }

    assert_eq!(state.snapshot(multi_countdown::TimerId(3)).unwrap(), before);
}

#[tokio::test]
async fn wrongly_typed_start_body_is_rejected_without_state_change() {
    let (state, app) = app();
    let before = state.snapshot(multi_countdown::TimerId(1)).unwrap();

    let (status, body) = send(&app, Method::POST, "/timers/1/start", Some(json!({"duration": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");

    assert_eq!(state.snapshot(multi_countdown::TimerId(1)).unwrap(), before);
}

#[tokio::test]
async fn non_numeric_timer_id_gets_json_error() {
    let (_, app) = app();
    let (status, body) = send(&app, Method::GET, "/timers/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "invalid_request");

    let (status, body) = send(&app, Method::POST, "/timers/abc/reset", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
}

#[tokio::test]
async fn event_stream_carries_display_updates() {
    let (_, app) = app();
    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut frames = response.into_body().into_data_stream();

    let (status, _) = send(&app, Method::POST, "/timers/2/start", Some(json!({"duration": "30"}))).await;
    assert_eq!(status, StatusCode::OK);

    let mut buffer = String::new();
    let frame = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let chunk = frames.next().await.expect("event stream ended").unwrap();
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());
            if let Some(end) = buffer.find("\n\n") {
                return buffer[..end].to_string();
            }
        }
    })
    .await
    .expect("no event within timeout");

    assert!(frame.lines().any(|line| line == "event: timer"), "{frame}");
    let data = frame
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .expect("frame without data");
    let view: Value = serde_json::from_str(data).unwrap();
    assert_eq!(view["id"], 2);
    assert_eq!(view["status"], "running");
    assert_eq!(view["remaining_seconds"], 30);
}

#[tokio::test]
async fn invalid_transitions_and_unknown_timers() {
    let (_, app) = app();

    let (status, body) = send(&app, Method::POST, "/timers/1/pause", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_transition");

    send(&app, Method::POST, "/timers/1/start", Some(json!({"duration": "30"}))).await;
    let (status, _) = send(&app, Method::POST, "/timers/1/start", Some(json!({"duration": "30"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/timers/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "unknown_timer");
}

#[tokio::test]
async fn status_reports_last_action() {
    let (_, app) = app();
    send(&app, Method::POST, "/timers/2/start", Some(json!({"duration": "0"}))).await;

    let (status, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "start timer 2");
    assert_eq!(body["timers"][1]["status"], "finished");
    assert_eq!(body["port"], 20560);
}

#[tokio::test]
async fn health_check() {
    let (_, app) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
