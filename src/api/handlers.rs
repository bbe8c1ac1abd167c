//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    body::Bytes,
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{error::TimerError, state::AppState};
use super::extract::TimerPath;
use super::responses::{
    ApiError, HealthResponse, InputRequest, StartRequest, StatusResponse, TimerResponse, TimersResponse,
};

/// Handle GET /timers - Snapshot of every timer
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimersResponse>, ApiError> {
    Ok(Json(TimersResponse {
        timestamp: chrono::Utc::now(),
        timers: state.snapshots()?,
    }))
}

/// Handle GET /timers/:id - Snapshot of one timer
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    TimerPath(id): TimerPath,
) -> Result<Json<TimerResponse>, ApiError> {
    let view = state.snapshot(id)?;
    Ok(Json(TimerResponse::ok(format!("{} is {}", view.label, view.status), view)))
}

/// Handle PUT /timers/:id/input - Edit the duration input field
pub async fn set_input_handler(
    State(state): State<Arc<AppState>>,
    TimerPath(id): TimerPath,
    Json(request): Json<InputRequest>,
) -> Result<Json<TimerResponse>, ApiError> {
    let view = state.set_input(id, &request.value)?;
    Ok(Json(TimerResponse::ok("Duration input updated".to_string(), view)))
}

/// Handle POST /timers/:id/start - Start a fresh run or resume a paused one
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    TimerPath(id): TimerPath,
    body: Bytes,
) -> Result<Json<TimerResponse>, ApiError> {
    let request = parse_start_request(&body)?;
    let view = state.start(id, request.duration.as_deref())?;
    info!("Start endpoint called for timer {}", id);
    Ok(Json(TimerResponse::ok(format!("{} is {}", view.label, view.status), view)))
}

/// Decode the optional start body; only an empty body means "no override"
fn parse_start_request(body: &[u8]) -> Result<StartRequest, TimerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| TimerError::InvalidRequest(format!("start body: {}", e)))
}

/// Handle POST /timers/:id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    TimerPath(id): TimerPath,
) -> Result<Json<TimerResponse>, ApiError> {
    let view = state.pause(id)?;
    info!("Pause endpoint called for timer {}", id);
    Ok(Json(TimerResponse::ok(format!("{} paused", view.label), view)))
}

/// Handle POST /timers/:id/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    TimerPath(id): TimerPath,
) -> Result<Json<TimerResponse>, ApiError> {
    let view = state.reset(id)?;
    info!("Reset endpoint called for timer {}", id);
    Ok(Json(TimerResponse::ok(format!("{} reset", view.label), view)))
}

/// Handle GET /events - Stream display updates as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = state.subscribe();

    let events = stream::unfold(updates, |mut updates| async move {
        loop {
            match updates.recv().await {
                Ok(view) => match Event::default().event("timer").json_data(&view) {
                    Ok(event) => return Some((Ok::<_, Infallible>(event), updates)),
                    Err(e) => warn!("Failed to encode display update: {}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Return host status and every timer
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let timers = state.snapshots()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timers,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
