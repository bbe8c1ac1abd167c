//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::TimerError, state::TimerView};

/// Body of `POST /timers/:id/start`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    /// Overrides the stored input text for a fresh run; ignored on resume
    pub duration: Option<String>,
}

/// Body of `PUT /timers/:id/input`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRequest {
    pub value: String,
}

/// Response for operations on a single timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    pub fn ok(message: String, timer: TimerView) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<TimerView>,
}

/// Host status with every timer snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: Vec<TimerView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A refused timer operation, rendered as a JSON error body
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(error: TimerError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            TimerError::InvalidDuration { .. } | TimerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TimerError::InvalidTransition { .. } | TimerError::InputLocked => StatusCode::CONFLICT,
            TimerError::UnknownTimer(_) => StatusCode::NOT_FOUND,
            TimerError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            kind: self.0.kind().to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
