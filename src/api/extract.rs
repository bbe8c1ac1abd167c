//! Request extractors that reject with the API's JSON error body

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{error::TimerError, state::TimerId};
use super::responses::ApiError;

/// Timer id taken from the `:id` path segment
#[derive(Debug, Clone, Copy)]
pub struct TimerPath(pub TimerId);

#[async_trait]
impl<S> FromRequestParts<S> for TimerPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<TimerId>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => Err(ApiError(TimerError::InvalidRequest(format!(
                "timer id: {}",
                rejection.body_text()
            )))),
        }
    }
}
