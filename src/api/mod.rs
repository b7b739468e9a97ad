//! API handlers for LendHub REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the acting user's id on every operation
pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the acting user id from the X-Sharer-User-Id header
///
/// The service holds no session state; callers identify themselves on each
/// request. Referential checks (does this user exist, may they act on this
/// entity) belong to the service layer.
pub struct SharerId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Validation(format!("Missing {} header", USER_ID_HEADER))
            })?;

        let user_id = header
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation(format!("Invalid {} header", USER_ID_HEADER)))?;

        Ok(SharerId(user_id))
    }
}

/// Run validator-derived checks and surface failures as a Validation error
pub fn validate_payload<T: validator::Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}
