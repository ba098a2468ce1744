//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Validation failures render as the ZGW problem body:
//!
//! ```json
//! {
//!   "code": "invalid",
//!   "title": "Invalid input.",
//!   "invalidParams": [{ "name": "...", "code": "...", "reason": "..." }]
//! }
//! ```

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use zgw_core::{ValidationFailure, store::StoreError};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error(transparent)]
  Validation(ValidationFailure),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Sort a backend error into client and server faults.
  pub fn store<E: StoreError>(err: E) -> Self {
    if let Some(failure) = err.validation_failure() {
      return Self::Validation(failure.clone());
    }
    if err.is_not_found() {
      return Self::NotFound(err.to_string());
    }
    Self::Store(Box::new(err))
  }

  pub fn not_found(kind: &str, id: uuid::Uuid) -> Self {
    Self::NotFound(format!("{kind} {id} not found"))
  }
}

impl From<ValidationFailure> for ApiError {
  fn from(failure: ValidationFailure) -> Self { Self::Validation(failure) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": "not_found", "title": m })),
      )
        .into_response(),
      ApiError::Validation(failure) => (
        StatusCode::BAD_REQUEST,
        Json(json!({
          "code": "invalid",
          "title": "Invalid input.",
          "invalidParams": [{
            "name": failure.field().unwrap_or("nonFieldErrors"),
            "code": failure.code(),
            "reason": failure.to_string(),
          }],
        })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "code": "error", "title": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}

/// A `200 OK` body for `value`, or a 404 naming `kind` and `id`.
pub(crate) fn found<T>(
  value: Option<T>,
  kind: &str,
  id: uuid::Uuid,
) -> Result<Json<T>, ApiError> {
  value.map(Json).ok_or_else(|| ApiError::not_found(kind, id))
}
