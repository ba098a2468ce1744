//! Error type for `zgw-store-sqlite`.

use thiserror::Error;
use zgw_core::{ValidationFailure, store::StoreError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] zgw_core::Error),

  /// The write was rejected by a validation rule.
  #[error(transparent)]
  Validation(#[from] ValidationFailure),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value that does not decode into its domain type.
  #[error("corrupt column {column}: {message}")]
  Corrupt {
    column:  &'static str,
    message: String,
  },

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: uuid::Uuid },
}

impl StoreError for Error {
  fn validation_failure(&self) -> Option<&ValidationFailure> {
    match self {
      Self::Validation(failure)
      | Self::Core(zgw_core::Error::Validation(failure)) => Some(failure),
      _ => None,
    }
  }

  fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
