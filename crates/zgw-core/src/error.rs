//! Error types for `zgw-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
  catalogi::Afleidingswijze,
  selectielijst::{LookupError, Procestermijn},
};

/// A write rejected by a validator. Every variant is user-correctable and is
/// surfaced as a field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
  #[error(
    "an object with this omschrijving already exists within the catalogus \
     and the given validity period"
  )]
  Overlap { field: &'static str },

  #[error("the {field} has catalogus different from created object")]
  CrossCatalog { field: &'static str },

  #[error("{field} is not valid in combination with {other}")]
  IncompatibleType {
    field: &'static str,
    other: &'static str,
    code:  &'static str,
  },

  #[error("{field} should belong to the same procestype as {other}")]
  ProcesTypeMismatch {
    field: &'static str,
    other: &'static str,
  },

  #[error(
    "afleidingswijze cannot be {afleidingswijze} when \
     selectielijstklasse.procestermijn is {procestermijn}"
  )]
  DerivationPolicyMismatch {
    afleidingswijze: Afleidingswijze,
    procestermijn:   Procestermijn,
  },

  #[error("{field} is required when afleidingswijze is {afleidingswijze}")]
  MissingProcedureField {
    field:           &'static str,
    afleidingswijze: Afleidingswijze,
  },

  #[error("{field} could not be retrieved: {source}")]
  Lookup {
    field:  &'static str,
    #[source]
    source: LookupError,
  },

  #[error("{field} may not be changed")]
  Immutable { field: &'static str },

  #[error("{field} is not unique")]
  NotUnique {
    field: &'static str,
    code:  &'static str,
  },

  #[error("{field} is not a valid RSIN")]
  InvalidRsin { field: &'static str },

  #[error("{reason}")]
  InvalidHoofdzaak {
    code:   &'static str,
    reason: &'static str,
  },

  #[error("{field}: give either a local or a remote reference, not both")]
  RelationConflict { field: &'static str },

  #[error("{field}: a local or a remote reference is required")]
  RelationMissing { field: &'static str },

  #[error("{field} is not a valid URL")]
  InvalidUrl { field: &'static str },

  #[error("{field} does not exist")]
  UnknownReference { field: &'static str },

  #[error("{field} must be between {min} and {max}")]
  OutOfRange {
    field: &'static str,
    min:   u32,
    max:   u32,
  },
}

impl ValidationFailure {
  /// Machine-readable error code, as reported in `invalidParams[].code`.
  pub fn code(&self) -> &'static str {
    match self {
      Self::Overlap { .. } => "overlap",
      Self::CrossCatalog { .. } => "relations-incorrect-catalogus",
      Self::IncompatibleType { code, .. } => code,
      Self::ProcesTypeMismatch { .. } => "procestype-mismatch",
      Self::DerivationPolicyMismatch { .. } => {
        "invalid-afleidingswijze-for-procestermijn"
      }
      Self::MissingProcedureField { .. } => "required",
      Self::Lookup { .. } => "bad-url",
      Self::Immutable { .. } => "wijzigen-niet-toegelaten",
      Self::NotUnique { code, .. } => code,
      Self::InvalidRsin { .. } => "invalid",
      Self::InvalidHoofdzaak { code, .. } => code,
      Self::RelationConflict { .. } => "both-filled",
      Self::RelationMissing { .. } => "required",
      Self::InvalidUrl { .. } => "bad-url",
      Self::UnknownReference { .. } => "does_not_exist",
      Self::OutOfRange { .. } => "out-of-range",
    }
  }

  /// The offending field, or `None` for object-level failures.
  pub fn field(&self) -> Option<&'static str> {
    match self {
      Self::Overlap { field }
      | Self::CrossCatalog { field }
      | Self::IncompatibleType { field, .. }
      | Self::MissingProcedureField { field, .. }
      | Self::Lookup { field, .. }
      | Self::Immutable { field }
      | Self::NotUnique { field, .. }
      | Self::InvalidRsin { field }
      | Self::RelationConflict { field }
      | Self::RelationMissing { field }
      | Self::InvalidUrl { field }
      | Self::UnknownReference { field }
      | Self::OutOfRange { field, .. } => Some(field),
      Self::InvalidHoofdzaak { .. } => Some("hoofdzaak"),
      Self::ProcesTypeMismatch { .. } | Self::DerivationPolicyMismatch { .. } => {
        None
      }
    }
  }
}

/// Fatal errors: configuration bugs and malformed data, not user input.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationFailure),

  #[error("invalid termijn {value:?}: {reason}")]
  InvalidTermijn {
    value:  String,
    reason: &'static str,
  },

  #[error("{date} + {termijn} is out of the supported date range")]
  DateOutOfRange { date: NaiveDate, termijn: String },

  #[error("unknown {kind} value: {value:?}")]
  UnknownChoice { kind: &'static str, value: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
