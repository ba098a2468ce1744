//! Local-or-remote references.
//!
//! A relation to another resource is satisfied either by a row in this
//! registration (a local UUID) or by a URL into another ZGW API, never both
//! and never neither. Storage keeps the two-column layout; everything above
//! it works with [`Relation`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationFailure;

/// A reference to a resource that may live in this database or elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
  Local(Uuid),
  Remote(String),
}

impl Relation {
  /// Build a relation from the two-column representation.
  ///
  /// An empty `remote` string means "no remote reference".
  pub fn from_parts(
    field: &'static str,
    local: Option<Uuid>,
    remote: &str,
  ) -> Result<Self, ValidationFailure> {
    let remote = remote.trim();
    match (local, remote.is_empty()) {
      (Some(_), false) => Err(ValidationFailure::RelationConflict { field }),
      (Some(id), true) => Ok(Self::Local(id)),
      (None, true) => Err(ValidationFailure::RelationMissing { field }),
      (None, false) => Self::remote(field, remote),
    }
  }

  /// A remote relation; the URL must be absolute `http` or `https`.
  pub fn remote(
    field: &'static str,
    url: &str,
  ) -> Result<Self, ValidationFailure> {
    let parsed =
      url::Url::parse(url).map_err(|_| ValidationFailure::InvalidUrl { field })?;
    match parsed.scheme() {
      "http" | "https" => Ok(Self::Remote(url.to_owned())),
      _ => Err(ValidationFailure::InvalidUrl { field }),
    }
  }

  /// Split into `(local, remote)` columns; `remote` is empty for local ones.
  pub fn to_parts(&self) -> (Option<Uuid>, String) {
    match self {
      Self::Local(id) => (Some(*id), String::new()),
      Self::Remote(url) => (None, url.clone()),
    }
  }

  pub fn local(&self) -> Option<Uuid> {
    match self {
      Self::Local(id) => Some(*id),
      Self::Remote(_) => None,
    }
  }

  pub fn is_remote(&self) -> bool { matches!(self, Self::Remote(_)) }
}

/// The two-field wire form accepted from clients, e.g.
/// `{"local": "<uuid>"}` or `{"remote": "https://..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationInput {
  pub local:  Option<Uuid>,
  #[serde(default)]
  pub remote: String,
}

impl RelationInput {
  pub fn resolve(
    &self,
    field: &'static str,
  ) -> Result<Relation, ValidationFailure> {
    Relation::from_parts(field, self.local, &self.remote)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn both_filled_is_rejected() {
    let err = Relation::from_parts(
      "besluittype",
      Some(Uuid::new_v4()),
      "https://catalogi.example.com/api/v1/besluittypen/1",
    )
    .unwrap_err();
    assert_eq!(err, ValidationFailure::RelationConflict {
      field: "besluittype",
    });
    assert_eq!(err.code(), "both-filled");
  }

  #[test]
  fn neither_filled_is_rejected() {
    let err = Relation::from_parts("besluittype", None, "  ").unwrap_err();
    assert_eq!(err, ValidationFailure::RelationMissing {
      field: "besluittype",
    });
  }

  #[test]
  fn local_only() {
    let id = Uuid::new_v4();
    let rel = Relation::from_parts("zaak", Some(id), "").unwrap();
    assert_eq!(rel, Relation::Local(id));
    assert_eq!(rel.to_parts(), (Some(id), String::new()));
  }

  #[test]
  fn remote_must_be_http_url() {
    assert!(Relation::from_parts("zaak", None, "not a url").is_err());
    assert!(Relation::from_parts("zaak", None, "ftp://example.com/x").is_err());

    let rel =
      Relation::from_parts("zaak", None, "https://zaken.example.com/z/1")
        .unwrap();
    assert!(rel.is_remote());
    assert_eq!(rel.local(), None);
  }
}
