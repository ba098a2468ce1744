//! A minimal registry of documents (informatieobjecten).
//!
//! Only the metadata needed to check document types against besluittypen is
//! kept; content storage lives elsewhere.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformatieObject {
  pub uuid:                 Uuid,
  pub identificatie:        String,
  pub titel:                String,
  pub informatieobjecttype: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInformatieObject {
  pub identificatie:        String,
  #[serde(default)]
  pub titel:                String,
  pub informatieobjecttype: Uuid,
}
