//! Validity intervals of catalog types and the overlap rule between them.
//!
//! Within one catalogus, two versions of a type with the same omschrijving
//! may not be valid on the same day. Both ends of an interval are inclusive;
//! an open end means "still valid".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationFailure;

/// `[begin_geldigheid, einde_geldigheid]`, where a missing end is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geldigheid {
  #[serde(rename = "begin_geldigheid")]
  pub begin: NaiveDate,
  #[serde(rename = "einde_geldigheid", default)]
  pub einde: Option<NaiveDate>,
}

impl Geldigheid {
  pub fn new(begin: NaiveDate, einde: Option<NaiveDate>) -> Self {
    Self { begin, einde }
  }

  pub fn open(begin: NaiveDate) -> Self { Self { begin, einde: None } }

  /// Whether the two intervals share at least one day. Touching boundaries
  /// count as overlap.
  pub fn overlaps(&self, other: &Geldigheid) -> bool {
    let other_reaches_us = other.einde.is_none_or(|einde| einde >= self.begin);
    let we_reach_other = self.einde.is_none_or(|einde| other.begin <= einde);
    other_reaches_us && we_reach_other
  }
}

/// A catalog object that is versioned by validity period.
pub trait Geldig {
  fn uuid(&self) -> Uuid;
  fn geldigheid(&self) -> &Geldigheid;
}

/// Reject `candidate` if any object in `existing` (already restricted to the
/// same catalogus and omschrijving) is valid on an overlapping day.
///
/// `updating` is the object being replaced, which never conflicts with
/// itself.
pub fn validate_geen_overlap<'a, T>(
  candidate: &Geldigheid,
  existing: impl IntoIterator<Item = &'a T>,
  updating: Option<Uuid>,
) -> Result<(), ValidationFailure>
where
  T: Geldig + 'a,
{
  let conflict = existing
    .into_iter()
    .filter(|other| Some(other.uuid()) != updating)
    .any(|other| other.geldigheid().overlaps(candidate));

  if conflict {
    return Err(ValidationFailure::Overlap {
      field: "begin_geldigheid",
    });
  }
  Ok(())
}
