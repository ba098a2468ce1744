//! Write-time validation.
//!
//! Every guarded write builds a candidate, loads an immutable context (the
//! stored instance when updating, plus whatever related rows the rules need)
//! and runs an ordered [`Pipeline`] of pure checks over the pair. The first
//! failing check aborts the write.

pub mod besluiten;
pub mod catalogi;
pub mod zaken;

use uuid::Uuid;

use crate::ValidationFailure;

// ─── Pipeline ────────────────────────────────────────────────────────────────

type Check<C, X> =
  Box<dyn Fn(&C, &X) -> Result<(), ValidationFailure> + Send + Sync>;

/// An ordered list of checks over a candidate `C` and its context `X`.
pub struct Pipeline<C, X> {
  checks: Vec<Check<C, X>>,
}

impl<C, X> Default for Pipeline<C, X> {
  fn default() -> Self { Self { checks: Vec::new() } }
}

impl<C, X> Pipeline<C, X> {
  pub fn new() -> Self { Self::default() }

  /// Append a check; checks run in the order they were added.
  pub fn then<F>(mut self, check: F) -> Self
  where
    F: Fn(&C, &X) -> Result<(), ValidationFailure> + Send + Sync + 'static,
  {
    self.checks.push(Box::new(check));
    self
  }

  pub fn run(&self, candidate: &C, context: &X) -> Result<(), ValidationFailure> {
    self
      .checks
      .iter()
      .try_for_each(|check| check(candidate, context))
  }

  pub fn len(&self) -> usize { self.checks.len() }

  pub fn is_empty(&self) -> bool { self.checks.is_empty() }
}

// ─── Shared checks ───────────────────────────────────────────────────────────

/// RSIN: nine digits passing the elfproef.
pub fn validate_rsin(
  field: &'static str,
  value: &str,
) -> Result<(), ValidationFailure> {
  let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
  if value.len() != 9 || digits.len() != 9 {
    return Err(ValidationFailure::InvalidRsin { field });
  }

  let weighted: i64 = digits[..8]
    .iter()
    .zip((2..=9).rev())
    .map(|(digit, weight)| i64::from(*digit) * weight)
    .sum();
  let total = weighted - i64::from(digits[8]);

  if total % 11 != 0 {
    return Err(ValidationFailure::InvalidRsin { field });
  }
  Ok(())
}

/// A referenced row must have been found.
pub fn require<'a, T>(
  found: Option<&'a T>,
  field: &'static str,
) -> Result<&'a T, ValidationFailure> {
  found.ok_or(ValidationFailure::UnknownReference { field })
}

/// An identifying field may not change on update.
pub fn unchanged<T: PartialEq>(
  existing: Option<&T>,
  candidate: &T,
  field: &'static str,
) -> Result<(), ValidationFailure> {
  match existing {
    Some(existing) if existing != candidate => {
      Err(ValidationFailure::Immutable { field })
    }
    _ => Ok(()),
  }
}

/// Every id in `wanted` must be among the loaded rows.
pub fn all_found<T>(
  wanted: &[Uuid],
  found: &[T],
  id: impl Fn(&T) -> Uuid,
  field: &'static str,
) -> Result<(), ValidationFailure> {
  let missing = wanted
    .iter()
    .any(|wanted| !found.iter().any(|row| id(row) == *wanted));
  if missing {
    return Err(ValidationFailure::UnknownReference { field });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use super::*;

  #[test]
  fn rsin_elfproef() {
    validate_rsin("rsin", "517439943").unwrap();
    validate_rsin("rsin", "000000000").unwrap();

    for bad in ["123456789", "51743994", "5174399430", "51743994a", ""] {
      let err = validate_rsin("rsin", bad).unwrap_err();
      assert_eq!(err.code(), "invalid", "{bad:?}");
    }
  }

  #[test]
  fn pipeline_stops_at_first_failure() {
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);

    let pipeline = Pipeline::<u32, ()>::new()
      .then(|candidate, _| match candidate {
        0 => Err(ValidationFailure::UnknownReference { field: "first" }),
        _ => Ok(()),
      })
      .then(move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
      });

    assert_eq!(pipeline.len(), 2);
    let err = pipeline.run(&0, &()).unwrap_err();
    assert_eq!(err.field(), Some("first"));
    assert_eq!(ran.load(Ordering::SeqCst), 0);

    pipeline.run(&1, &()).unwrap();
    assert_eq!(ran.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn require_reports_the_missing_field() {
    let loaded = 7_u32;
    assert_eq!(require(Some(&loaded), "zaaktype"), Ok(&7));
    let err = require::<u32>(None, "zaaktype").unwrap_err();
    assert_eq!(err.code(), "does_not_exist");
    assert_eq!(err.field(), Some("zaaktype"));
  }

  #[test]
  fn immutability_only_applies_on_update() {
    unchanged(None, &"a".to_owned(), "identificatie").unwrap();
    unchanged(Some(&"a".to_owned()), &"a".to_owned(), "identificatie").unwrap();
    let err = unchanged(Some(&"a".to_owned()), &"b".to_owned(), "identificatie")
      .unwrap_err();
    assert_eq!(err.code(), "wijzigen-niet-toegelaten");
  }
}
