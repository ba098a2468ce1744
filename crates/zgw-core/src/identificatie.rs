//! Generated identifications: `<PREFIX>-<year>-<10-digit sequence>`.
//!
//! Only identifications with exactly ten digits after the stem count as
//! issued sequence numbers. Client-supplied values in any other shape never
//! move the sequence.

use crate::error::ValidationFailure;

const DIGITS: usize = 10;
const LAST_SEQUENCE: u64 = 9_999_999_999;

/// The next identification after `last`, the highest one already issued for
/// this prefix and year. Fails once the ten-digit sequence is used up.
pub fn next_identificatie(
  prefix: &str,
  year: i32,
  last: Option<&str>,
) -> Result<String, ValidationFailure> {
  let stem = format!("{prefix}-{year}-");
  let seq = last
    .and_then(|last| last.strip_prefix(&stem))
    .filter(|tail| tail.len() == DIGITS && tail.bytes().all(|b| b.is_ascii_digit()))
    .and_then(|tail| tail.parse::<u64>().ok())
    .unwrap_or(0);

  match seq.checked_add(1) {
    Some(next) if next <= LAST_SEQUENCE => Ok(format!("{stem}{next:010}")),
    _ => Err(ValidationFailure::NotUnique {
      field: "identificatie",
      code:  "identificatie-niet-uniek",
    }),
  }
}

/// The `GLOB` pattern matching every sequence-shaped identification for this
/// prefix and year. Matching rows share a fixed width, so their string
/// maximum is also their numeric maximum.
pub fn glob_pattern(prefix: &str, year: i32) -> String {
  format!("{prefix}-{year}-{}", "[0-9]".repeat(DIGITS))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_of_the_year() {
    assert_eq!(
      next_identificatie("ZAAK", 2019, None).unwrap(),
      "ZAAK-2019-0000000001"
    );
  }

  #[test]
  fn increments_last() {
    assert_eq!(
      next_identificatie("BESLUIT", 2020, Some("BESLUIT-2020-0000000041")).unwrap(),
      "BESLUIT-2020-0000000042"
    );
  }

  #[test]
  fn ignores_foreign_last() {
    assert_eq!(
      next_identificatie("ZAAK", 2020, Some("ZAAK-2019-0000000041")).unwrap(),
      "ZAAK-2020-0000000001"
    );
  }

  #[test]
  fn ignores_tails_of_another_shape() {
    for last in ["ZAAK-2020-A1", "ZAAK-2020-42", "ZAAK-2020-18446744073709551615"] {
      assert_eq!(
        next_identificatie("ZAAK", 2020, Some(last)).unwrap(),
        "ZAAK-2020-0000000001",
        "{last}"
      );
    }
  }

  #[test]
  fn exhausted_sequence_is_an_error() {
    let err = next_identificatie("ZAAK", 2020, Some("ZAAK-2020-9999999999"))
      .unwrap_err();
    assert_eq!(err.code(), "identificatie-niet-uniek");
    assert_eq!(err.field(), Some("identificatie"));
  }

  #[test]
  fn glob_has_fixed_width() {
    assert_eq!(glob_pattern("ZAAK", 2020).matches("[0-9]").count(), 10);
    assert!(glob_pattern("ZAAK", 2020).starts_with("ZAAK-2020-["));
  }
}
