//! Human-readable value tables for choice fields.
//!
//! Generated from the enum definitions, so documentation and validation can
//! never disagree about the allowed values.

use strum::{EnumMessage, IntoEnumIterator};

/// Render one line per value: `` * `value` - description ``.
pub fn help_text<E>() -> String
where
  E: IntoEnumIterator + EnumMessage + AsRef<str>,
{
  E::iter()
    .map(|value| {
      let description = value.get_message().unwrap_or_default();
      format!("* `{}` - {}", value.as_ref(), description)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalogi::{Afleidingswijze, Archiefnominatie};

  #[test]
  fn lists_every_value() {
    let text = help_text::<Afleidingswijze>();
    assert_eq!(text.lines().count(), Afleidingswijze::iter().count());
    assert!(text.contains("* `ingangsdatum_besluit` - "));
  }

  #[test]
  fn includes_descriptions() {
    let text = help_text::<Archiefnominatie>();
    assert!(text.starts_with("* `blijvend_bewaren` - Het zaakdossier moet bewaard"));
  }
}
