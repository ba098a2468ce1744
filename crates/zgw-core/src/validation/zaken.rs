//! Checks for zaak writes.

use uuid::Uuid;

use super::{Pipeline, all_found, require, unchanged, validate_rsin};
use crate::{
  ValidationFailure,
  catalogi::{Eigenschap, ResultaatType, ZaakType},
  zaken::{NewResultaat, NewZaakEigenschap, Zaak},
};

fn zaaktype_mismatch(field: &'static str) -> ValidationFailure {
  ValidationFailure::IncompatibleType {
    field,
    other: "zaak",
    code: "zaaktype-mismatch",
  }
}

// ─── Zaak ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ZaakContext {
  /// The stored zaak when updating.
  pub existing:               Option<Zaak>,
  pub zaaktype:               Option<ZaakType>,
  pub hoofdzaak:              Option<Zaak>,
  /// The hoofdzaak followed by its own ancestors, nearest first.
  pub hoofdzaak_ancestors:    Vec<Uuid>,
  pub relevante_andere_zaken: Vec<Zaak>,
  /// Another zaak of the same bronorganisatie carries this identificatie.
  pub identificatie_taken:    bool,
}

/// The hoofdzaak relation forms a tree of depth one: no self reference, no
/// cycle, and a deelzaak cannot itself be a hoofdzaak.
pub fn validate_hoofdzaak(
  candidate: &Zaak,
  context: &ZaakContext,
) -> Result<(), ValidationFailure> {
  let Some(hoofdzaak) = candidate.hoofdzaak else {
    return Ok(());
  };

  if hoofdzaak == candidate.uuid {
    return Err(ValidationFailure::InvalidHoofdzaak {
      code:   "self-forbidden",
      reason: "a zaak cannot be its own hoofdzaak",
    });
  }
  if context.hoofdzaak_ancestors.contains(&candidate.uuid) {
    return Err(ValidationFailure::InvalidHoofdzaak {
      code:   "cycle",
      reason: "a zaak cannot be its own ancestor",
    });
  }

  let parent = require(context.hoofdzaak.as_ref(), "hoofdzaak")?;
  if parent.hoofdzaak.is_some() {
    return Err(ValidationFailure::InvalidHoofdzaak {
      code:   "deelzaak-als-hoofdzaak",
      reason: "a deelzaak cannot be used as hoofdzaak",
    });
  }
  Ok(())
}

pub fn zaak() -> Pipeline<Zaak, ZaakContext> {
  Pipeline::<Zaak, ZaakContext>::new()
    .then(|c, x| {
      unchanged(
        x.existing.as_ref().map(|z| &z.identificatie),
        &c.identificatie,
        "identificatie",
      )
    })
    .then(|c, x| {
      unchanged(
        x.existing.as_ref().map(|z| &z.bronorganisatie),
        &c.bronorganisatie,
        "bronorganisatie",
      )
    })
    .then(|c, _| validate_rsin("bronorganisatie", &c.bronorganisatie))
    .then(|_, x| require(x.zaaktype.as_ref(), "zaaktype").map(drop))
    .then(validate_hoofdzaak)
    .then(|c, x| {
      all_found(
        &c.relevante_andere_zaken,
        &x.relevante_andere_zaken,
        |z| z.uuid,
        "relevante_andere_zaken",
      )
    })
    .then(|_, x| {
      if x.identificatie_taken {
        return Err(ValidationFailure::NotUnique {
          field: "identificatie",
          code:  "identificatie-niet-uniek",
        });
      }
      Ok(())
    })
}

// ─── Resultaat ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ResultaatContext {
  pub zaak:               Option<Zaak>,
  pub resultaattype:      Option<ResultaatType>,
  pub zaak_has_resultaat: bool,
}

pub fn resultaat() -> Pipeline<NewResultaat, ResultaatContext> {
  Pipeline::<NewResultaat, ResultaatContext>::new()
    .then(|_, x| require(x.zaak.as_ref(), "zaak").map(drop))
    .then(|_, x| require(x.resultaattype.as_ref(), "resultaattype").map(drop))
    .then(|_, x| match (&x.zaak, &x.resultaattype) {
      (Some(zaak), Some(rt)) if rt.zaaktype != zaak.zaaktype => {
        Err(zaaktype_mismatch("resultaattype"))
      }
      _ => Ok(()),
    })
    .then(|_, x| {
      if x.zaak_has_resultaat {
        return Err(ValidationFailure::NotUnique {
          field: "zaak",
          code:  "unique",
        });
      }
      Ok(())
    })
}

// ─── ZaakEigenschap ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ZaakEigenschapContext {
  pub zaak:       Option<Zaak>,
  pub eigenschap: Option<Eigenschap>,
}

pub fn zaakeigenschap() -> Pipeline<NewZaakEigenschap, ZaakEigenschapContext> {
  Pipeline::<NewZaakEigenschap, ZaakEigenschapContext>::new()
    .then(|_, x| require(x.zaak.as_ref(), "zaak").map(drop))
    .then(|_, x| require(x.eigenschap.as_ref(), "eigenschap").map(drop))
    .then(|_, x| match (&x.zaak, &x.eigenschap) {
      (Some(zaak), Some(e)) if e.zaaktype != zaak.zaaktype => {
        Err(zaaktype_mismatch("eigenschap"))
      }
      _ => Ok(()),
    })
}
