//! Checks for catalog writes.

use uuid::Uuid;

use super::{Pipeline, all_found, require, validate_rsin};
use crate::{
  ValidationFailure,
  archief::{validate_afleidingswijze, validate_procedure_fields},
  catalogi::{
    BesluitType, Catalogus, Eigenschap, InCatalogus, InformatieObjectType,
    NewCatalogus, ResultaatType, StatusType, ZaakType,
  },
  geldigheid::validate_geen_overlap,
  selectielijst::Selectielijstklasse,
};

pub const VOLGNUMMER_MAX: u16 = 9999;

/// Every related type must live in `catalogus`.
pub fn validate_same_catalogus<'a, T>(
  catalogus: Uuid,
  related: impl IntoIterator<Item = &'a T>,
  field: &'static str,
) -> Result<(), ValidationFailure>
where
  T: InCatalogus + 'a,
{
  if related.into_iter().any(|r| r.catalogus() != catalogus) {
    return Err(ValidationFailure::CrossCatalog { field });
  }
  Ok(())
}

fn known<T: InCatalogus>(
  wanted: &[Uuid],
  found: &[T],
  field: &'static str,
) -> Result<(), ValidationFailure> {
  all_found(wanted, found, <T as InCatalogus>::uuid, field)
}

// ─── Catalogus ───────────────────────────────────────────────────────────────

pub fn catalogus() -> Pipeline<NewCatalogus, ()> {
  Pipeline::<NewCatalogus, ()>::new()
    .then(|c: &NewCatalogus, _| {
      let len = c.domein.chars().count();
      if !(1..=5).contains(&len) {
        return Err(ValidationFailure::OutOfRange {
          field: "domein",
          min:   1,
          max:   5,
        });
      }
      Ok(())
    })
    .then(|c, _| validate_rsin("rsin", &c.rsin))
}

// ─── ZaakType ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ZaakTypeContext {
  pub catalogus:             Option<Catalogus>,
  /// Zaaktypen with the candidate's catalogus and omschrijving.
  pub same_scope:            Vec<ZaakType>,
  pub besluittypen:          Vec<BesluitType>,
  pub informatieobjecttypen: Vec<InformatieObjectType>,
  pub deelzaaktypen:         Vec<ZaakType>,
}

pub fn zaaktype() -> Pipeline<ZaakType, ZaakTypeContext> {
  Pipeline::<ZaakType, ZaakTypeContext>::new()
    .then(|_, x: &ZaakTypeContext| {
      require(x.catalogus.as_ref(), "catalogus").map(drop)
    })
    .then(|c: &ZaakType, x| known(&c.besluittypen, &x.besluittypen, "besluittypen"))
    .then(|c, x| {
      known(
        &c.informatieobjecttypen,
        &x.informatieobjecttypen,
        "informatieobjecttypen",
      )
    })
    .then(|c, x| known(&c.deelzaaktypen, &x.deelzaaktypen, "deelzaaktypen"))
    .then(|c, x| validate_geen_overlap(&c.geldigheid, &x.same_scope, Some(c.uuid)))
    .then(|c, x| validate_same_catalogus(c.catalogus, &x.besluittypen, "besluittypen"))
    .then(|c, x| {
      validate_same_catalogus(
        c.catalogus,
        &x.informatieobjecttypen,
        "informatieobjecttypen",
      )
    })
    .then(|c, x| {
      validate_same_catalogus(c.catalogus, &x.deelzaaktypen, "deelzaaktypen")
    })
}

// ─── BesluitType ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BesluitTypeContext {
  pub catalogus:             Option<Catalogus>,
  pub same_scope:            Vec<BesluitType>,
  pub informatieobjecttypen: Vec<InformatieObjectType>,
}

pub fn besluittype() -> Pipeline<BesluitType, BesluitTypeContext> {
  Pipeline::<BesluitType, BesluitTypeContext>::new()
    .then(|_, x: &BesluitTypeContext| {
      require(x.catalogus.as_ref(), "catalogus").map(drop)
    })
    .then(|c: &BesluitType, x| {
      known(
        &c.informatieobjecttypen,
        &x.informatieobjecttypen,
        "informatieobjecttypen",
      )
    })
    .then(|c, x| validate_geen_overlap(&c.geldigheid, &x.same_scope, Some(c.uuid)))
    .then(|c, x| {
      validate_same_catalogus(
        c.catalogus,
        &x.informatieobjecttypen,
        "informatieobjecttypen",
      )
    })
}

// ─── InformatieObjectType ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InformatieObjectTypeContext {
  pub catalogus:  Option<Catalogus>,
  pub same_scope: Vec<InformatieObjectType>,
}

pub fn informatieobjecttype()
-> Pipeline<InformatieObjectType, InformatieObjectTypeContext> {
  Pipeline::<InformatieObjectType, InformatieObjectTypeContext>::new()
    .then(|_, x: &InformatieObjectTypeContext| {
      require(x.catalogus.as_ref(), "catalogus").map(drop)
    })
    .then(|c: &InformatieObjectType, x| {
      validate_geen_overlap(&c.geldigheid, &x.same_scope, Some(c.uuid))
    })
}

// ─── StatusType ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StatusTypeContext {
  pub zaaktype: Option<ZaakType>,
  /// The statustypen already defined for the zaaktype.
  pub siblings: Vec<StatusType>,
}

pub fn statustype() -> Pipeline<StatusType, StatusTypeContext> {
  Pipeline::<StatusType, StatusTypeContext>::new()
    .then(|_, x: &StatusTypeContext| {
      require(x.zaaktype.as_ref(), "zaaktype").map(drop)
    })
    .then(|c: &StatusType, _| {
      if !(1..=VOLGNUMMER_MAX).contains(&c.volgnummer) {
        return Err(ValidationFailure::OutOfRange {
          field: "volgnummer",
          min:   1,
          max:   u32::from(VOLGNUMMER_MAX),
        });
      }
      Ok(())
    })
    .then(|c, x| {
      let taken = x
        .siblings
        .iter()
        .any(|s| s.uuid != c.uuid && s.volgnummer == c.volgnummer);
      if taken {
        return Err(ValidationFailure::NotUnique {
          field: "volgnummer",
          code:  "unique",
        });
      }
      Ok(())
    })
}

// ─── ResultaatType ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ResultaatTypeContext {
  pub zaaktype:            Option<ZaakType>,
  /// The registry record behind `selectielijstklasse`, fetched before the
  /// write starts.
  pub selectielijstklasse: Option<Selectielijstklasse>,
}

pub fn resultaattype() -> Pipeline<ResultaatType, ResultaatTypeContext> {
  Pipeline::<ResultaatType, ResultaatTypeContext>::new()
    .then(|_, x: &ResultaatTypeContext| {
      require(x.zaaktype.as_ref(), "zaaktype").map(drop)
    })
    .then(|c: &ResultaatType, _| {
      validate_procedure_fields(&c.brondatum_archiefprocedure)
    })
    .then(|_, x| {
      let (Some(zaaktype), Some(klasse)) =
        (&x.zaaktype, &x.selectielijstklasse)
      else {
        return Ok(());
      };
      if zaaktype.selectielijst_procestype.as_deref()
        != Some(klasse.proces_type.as_str())
      {
        return Err(ValidationFailure::ProcesTypeMismatch {
          field: "selectielijstklasse",
          other: "zaaktype.selectielijst_procestype",
        });
      }
      Ok(())
    })
    .then(|c, x| match &x.selectielijstklasse {
      Some(klasse) => validate_afleidingswijze(
        c.brondatum_archiefprocedure.afleidingswijze,
        klasse.procestermijn,
      ),
      None => Ok(()),
    })
}

// ─── Eigenschap ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct EigenschapContext {
  pub zaaktype: Option<ZaakType>,
  pub siblings: Vec<Eigenschap>,
}

pub fn eigenschap() -> Pipeline<Eigenschap, EigenschapContext> {
  Pipeline::<Eigenschap, EigenschapContext>::new()
    .then(|_, x: &EigenschapContext| {
      require(x.zaaktype.as_ref(), "zaaktype").map(drop)
    })
    .then(|c: &Eigenschap, x| {
      if x.siblings.iter().any(|e| e.uuid != c.uuid && e.naam == c.naam) {
        return Err(ValidationFailure::NotUnique {
          field: "naam",
          code:  "unique",
        });
      }
      Ok(())
    })
}
