//! Checks for besluit and document writes.

use super::{Pipeline, require, unchanged, validate_rsin};
use crate::{
  ValidationFailure,
  besluiten::{Besluit, BesluitInformatieObject},
  catalogi::{BesluitType, InformatieObjectType, ZaakType},
  documenten::{InformatieObject, NewInformatieObject},
  relation::Relation,
  zaken::Zaak,
};

// ─── Besluit ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BesluitContext {
  /// The stored besluit when updating.
  pub existing:            Option<Besluit>,
  /// Loaded when `besluittype` is local.
  pub besluittype:         Option<BesluitType>,
  /// Loaded when `zaak` is local.
  pub zaak:                Option<Zaak>,
  pub zaaktype:            Option<ZaakType>,
  pub identificatie_taken: bool,
}

/// A besluit tied to a zaak must have a besluittype the zaak's zaaktype
/// allows. Only checked when both references are local.
pub fn validate_besluittype_zaaktype(
  candidate: &Besluit,
  context: &BesluitContext,
) -> Result<(), ValidationFailure> {
  let (Relation::Local(besluittype), Some(Relation::Local(_))) =
    (&candidate.besluittype, &candidate.zaak)
  else {
    return Ok(());
  };
  let zaaktype = require(context.zaaktype.as_ref(), "zaak")?;

  if !zaaktype.besluittypen.contains(besluittype) {
    return Err(ValidationFailure::IncompatibleType {
      field: "besluittype",
      other: "zaak",
      code:  "zaaktype-mismatch",
    });
  }
  Ok(())
}

pub fn besluit() -> Pipeline<Besluit, BesluitContext> {
  Pipeline::<Besluit, BesluitContext>::new()
    .then(|c, x| {
      unchanged(
        x.existing.as_ref().map(|b| &b.identificatie),
        &c.identificatie,
        "identificatie",
      )
    })
    .then(|c, x| {
      unchanged(
        x.existing.as_ref().map(|b| &b.verantwoordelijke_organisatie),
        &c.verantwoordelijke_organisatie,
        "verantwoordelijke_organisatie",
      )
    })
    .then(|c, _| {
      validate_rsin("verantwoordelijke_organisatie", &c.verantwoordelijke_organisatie)
    })
    .then(|c, x| match c.besluittype {
      Relation::Local(_) => require(x.besluittype.as_ref(), "besluittype").map(drop),
      Relation::Remote(_) => Ok(()),
    })
    .then(|c, x| match c.zaak {
      Some(Relation::Local(_)) => require(x.zaak.as_ref(), "zaak").map(drop),
      _ => Ok(()),
    })
    .then(validate_besluittype_zaaktype)
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

// ─── BesluitInformatieObject ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BesluitInformatieObjectContext {
  pub besluit:          Option<Besluit>,
  /// The besluit's besluittype, when it is local.
  pub besluittype:      Option<BesluitType>,
  /// Loaded when `informatieobject` is local.
  pub informatieobject: Option<InformatieObject>,
  /// The same document is already linked to this besluit.
  pub duplicate:        bool,
}

/// A local document must be of a type the besluittype allows. Remote
/// documents and remote besluittypen cannot be checked here.
pub fn validate_informatieobjecttype(
  candidate: &BesluitInformatieObject,
  context: &BesluitInformatieObjectContext,
) -> Result<(), ValidationFailure> {
  let (Relation::Local(_), Some(besluittype)) =
    (&candidate.informatieobject, &context.besluittype)
  else {
    return Ok(());
  };
  let document = require(context.informatieobject.as_ref(), "informatieobject")?;

  if !besluittype
    .informatieobjecttypen
    .contains(&document.informatieobjecttype)
  {
    return Err(ValidationFailure::IncompatibleType {
      field: "informatieobject",
      other: "besluit",
      code:  "missing-besluittype-informatieobjecttype-relation",
    });
  }
  Ok(())
}

pub fn besluitinformatieobject()
-> Pipeline<BesluitInformatieObject, BesluitInformatieObjectContext> {
  Pipeline::<BesluitInformatieObject, BesluitInformatieObjectContext>::new()
    .then(|_, x| require(x.besluit.as_ref(), "besluit").map(drop))
    .then(|c, x| match c.informatieobject {
      Relation::Local(_) => {
        require(x.informatieobject.as_ref(), "informatieobject").map(drop)
      }
      Relation::Remote(_) => Ok(()),
    })
    .then(validate_informatieobjecttype)
    .then(|_, x| {
      if x.duplicate {
        return Err(ValidationFailure::NotUnique {
          field: "informatieobject",
          code:  "unique",
        });
      }
      Ok(())
    })
}

// ─── InformatieObject ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InformatieObjectContext {
  pub informatieobjecttype: Option<InformatieObjectType>,
}

pub fn informatieobject() -> Pipeline<NewInformatieObject, InformatieObjectContext> {
  Pipeline::<NewInformatieObject, InformatieObjectContext>::new().then(|_, x| {
    require(x.informatieobjecttype.as_ref(), "informatieobjecttype").map(drop)
  })
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use uuid::Uuid;

  use super::*;
  use crate::{
    catalogi::Vertrouwelijkheidaanduiding,
    geldigheid::Geldigheid,
  };

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn besluittype() -> BesluitType {
    BesluitType {
      uuid:                  Uuid::new_v4(),
      catalogus:             Uuid::new_v4(),
      omschrijving:          "Vergunning".into(),
      geldigheid:            Geldigheid::open(d(2018, 1, 1)),
      informatieobjecttypen: vec![],
    }
  }

  fn zaaktype_allowing(besluittypen: Vec<Uuid>) -> ZaakType {
    ZaakType {
      uuid: Uuid::new_v4(),
      catalogus: Uuid::new_v4(),
      identificatie: "ZT-1".into(),
      omschrijving: "Aanvraag".into(),
      vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding::Openbaar,
      selectielijst_procestype: None,
      geldigheid: Geldigheid::open(d(2018, 1, 1)),
      besluittypen,
      informatieobjecttypen: vec![],
      deelzaaktypen: vec![],
    }
  }

  fn besluit(besluittype: Relation, zaak: Option<Relation>) -> Besluit {
    Besluit {
      uuid: Uuid::new_v4(),
      identificatie: "BESLUIT-2018-0000000001".into(),
      verantwoordelijke_organisatie: "517439943".into(),
      besluittype,
      zaak,
      datum: d(2018, 9, 6),
      toelichting: String::new(),
      bestuursorgaan: String::new(),
      ingangsdatum: d(2018, 10, 1),
      vervaldatum: None,
      vervalreden: None,
      publicatiedatum: None,
      verzenddatum: None,
      uiterlijke_reactiedatum: None,
    }
  }

  #[test]
  fn besluittype_not_allowed_by_zaaktype() {
    let bt = besluittype();
    let zt = zaaktype_allowing(vec![]);
    let candidate = besluit(Relation::Local(bt.uuid), Some(Relation::Local(Uuid::new_v4())));
    let ctx = BesluitContext {
      besluittype: Some(bt),
      zaaktype: Some(zt),
      zaak: None,
      ..BesluitContext::default()
    };
    let err = validate_besluittype_zaaktype(&candidate, &ctx).unwrap_err();
    assert_eq!(err.code(), "zaaktype-mismatch");
  }

  #[test]
  fn besluittype_allowed_by_zaaktype() {
    let bt = besluittype();
    let zt = zaaktype_allowing(vec![bt.uuid]);
    let candidate = besluit(Relation::Local(bt.uuid), Some(Relation::Local(Uuid::new_v4())));
    let ctx = BesluitContext {
      besluittype: Some(bt),
      zaaktype: Some(zt),
      ..BesluitContext::default()
    };
    validate_besluittype_zaaktype(&candidate, &ctx).unwrap();
  }

  #[test]
  fn remote_references_skip_compatibility() {
    let candidate = besluit(
      Relation::Remote("https://catalogi.example.com/besluittypen/1".into()),
      Some(Relation::Local(Uuid::new_v4())),
    );
    validate_besluittype_zaaktype(&candidate, &BesluitContext::default()).unwrap();
  }

  #[test]
  fn verantwoordelijke_organisatie_is_immutable() {
    let bt = besluittype();
    let stored = besluit(Relation::Local(bt.uuid), None);
    let mut candidate = stored.clone();
    candidate.verantwoordelijke_organisatie = "000000000".into();
    let ctx = BesluitContext {
      existing: Some(stored),
      besluittype: Some(bt),
      ..BesluitContext::default()
    };
    let err = super::besluit().run(&candidate, &ctx).unwrap_err();
    assert_eq!(err.code(), "wijzigen-niet-toegelaten");
    assert_eq!(err.field(), Some("verantwoordelijke_organisatie"));
  }

  #[test]
  fn document_type_must_be_allowed() {
    let mut bt = besluittype();
    let document = InformatieObject {
      uuid:                 Uuid::new_v4(),
      identificatie:        "DOC-1".into(),
      titel:                String::new(),
      informatieobjecttype: Uuid::new_v4(),
    };
    let stored = besluit(Relation::Local(bt.uuid), None);
    let candidate = BesluitInformatieObject {
      uuid:             Uuid::new_v4(),
      besluit:          stored.uuid,
      informatieobject: Relation::Local(document.uuid),
    };
    let mut ctx = BesluitInformatieObjectContext {
      besluit:          Some(stored),
      besluittype:      Some(bt.clone()),
      informatieobject: Some(document.clone()),
      duplicate:        false,
    };
    let err = besluitinformatieobject().run(&candidate, &ctx).unwrap_err();
    assert_eq!(err.code(), "missing-besluittype-informatieobjecttype-relation");

    bt.informatieobjecttypen.push(document.informatieobjecttype);
    ctx.besluittype = Some(bt);
    besluitinformatieobject().run(&candidate, &ctx).unwrap();

    ctx.duplicate = true;
    let err = besluitinformatieobject().run(&candidate, &ctx).unwrap_err();
    assert_eq!(err.code(), "unique");
  }
}
