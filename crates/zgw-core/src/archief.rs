//! Archive-date derivation.
//!
//! When a zaak closes, its result type decides when the dossier is due for
//! its archive action: `archiefactiedatum = brondatum + archiefactietermijn`.
//! The brondatum is found according to the configured [`Afleidingswijze`].
//! Whenever that source date is not (yet) known the outcome is
//! [`ArchiveDerivation::ManualResolutionRequired`], never an error.

use std::{fmt, future::Future};

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::{
  Result, ValidationFailure,
  catalogi::{Afleidingswijze, BrondatumArchiefprocedure, ResultaatType},
  selectielijst::Procestermijn,
  zaken::{Zaak, ZaakEigenschap},
};

// ─── Policy checks ───────────────────────────────────────────────────────────

/// Some procestermijnen fix how the brondatum must be derived.
pub fn validate_afleidingswijze(
  afleidingswijze: Afleidingswijze,
  procestermijn: Option<Procestermijn>,
) -> Result<(), ValidationFailure> {
  let Some(procestermijn) = procestermijn else {
    return Ok(());
  };
  let required = match procestermijn {
    Procestermijn::Nihil => Afleidingswijze::Afgehandeld,
    Procestermijn::IngeschatteBestaansduurProcesobject => {
      Afleidingswijze::Termijn
    }
    _ => return Ok(()),
  };

  if afleidingswijze != required {
    return Err(ValidationFailure::DerivationPolicyMismatch {
      afleidingswijze,
      procestermijn,
    });
  }
  Ok(())
}

/// Each afleidingswijze needs a few procedure attributes to locate its date.
pub fn validate_procedure_fields(
  procedure: &BrondatumArchiefprocedure,
) -> Result<(), ValidationFailure> {
  let afleidingswijze = procedure.afleidingswijze;
  let filled = |value: &Option<String>| {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
  };

  let missing: Option<&'static str> = match afleidingswijze {
    Afleidingswijze::Eigenschap => {
      (!filled(&procedure.datumkenmerk)).then_some("datumkenmerk")
    }
    Afleidingswijze::Zaakobject => {
      if !filled(&procedure.objecttype) {
        Some("objecttype")
      } else if !filled(&procedure.datumkenmerk) {
        Some("datumkenmerk")
      } else {
        None
      }
    }
    Afleidingswijze::AnderDatumkenmerk => {
      if !filled(&procedure.datumkenmerk) {
        Some("datumkenmerk")
      } else if !filled(&procedure.objecttype) {
        Some("objecttype")
      } else if !filled(&procedure.registratie) {
        Some("registratie")
      } else {
        None
      }
    }
    Afleidingswijze::Termijn => {
      procedure.procestermijn.is_none().then_some("procestermijn")
    }
    _ => None,
  };

  match missing {
    Some(field) => Err(ValidationFailure::MissingProcedureField {
      field,
      afleidingswijze,
    }),
    None => Ok(()),
  }
}

// ─── Inputs & outcome ────────────────────────────────────────────────────────

/// Everything the derivation may need besides the zaak's own close date.
/// Assembled by the store from the zaak's neighbourhood.
#[derive(Debug, Clone, Default)]
pub struct Brongegevens {
  pub besluit_ingangsdata:   Vec<NaiveDate>,
  pub besluit_vervaldata:    Vec<NaiveDate>,
  pub eigenschappen:         Vec<ZaakEigenschap>,
  /// One entry per relevante andere zaak; `None` if that zaak is open.
  pub gerelateerde_einddata: Vec<Option<NaiveDate>>,
  /// Close date of the hoofdzaak, if there is one and it is closed.
  pub hoofdzaak_einddatum:   Option<NaiveDate>,
  /// Supplied by a [`DatumkenmerkResolver`] for `zaakobject` and
  /// `ander_datumkenmerk`.
  pub extern_datum:          Option<NaiveDate>,
}

/// Why the brondatum could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedSource {
  NoResultaat,
  NoArchiefactietermijn,
  ProcedureIncomplete { field: &'static str },
  NoBesluitDate { afleidingswijze: Afleidingswijze },
  EigenschapMissing { naam: String },
  EigenschapUnparseable { naam: String, waarde: String },
  NoGerelateerdeZaak,
  GerelateerdeZaakOpen,
  HoofdzaakNotClosed,
  ExternalDatumkenmerk { afleidingswijze: Afleidingswijze },
}

impl fmt::Display for UnresolvedSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoResultaat => f.write_str("zaak was closed without a resultaat"),
      Self::NoArchiefactietermijn => {
        f.write_str("resultaattype has no archiefactietermijn")
      }
      Self::ProcedureIncomplete { field } => {
        write!(f, "brondatum_archiefprocedure.{field} is not set")
      }
      Self::NoBesluitDate { afleidingswijze } => {
        write!(f, "no besluit provides a date for {afleidingswijze}")
      }
      Self::EigenschapMissing { naam } => {
        write!(f, "zaak has no eigenschap {naam:?}")
      }
      Self::EigenschapUnparseable { naam, waarde } => {
        write!(f, "eigenschap {naam:?} holds {waarde:?}, which is not a date")
      }
      Self::NoGerelateerdeZaak => f.write_str("zaak has no related zaken"),
      Self::GerelateerdeZaakOpen => f.write_str("a related zaak is still open"),
      Self::HoofdzaakNotClosed => {
        f.write_str("zaak has no hoofdzaak or it is still open")
      }
      Self::ExternalDatumkenmerk { afleidingswijze } => {
        write!(f, "no resolver produced a date for {afleidingswijze}")
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ArchiveDerivation {
  Computed { archiefactiedatum: NaiveDate },
  ManualResolutionRequired { unresolved: UnresolvedSource },
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Derive the archive-action date for a zaak closed on `einddatum`.
pub fn compute_archiefactiedatum(
  resultaattype: &ResultaatType,
  einddatum: NaiveDate,
  bron: &Brongegevens,
) -> Result<ArchiveDerivation> {
  let Some(termijn) = resultaattype.archiefactietermijn else {
    return Ok(ArchiveDerivation::ManualResolutionRequired {
      unresolved: UnresolvedSource::NoArchiefactietermijn,
    });
  };

  match brondatum(&resultaattype.brondatum_archiefprocedure, einddatum, bron)? {
    Ok(datum) => Ok(ArchiveDerivation::Computed {
      archiefactiedatum: termijn.add_to(datum)?,
    }),
    Err(unresolved) => {
      Ok(ArchiveDerivation::ManualResolutionRequired { unresolved })
    }
  }
}

/// The outer error is fatal; the inner one means "not known yet".
fn brondatum(
  procedure: &BrondatumArchiefprocedure,
  einddatum: NaiveDate,
  bron: &Brongegevens,
) -> Result<Result<NaiveDate, UnresolvedSource>> {
  let afleidingswijze = procedure.afleidingswijze;

  let found = match afleidingswijze {
    Afleidingswijze::Afgehandeld => Ok(einddatum),

    Afleidingswijze::Termijn => match procedure.procestermijn {
      Some(procestermijn) => Ok(procestermijn.add_to(einddatum)?),
      None => Err(UnresolvedSource::ProcedureIncomplete {
        field: "procestermijn",
      }),
    },

    Afleidingswijze::IngangsdatumBesluit => latest(&bron.besluit_ingangsdata)
      .ok_or(UnresolvedSource::NoBesluitDate { afleidingswijze }),

    Afleidingswijze::VervaldatumBesluit => latest(&bron.besluit_vervaldata)
      .ok_or(UnresolvedSource::NoBesluitDate { afleidingswijze }),

    Afleidingswijze::Eigenschap => eigenschap_datum(procedure, bron),

    Afleidingswijze::GerelateerdeZaak => {
      if bron.gerelateerde_einddata.is_empty() {
        Err(UnresolvedSource::NoGerelateerdeZaak)
      } else {
        bron
          .gerelateerde_einddata
          .iter()
          .copied()
          .collect::<Option<Vec<_>>>()
          .and_then(|einddata| latest(&einddata))
          .ok_or(UnresolvedSource::GerelateerdeZaakOpen)
      }
    }

    Afleidingswijze::Hoofdzaak => bron
      .hoofdzaak_einddatum
      .ok_or(UnresolvedSource::HoofdzaakNotClosed),

    Afleidingswijze::Zaakobject | Afleidingswijze::AnderDatumkenmerk => bron
      .extern_datum
      .ok_or(UnresolvedSource::ExternalDatumkenmerk { afleidingswijze }),
  };

  Ok(found)
}

fn latest(dates: &[NaiveDate]) -> Option<NaiveDate> {
  dates.iter().copied().max()
}

fn eigenschap_datum(
  procedure: &BrondatumArchiefprocedure,
  bron: &Brongegevens,
) -> Result<NaiveDate, UnresolvedSource> {
  let Some(naam) = procedure.datumkenmerk.as_deref() else {
    return Err(UnresolvedSource::ProcedureIncomplete {
      field: "datumkenmerk",
    });
  };

  let eigenschap = bron
    .eigenschappen
    .iter()
    .find(|e| e.naam == naam)
    .ok_or_else(|| UnresolvedSource::EigenschapMissing {
      naam: naam.to_owned(),
    })?;

  parse_datum(&eigenschap.waarde).ok_or_else(|| {
    UnresolvedSource::EigenschapUnparseable {
      naam:   naam.to_owned(),
      waarde: eigenschap.waarde.clone(),
    }
  })
}

/// Accepts `YYYY-MM-DD`, `YYYYMMDD` and RFC 3339 timestamps.
pub fn parse_datum(waarde: &str) -> Option<NaiveDate> {
  let waarde = waarde.trim();
  NaiveDate::parse_from_str(waarde, "%Y-%m-%d")
    .or_else(|_| NaiveDate::parse_from_str(waarde, "%Y%m%d"))
    .ok()
    .or_else(|| {
      DateTime::parse_from_rfc3339(waarde)
        .ok()
        .map(|dt| dt.date_naive())
    })
}

// ─── External resolution ─────────────────────────────────────────────────────

/// Supplies the brondatum for methods whose date lives in another
/// registration (`zaakobject`, `ander_datumkenmerk`).
pub trait DatumkenmerkResolver: Send + Sync {
  fn resolve<'a>(
    &'a self,
    zaak: &'a Zaak,
    procedure: &'a BrondatumArchiefprocedure,
  ) -> impl Future<Output = Option<NaiveDate>> + Send + 'a;
}

/// Resolves nothing; every external method ends in manual resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl DatumkenmerkResolver for Unresolved {
  async fn resolve(
    &self,
    _zaak: &Zaak,
    _procedure: &BrondatumArchiefprocedure,
  ) -> Option<NaiveDate> {
    None
  }
}

#[cfg(test)]
mod tests {
  use strum::EnumMessage as _;
  use uuid::Uuid;

  use super::*;
  use crate::{catalogi::Archiefnominatie, termijn::Termijn};

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  fn resultaattype(afleidingswijze: Afleidingswijze) -> ResultaatType {
    ResultaatType {
      uuid:                       Uuid::new_v4(),
      zaaktype:                   Uuid::new_v4(),
      omschrijving:               "Toegekend".into(),
      selectielijstklasse:        None,
      archiefnominatie:           Archiefnominatie::BlijvendBewaren,
      archiefactietermijn:        Some(Termijn::years(10)),
      brondatum_archiefprocedure: BrondatumArchiefprocedure::new(afleidingswijze),
    }
  }

  fn eigenschap(naam: &str, waarde: &str) -> ZaakEigenschap {
    ZaakEigenschap {
      uuid:       Uuid::new_v4(),
      zaak:       Uuid::new_v4(),
      eigenschap: Uuid::new_v4(),
      naam:       naam.into(),
      waarde:     waarde.into(),
    }
  }

  fn computed(date: NaiveDate) -> ArchiveDerivation {
    ArchiveDerivation::Computed { archiefactiedatum: date }
  }

  #[test]
  fn afgehandeld_adds_termijn_to_einddatum() {
    let rt = resultaattype(Afleidingswijze::Afgehandeld);
    let out =
      compute_archiefactiedatum(&rt, d(2018, 10, 22), &Brongegevens::default())
        .unwrap();
    assert_eq!(out, computed(d(2028, 10, 22)));
  }

  #[test]
  fn ingangsdatum_besluit_uses_latest_besluit() {
    let rt = resultaattype(Afleidingswijze::IngangsdatumBesluit);
    let bron = Brongegevens {
      besluit_ingangsdata: vec![d(2019, 1, 1), d(2020, 5, 3)],
      ..Brongegevens::default()
    };
    let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &bron).unwrap();
    assert_eq!(out, computed(d(2030, 5, 3)));
  }

  #[test]
  fn vervaldatum_besluit_starts_on_the_vervaldatum() {
    let rt = resultaattype(Afleidingswijze::VervaldatumBesluit);
    let bron = Brongegevens {
      besluit_vervaldata: vec![d(2019, 3, 31)],
      ..Brongegevens::default()
    };
    let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &bron).unwrap();
    assert_eq!(out, computed(d(2029, 3, 31)));
    assert_eq!(
      Afleidingswijze::VervaldatumBesluit.get_message(),
      Some("De termijn start op de datum waarop het besluit vervalt.")
    );
  }

  #[test]
  fn missing_besluit_requires_manual_resolution() {
    let rt = resultaattype(Afleidingswijze::VervaldatumBesluit);
    let out =
      compute_archiefactiedatum(&rt, d(2018, 10, 22), &Brongegevens::default())
        .unwrap();
    assert!(matches!(out, ArchiveDerivation::ManualResolutionRequired {
      unresolved: UnresolvedSource::NoBesluitDate { .. },
    }));
  }

  #[test]
  fn termijn_starts_after_procestermijn() {
    let mut rt = resultaattype(Afleidingswijze::Termijn);
    rt.brondatum_archiefprocedure.procestermijn = Some(Termijn::years(5));
    let out =
      compute_archiefactiedatum(&rt, d(2018, 10, 22), &Brongegevens::default())
        .unwrap();
    assert_eq!(out, computed(d(2033, 10, 22)));
  }

  #[test]
  fn eigenschap_accepts_several_date_formats() {
    let mut rt = resultaattype(Afleidingswijze::Eigenschap);
    rt.brondatum_archiefprocedure.datumkenmerk = Some("vervaldatum".into());

    for waarde in ["2020-01-31", "20200131", "2020-01-31T12:00:00+01:00"] {
      let bron = Brongegevens {
        eigenschappen: vec![eigenschap("vervaldatum", waarde)],
        ..Brongegevens::default()
      };
      let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &bron).unwrap();
      assert_eq!(out, computed(d(2030, 1, 31)), "{waarde}");
    }
  }

  #[test]
  fn unparseable_eigenschap_requires_manual_resolution() {
    let mut rt = resultaattype(Afleidingswijze::Eigenschap);
    rt.brondatum_archiefprocedure.datumkenmerk = Some("vervaldatum".into());
    let bron = Brongegevens {
      eigenschappen: vec![eigenschap("vervaldatum", "volgend jaar")],
      ..Brongegevens::default()
    };
    let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &bron).unwrap();
    assert!(matches!(out, ArchiveDerivation::ManualResolutionRequired {
      unresolved: UnresolvedSource::EigenschapUnparseable { .. },
    }));
  }

  #[test]
  fn gerelateerde_zaak_needs_all_related_closed() {
    let rt = resultaattype(Afleidingswijze::GerelateerdeZaak);

    let open = Brongegevens {
      gerelateerde_einddata: vec![Some(d(2019, 1, 1)), None],
      ..Brongegevens::default()
    };
    let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &open).unwrap();
    assert!(matches!(out, ArchiveDerivation::ManualResolutionRequired {
      unresolved: UnresolvedSource::GerelateerdeZaakOpen,
    }));

    let closed = Brongegevens {
      gerelateerde_einddata: vec![Some(d(2019, 1, 1)), Some(d(2019, 6, 1))],
      ..Brongegevens::default()
    };
    let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &closed).unwrap();
    assert_eq!(out, computed(d(2029, 6, 1)));
  }

  #[test]
  fn external_methods_use_supplied_datum() {
    let rt = resultaattype(Afleidingswijze::Zaakobject);
    let out =
      compute_archiefactiedatum(&rt, d(2018, 10, 22), &Brongegevens::default())
        .unwrap();
    assert!(matches!(out, ArchiveDerivation::ManualResolutionRequired { .. }));

    let bron = Brongegevens {
      extern_datum: Some(d(2021, 3, 1)),
      ..Brongegevens::default()
    };
    let out = compute_archiefactiedatum(&rt, d(2018, 10, 22), &bron).unwrap();
    assert_eq!(out, computed(d(2031, 3, 1)));
  }

  #[test]
  fn no_archiefactietermijn_requires_manual_resolution() {
    let mut rt = resultaattype(Afleidingswijze::Afgehandeld);
    rt.archiefactietermijn = None;
    let out =
      compute_archiefactiedatum(&rt, d(2018, 10, 22), &Brongegevens::default())
        .unwrap();
    assert_eq!(out, ArchiveDerivation::ManualResolutionRequired {
      unresolved: UnresolvedSource::NoArchiefactietermijn,
    });
  }

  #[test]
  fn policy_compatibility() {
    use Afleidingswijze as A;
    use Procestermijn as P;

    assert!(validate_afleidingswijze(A::Afgehandeld, Some(P::Nihil)).is_ok());
    assert!(validate_afleidingswijze(A::Termijn, Some(P::Nihil)).is_err());
    assert!(
      validate_afleidingswijze(A::Termijn, Some(P::IngeschatteBestaansduurProcesobject))
        .is_ok()
    );
    let err = validate_afleidingswijze(
      A::Afgehandeld,
      Some(P::IngeschatteBestaansduurProcesobject),
    )
    .unwrap_err();
    assert_eq!(err.code(), "invalid-afleidingswijze-for-procestermijn");

    for afleidingswijze in [A::Eigenschap, A::Hoofdzaak, A::Termijn] {
      assert!(
        validate_afleidingswijze(afleidingswijze, Some(P::VastTeLeggenDatum)).is_ok()
      );
      assert!(validate_afleidingswijze(afleidingswijze, None).is_ok());
    }
  }

  #[test]
  fn procedure_fields_per_method() {
    let mut procedure = BrondatumArchiefprocedure::new(Afleidingswijze::AnderDatumkenmerk);
    procedure.datumkenmerk = Some("einddatum".into());
    procedure.objecttype = Some("pand".into());
    let err = validate_procedure_fields(&procedure).unwrap_err();
    assert_eq!(err.field(), Some("registratie"));
    assert_eq!(err.code(), "required");

    procedure.registratie = Some("BAG".into());
    validate_procedure_fields(&procedure).unwrap();

    let termijn = BrondatumArchiefprocedure::new(Afleidingswijze::Termijn);
    assert!(validate_procedure_fields(&termijn).is_err());

    let afgehandeld = BrondatumArchiefprocedure::new(Afleidingswijze::Afgehandeld);
    validate_procedure_fields(&afgehandeld).unwrap();
  }

  #[test]
  fn parse_datum_rejects_garbage() {
    assert_eq!(parse_datum(" 2019-02-28 "), Some(d(2019, 2, 28)));
    assert_eq!(parse_datum("2019-02-30"), None);
    assert_eq!(parse_datum(""), None);
  }
}
