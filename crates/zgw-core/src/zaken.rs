//! Zaken: the case aggregate and the records hanging off it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
  catalogi::Archiefnominatie,
  lifecycle::{ClosureResult, ZaakState},
};

// ─── Zaak ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zaak {
  pub uuid:                        Uuid,
  pub identificatie:               String,
  /// RSIN of the organisation that created the zaak.
  pub bronorganisatie:             String,
  pub zaaktype:                    Uuid,
  pub startdatum:                  NaiveDate,
  /// `None` while the zaak is open.
  pub einddatum:                   Option<NaiveDate>,
  pub archiefnominatie:            Option<Archiefnominatie>,
  pub archiefactiedatum:           Option<NaiveDate>,
  /// Set when the zaak was closed but the archive date could not be derived
  /// automatically and must be filled in by hand.
  pub archiefactiedatum_handmatig: bool,
  pub hoofdzaak:                   Option<Uuid>,
  pub relevante_andere_zaken:      Vec<Uuid>,
}

impl Zaak {
  pub fn state(&self) -> ZaakState {
    match self.einddatum {
      Some(_) => ZaakState::Closed,
      None => ZaakState::Open,
    }
  }

  /// Write the outcome of a status transition back onto the zaak.
  pub fn apply_closure(&mut self, closure: &ClosureResult) {
    self.einddatum = closure.einddatum;
    self.archiefnominatie = closure.archiefnominatie;
    self.archiefactiedatum = closure.archiefactiedatum;
    self.archiefactiedatum_handmatig = closure.manual_resolution_required;
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewZaak {
  /// Generated when omitted.
  #[serde(default)]
  pub identificatie:          Option<String>,
  pub bronorganisatie:        String,
  pub zaaktype:               Uuid,
  pub startdatum:             NaiveDate,
  #[serde(default)]
  pub archiefnominatie:       Option<Archiefnominatie>,
  #[serde(default)]
  pub hoofdzaak:              Option<Uuid>,
  #[serde(default)]
  pub relevante_andere_zaken: Vec<Uuid>,
}

impl NewZaak {
  pub fn into_zaak(self, uuid: Uuid, identificatie: String) -> Zaak {
    Zaak {
      uuid,
      identificatie,
      bronorganisatie: self.bronorganisatie,
      zaaktype: self.zaaktype,
      startdatum: self.startdatum,
      einddatum: None,
      archiefnominatie: self.archiefnominatie,
      archiefactiedatum: None,
      archiefactiedatum_handmatig: false,
      hoofdzaak: self.hoofdzaak,
      relevante_andere_zaken: self.relevante_andere_zaken,
    }
  }
}

/// A partial update. Absent fields keep their current value; `hoofdzaak`
/// distinguishes "absent" from an explicit `null` that detaches the zaak.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZaakPatch {
  #[serde(default)]
  pub identificatie:          Option<String>,
  #[serde(default)]
  pub bronorganisatie:        Option<String>,
  #[serde(default)]
  pub startdatum:             Option<NaiveDate>,
  #[serde(default)]
  pub archiefnominatie:       Option<Archiefnominatie>,
  /// Filling in the archive date by hand settles a pending manual
  /// resolution.
  #[serde(default)]
  pub archiefactiedatum:      Option<NaiveDate>,
  #[serde(default, deserialize_with = "present")]
  pub hoofdzaak:              Option<Option<Uuid>>,
  #[serde(default)]
  pub relevante_andere_zaken: Option<Vec<Uuid>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::deserialize(deserializer).map(Some)
}

impl ZaakPatch {
  /// The zaak as it would look after this patch. Validation compares the
  /// result against the stored zaak.
  pub fn apply_to(&self, current: &Zaak) -> Zaak {
    let mut next = current.clone();
    if let Some(identificatie) = &self.identificatie {
      next.identificatie = identificatie.clone();
    }
    if let Some(bronorganisatie) = &self.bronorganisatie {
      next.bronorganisatie = bronorganisatie.clone();
    }
    if let Some(startdatum) = self.startdatum {
      next.startdatum = startdatum;
    }
    if let Some(nominatie) = self.archiefnominatie {
      next.archiefnominatie = Some(nominatie);
    }
    if let Some(datum) = self.archiefactiedatum {
      next.archiefactiedatum = Some(datum);
      next.archiefactiedatum_handmatig = false;
    }
    if let Some(hoofdzaak) = self.hoofdzaak {
      next.hoofdzaak = hoofdzaak;
    }
    if let Some(andere) = &self.relevante_andere_zaken {
      next.relevante_andere_zaken = andere.clone();
    }
    next
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// An immutable status event. Posting one is the only way a zaak closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
  pub uuid:               Uuid,
  pub zaak:               Uuid,
  pub statustype:         Uuid,
  pub datum_status_gezet: DateTime<Utc>,
  pub statustoelichting:  String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStatus {
  pub zaak:               Uuid,
  pub statustype:         Uuid,
  pub datum_status_gezet: DateTime<Utc>,
  #[serde(default)]
  pub statustoelichting:  String,
}

// ─── Resultaat ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resultaat {
  pub uuid:          Uuid,
  pub zaak:          Uuid,
  pub resultaattype: Uuid,
  pub toelichting:   String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewResultaat {
  pub zaak:          Uuid,
  pub resultaattype: Uuid,
  #[serde(default)]
  pub toelichting:   String,
}

// ─── ZaakEigenschap ──────────────────────────────────────────────────────────

/// A value for one of the zaaktype's eigenschappen. `naam` is copied from the
/// eigenschap so archive derivation can find it by `datumkenmerk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZaakEigenschap {
  pub uuid:       Uuid,
  pub zaak:       Uuid,
  pub eigenschap: Uuid,
  pub naam:       String,
  pub waarde:     String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewZaakEigenschap {
  pub zaak:       Uuid,
  pub eigenschap: Uuid,
  pub waarde:     String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn zaak() -> Zaak {
    NewZaak {
      identificatie:          None,
      bronorganisatie:        "517439943".into(),
      zaaktype:               Uuid::new_v4(),
      startdatum:             NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
      archiefnominatie:       None,
      hoofdzaak:              Some(Uuid::new_v4()),
      relevante_andere_zaken: vec![],
    }
    .into_zaak(Uuid::new_v4(), "ZAAK-2018-0000000001".into())
  }

  #[test]
  fn new_zaak_is_open() {
    let z = zaak();
    assert_eq!(z.state(), ZaakState::Open);
    assert!(!z.archiefactiedatum_handmatig);
  }

  #[test]
  fn absent_hoofdzaak_is_kept_and_null_detaches() {
    let z = zaak();

    let absent: ZaakPatch = serde_json::from_str("{}").unwrap();
    assert_eq!(absent.apply_to(&z).hoofdzaak, z.hoofdzaak);

    let null: ZaakPatch = serde_json::from_str(r#"{"hoofdzaak": null}"#).unwrap();
    assert_eq!(null.apply_to(&z).hoofdzaak, None);
  }

  #[test]
  fn manual_archiefactiedatum_clears_flag() {
    let mut z = zaak();
    z.einddatum = NaiveDate::from_ymd_opt(2019, 1, 1);
    z.archiefactiedatum_handmatig = true;

    let patch = ZaakPatch {
      archiefactiedatum: NaiveDate::from_ymd_opt(2029, 1, 1),
      ..ZaakPatch::default()
    };
    let next = patch.apply_to(&z);
    assert_eq!(next.archiefactiedatum, NaiveDate::from_ymd_opt(2029, 1, 1));
    assert!(!next.archiefactiedatum_handmatig);
  }
}
