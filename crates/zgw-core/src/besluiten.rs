//! Besluiten: decisions and their document links.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumMessage, EnumString};
use uuid::Uuid;

use crate::{
  ValidationFailure,
  relation::{Relation, RelationInput},
};

/// Why a besluit stopped being in force.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
  EnumMessage,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VervalReden {
  #[strum(message = "Besluit met tijdelijke werking")]
  Tijdelijk,
  #[strum(message = "Besluit ingetrokken door overheid")]
  IngetrokkenOverheid,
  #[strum(message = "Besluit ingetrokken o.v.v. belanghebbende")]
  IngetrokkenBelanghebbende,
}

// ─── Besluit ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Besluit {
  pub uuid:                          Uuid,
  pub identificatie:                 String,
  pub verantwoordelijke_organisatie: String,
  pub besluittype:                   Relation,
  pub zaak:                          Option<Relation>,
  pub datum:                         NaiveDate,
  pub toelichting:                   String,
  pub bestuursorgaan:                String,
  pub ingangsdatum:                  NaiveDate,
  pub vervaldatum:                   Option<NaiveDate>,
  pub vervalreden:                   Option<VervalReden>,
  pub publicatiedatum:               Option<NaiveDate>,
  pub verzenddatum:                  Option<NaiveDate>,
  pub uiterlijke_reactiedatum:       Option<NaiveDate>,
}

/// Client input for creating or replacing a besluit.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBesluit {
  /// Generated when omitted.
  #[serde(default)]
  pub identificatie:                 Option<String>,
  pub verantwoordelijke_organisatie: String,
  pub besluittype:                   RelationInput,
  #[serde(default)]
  pub zaak:                          Option<RelationInput>,
  pub datum:                         NaiveDate,
  #[serde(default)]
  pub toelichting:                   String,
  #[serde(default)]
  pub bestuursorgaan:                String,
  pub ingangsdatum:                  NaiveDate,
  #[serde(default)]
  pub vervaldatum:                   Option<NaiveDate>,
  #[serde(default)]
  pub vervalreden:                   Option<VervalReden>,
  #[serde(default)]
  pub publicatiedatum:               Option<NaiveDate>,
  #[serde(default)]
  pub verzenddatum:                  Option<NaiveDate>,
  #[serde(default)]
  pub uiterlijke_reactiedatum:       Option<NaiveDate>,
}

impl NewBesluit {
  /// Resolve the raw relation fields and assemble the candidate besluit.
  pub fn into_besluit(
    self,
    uuid: Uuid,
    identificatie: String,
  ) -> Result<Besluit, ValidationFailure> {
    let besluittype = self.besluittype.resolve("besluittype")?;
    let zaak = self
      .zaak
      .map(|z| z.resolve("zaak"))
      .transpose()?;

    Ok(Besluit {
      uuid,
      identificatie,
      verantwoordelijke_organisatie: self.verantwoordelijke_organisatie,
      besluittype,
      zaak,
      datum: self.datum,
      toelichting: self.toelichting,
      bestuursorgaan: self.bestuursorgaan,
      ingangsdatum: self.ingangsdatum,
      vervaldatum: self.vervaldatum,
      vervalreden: self.vervalreden,
      publicatiedatum: self.publicatiedatum,
      verzenddatum: self.verzenddatum,
      uiterlijke_reactiedatum: self.uiterlijke_reactiedatum,
    })
  }
}

// ─── BesluitInformatieObject ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BesluitInformatieObject {
  pub uuid:             Uuid,
  pub besluit:          Uuid,
  pub informatieobject: Relation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBesluitInformatieObject {
  pub besluit:          Uuid,
  pub informatieobject: RelationInput,
}

impl NewBesluitInformatieObject {
  pub fn into_bio(
    self,
    uuid: Uuid,
  ) -> Result<BesluitInformatieObject, ValidationFailure> {
    Ok(BesluitInformatieObject {
      uuid,
      besluit: self.besluit,
      informatieobject: self.informatieobject.resolve("informatieobject")?,
    })
  }
}
