//! Catalog ("Catalogi") types: the configuration every zaak and besluit is
//! typed against.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumMessage, EnumString};
use uuid::Uuid;

use crate::{
  geldigheid::{Geldig, Geldigheid},
  termijn::Termijn,
};

// ─── Choices ─────────────────────────────────────────────────────────────────

/// Confidentiality classification of a type or object.
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
pub enum Vertrouwelijkheidaanduiding {
  #[strum(message = "Openbaar")]
  Openbaar,
  #[strum(message = "Beperkt openbaar")]
  BeperktOpenbaar,
  #[strum(message = "Intern")]
  Intern,
  #[strum(message = "Zaakvertrouwelijk")]
  Zaakvertrouwelijk,
  #[strum(message = "Vertrouwelijk")]
  Vertrouwelijk,
  #[strum(message = "Confidentieel")]
  Confidentieel,
  #[strum(message = "Geheim")]
  Geheim,
  #[strum(message = "Zeer geheim")]
  ZeerGeheim,
}

/// What happens to the zaak dossier once `archiefactiedatum` is reached.
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
pub enum Archiefnominatie {
  #[strum(message = "Het zaakdossier moet bewaard blijven en op de \
                     Archiefactiedatum overgedragen worden naar een \
                     archiefbewaarplaats.")]
  BlijvendBewaren,
  #[strum(message = "Het zaakdossier moet op of na de Archiefactiedatum \
                     vernietigd worden.")]
  Vernietigen,
}

/// How the start date (`brondatum`) of the archive-action term is derived.
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
pub enum Afleidingswijze {
  #[strum(message = "De termijn start op de datum waarop de zaak is \
                     afgehandeld (ZAAK.Einddatum in het RGBZ).")]
  Afgehandeld,
  #[strum(message = "De termijn start op de datum die is vastgelegd in een \
                     ander datumveld dan de datumvelden waarop de overige \
                     waarden betrekking hebben.")]
  AnderDatumkenmerk,
  #[strum(message = "De termijn start op de datum die vermeld is in een \
                     zaaktype-specifieke eigenschap.")]
  Eigenschap,
  #[strum(message = "De termijn start op de datum waarop de gerelateerde \
                     zaak is afgehandeld.")]
  GerelateerdeZaak,
  #[strum(message = "De termijn start op de datum waarop de gerelateerde \
                     hoofdzaak is afgehandeld.")]
  Hoofdzaak,
  #[strum(message = "De termijn start op de datum waarop het besluit van \
                     kracht wordt.")]
  IngangsdatumBesluit,
  #[strum(message = "De termijn start een vast aantal jaren na de datum \
                     waarop de zaak is afgehandeld.")]
  Termijn,
  #[strum(message = "De termijn start op de datum waarop het besluit \
                     vervalt.")]
  VervaldatumBesluit,
  #[strum(message = "De termijn start op de einddatum geldigheid van het \
                     zaakobject.")]
  Zaakobject,
}

impl Afleidingswijze {
  /// Methods whose source date lives outside this registration and can only
  /// be supplied by an injected resolver.
  pub fn needs_external_resolution(&self) -> bool {
    matches!(self, Self::AnderDatumkenmerk | Self::Zaakobject)
  }
}

/// Data type of a zaaktype-specific property.
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
pub enum Formaat {
  #[strum(message = "Tekst")]
  Tekst,
  #[strum(message = "Getal")]
  Getal,
  #[strum(message = "Datum")]
  Datum,
  #[strum(message = "Datum/tijd")]
  DatumTijd,
}

// ─── Catalogus ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogus {
  pub uuid:                       Uuid,
  pub domein:                     String,
  pub rsin:                       String,
  pub contactpersoon_beheer_naam: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCatalogus {
  pub domein:                     String,
  pub rsin:                       String,
  pub contactpersoon_beheer_naam: String,
}

/// Anything that belongs to exactly one catalogus.
pub trait InCatalogus {
  fn uuid(&self) -> Uuid;
  fn catalogus(&self) -> Uuid;
}

// ─── ZaakType ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZaakType {
  pub uuid:                        Uuid,
  pub catalogus:                   Uuid,
  pub identificatie:               String,
  pub omschrijving:                String,
  pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
  /// URL of the process type in the selectielijst registry.
  pub selectielijst_procestype:    Option<String>,
  #[serde(flatten)]
  pub geldigheid:                  Geldigheid,
  pub besluittypen:                Vec<Uuid>,
  pub informatieobjecttypen:       Vec<Uuid>,
  pub deelzaaktypen:               Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewZaakType {
  pub catalogus:                   Uuid,
  pub identificatie:               String,
  pub omschrijving:                String,
  pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
  #[serde(default)]
  pub selectielijst_procestype:    Option<String>,
  #[serde(flatten)]
  pub geldigheid:                  Geldigheid,
  #[serde(default)]
  pub besluittypen:                Vec<Uuid>,
  #[serde(default)]
  pub informatieobjecttypen:       Vec<Uuid>,
  #[serde(default)]
  pub deelzaaktypen:               Vec<Uuid>,
}

impl NewZaakType {
  pub fn into_zaaktype(self, uuid: Uuid) -> ZaakType {
    ZaakType {
      uuid,
      catalogus: self.catalogus,
      identificatie: self.identificatie,
      omschrijving: self.omschrijving,
      vertrouwelijkheidaanduiding: self.vertrouwelijkheidaanduiding,
      selectielijst_procestype: self.selectielijst_procestype,
      geldigheid: self.geldigheid,
      besluittypen: self.besluittypen,
      informatieobjecttypen: self.informatieobjecttypen,
      deelzaaktypen: self.deelzaaktypen,
    }
  }
}

// ─── BesluitType ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BesluitType {
  pub uuid:                  Uuid,
  pub catalogus:             Uuid,
  pub omschrijving:          String,
  #[serde(flatten)]
  pub geldigheid:            Geldigheid,
  pub informatieobjecttypen: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBesluitType {
  pub catalogus:             Uuid,
  pub omschrijving:          String,
  #[serde(flatten)]
  pub geldigheid:            Geldigheid,
  #[serde(default)]
  pub informatieobjecttypen: Vec<Uuid>,
}

// ─── InformatieObjectType ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformatieObjectType {
  pub uuid:                        Uuid,
  pub catalogus:                   Uuid,
  pub omschrijving:                String,
  pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
  #[serde(flatten)]
  pub geldigheid:                  Geldigheid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInformatieObjectType {
  pub catalogus:                   Uuid,
  pub omschrijving:                String,
  pub vertrouwelijkheidaanduiding: Vertrouwelijkheidaanduiding,
  #[serde(flatten)]
  pub geldigheid:                  Geldigheid,
}

// ─── StatusType ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusType {
  pub uuid:         Uuid,
  pub zaaktype:     Uuid,
  pub omschrijving: String,
  /// Position in the zaaktype's status sequence, 1..=9999.
  pub volgnummer:   u16,
}

impl StatusType {
  /// A status type is the eindstatus iff no sibling (status type of the same
  /// zaaktype) has a higher volgnummer.
  pub fn is_eindstatus(&self, siblings: &[StatusType]) -> bool {
    siblings
      .iter()
      .filter(|s| s.zaaktype == self.zaaktype)
      .all(|s| s.volgnummer <= self.volgnummer)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStatusType {
  pub zaaktype:     Uuid,
  pub omschrijving: String,
  pub volgnummer:   u16,
}

// ─── ResultaatType ───────────────────────────────────────────────────────────

/// Configuration of how the brondatum of the archive procedure is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrondatumArchiefprocedure {
  pub afleidingswijze:  Afleidingswijze,
  /// Name of the attribute holding the date, e.g. an eigenschap naam.
  #[serde(default)]
  pub datumkenmerk:     Option<String>,
  #[serde(default)]
  pub einddatum_bekend: bool,
  #[serde(default)]
  pub objecttype:       Option<String>,
  #[serde(default)]
  pub registratie:      Option<String>,
  #[serde(default)]
  pub procestermijn:    Option<Termijn>,
}

impl BrondatumArchiefprocedure {
  pub fn new(afleidingswijze: Afleidingswijze) -> Self {
    Self {
      afleidingswijze,
      datumkenmerk: None,
      einddatum_bekend: false,
      objecttype: None,
      registratie: None,
      procestermijn: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultaatType {
  pub uuid:                       Uuid,
  pub zaaktype:                   Uuid,
  pub omschrijving:               String,
  /// URL of the selectielijst `resultaat` this type is classified under.
  pub selectielijstklasse:        Option<String>,
  pub archiefnominatie:           Archiefnominatie,
  pub archiefactietermijn:        Option<Termijn>,
  pub brondatum_archiefprocedure: BrondatumArchiefprocedure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewResultaatType {
  pub zaaktype:                   Uuid,
  pub omschrijving:               String,
  #[serde(default)]
  pub selectielijstklasse:        Option<String>,
  pub archiefnominatie:           Archiefnominatie,
  #[serde(default)]
  pub archiefactietermijn:        Option<Termijn>,
  pub brondatum_archiefprocedure: BrondatumArchiefprocedure,
}

// ─── Eigenschap ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eigenschap {
  pub uuid:     Uuid,
  pub zaaktype: Uuid,
  pub naam:     String,
  pub formaat:  Formaat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEigenschap {
  pub zaaktype: Uuid,
  pub naam:     String,
  pub formaat:  Formaat,
}

// ─── Trait impls ─────────────────────────────────────────────────────────────

macro_rules! catalog_type {
  ($($ty:ty),*) => {$(
    impl Geldig for $ty {
      fn uuid(&self) -> Uuid { self.uuid }

      fn geldigheid(&self) -> &Geldigheid { &self.geldigheid }
    }

    impl InCatalogus for $ty {
      fn uuid(&self) -> Uuid { self.uuid }

      fn catalogus(&self) -> Uuid { self.catalogus }
    }
  )*};
}

catalog_type!(ZaakType, BesluitType, InformatieObjectType);

#[cfg(test)]
mod tests {
  use super::*;

  fn statustype(zaaktype: Uuid, volgnummer: u16) -> StatusType {
    StatusType {
      uuid: Uuid::new_v4(),
      zaaktype,
      omschrijving: format!("stap {volgnummer}"),
      volgnummer,
    }
  }

  #[test]
  fn highest_volgnummer_is_eindstatus() {
    let zaaktype = Uuid::new_v4();
    let all = vec![
      statustype(zaaktype, 1),
      statustype(zaaktype, 2),
      statustype(zaaktype, 5),
    ];
    assert!(!all[0].is_eindstatus(&all));
    assert!(!all[1].is_eindstatus(&all));
    assert!(all[2].is_eindstatus(&all));
  }

  #[test]
  fn siblings_of_other_zaaktypen_are_ignored() {
    let zaaktype = Uuid::new_v4();
    let ours = statustype(zaaktype, 2);
    let all = vec![ours.clone(), statustype(Uuid::new_v4(), 9)];
    assert!(ours.is_eindstatus(&all));
  }

  #[test]
  fn afleidingswijze_round_trips_as_snake_case() {
    assert_eq!(Afleidingswijze::IngangsdatumBesluit.as_ref(), "ingangsdatum_besluit");
    assert_eq!(
      "ander_datumkenmerk".parse::<Afleidingswijze>().unwrap(),
      Afleidingswijze::AnderDatumkenmerk
    );
    let json = serde_json::to_string(&Afleidingswijze::GerelateerdeZaak).unwrap();
    assert_eq!(json, "\"gerelateerde_zaak\"");
  }

  #[test]
  fn geldigheid_is_flattened() {
    let json = serde_json::json!({
      "catalogus": Uuid::nil(),
      "omschrijving": "Besluit op aanvraag",
      "begin_geldigheid": "2018-01-01",
    });
    let parsed: NewBesluitType = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.geldigheid.einde, None);
    assert!(parsed.informatieobjecttypen.is_empty());
  }
}
