//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are `YYYY-MM-DD`, timestamps RFC 3339. Choice enums are stored by
//! their snake_case name, durations as ISO 8601, UUID lists and the archive
//! procedure as compact JSON.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use uuid::Uuid;
use zgw_core::{
  besluiten::{Besluit, BesluitInformatieObject},
  catalogi::{
    BesluitType, Catalogus, Eigenschap, InformatieObjectType, ResultaatType,
    StatusType, ZaakType,
  },
  documenten::InformatieObject,
  geldigheid::Geldigheid,
  relation::Relation,
  termijn::Termijn,
  zaken::{Resultaat, Status, Zaak, ZaakEigenschap},
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_opt_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
  s.map(decode_date).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Choice enums are stored by their canonical value.
pub fn encode_choice<E: AsRef<str>>(value: &E) -> String {
  value.as_ref().to_owned()
}

pub fn decode_choice<E: FromStr>(kind: &'static str, s: &str) -> Result<E> {
  s.parse().map_err(|_| {
    Error::Core(zgw_core::Error::UnknownChoice {
      kind,
      value: s.to_owned(),
    })
  })
}

pub fn encode_uuids(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_uuids(s: &str) -> Result<Vec<Uuid>> { Ok(serde_json::from_str(s)?) }

pub fn decode_termijn(s: Option<&str>) -> Result<Option<Termijn>> {
  Ok(s.map(str::parse::<Termijn>).transpose()?)
}

/// The `(local, url)` column pair of a relation.
pub fn encode_relation(relation: &Relation) -> (Option<String>, String) {
  let (local, remote) = relation.to_parts();
  (local.map(encode_uuid), remote)
}

pub fn decode_relation(
  field: &'static str,
  local: Option<&str>,
  url: &str,
) -> Result<Relation> {
  Ok(Relation::from_parts(field, decode_opt_uuid(local)?, url)?)
}

// ─── Catalogi rows ───────────────────────────────────────────────────────────

pub const CATALOGUS_COLUMNS: &str =
  "uuid, domein, rsin, contactpersoon_beheer_naam";

pub struct RawCatalogus {
  pub uuid:                       String,
  pub domein:                     String,
  pub rsin:                       String,
  pub contactpersoon_beheer_naam: String,
}

impl RawCatalogus {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                       row.get(0)?,
      domein:                     row.get(1)?,
      rsin:                       row.get(2)?,
      contactpersoon_beheer_naam: row.get(3)?,
    })
  }

  pub fn into_catalogus(self) -> Result<Catalogus> {
    Ok(Catalogus {
      uuid:                       decode_uuid(&self.uuid)?,
      domein:                     self.domein,
      rsin:                       self.rsin,
      contactpersoon_beheer_naam: self.contactpersoon_beheer_naam,
    })
  }
}

pub const ZAAKTYPE_COLUMNS: &str = "uuid, catalogus, identificatie, \
  omschrijving, vertrouwelijkheidaanduiding, selectielijst_procestype, \
  begin_geldigheid, einde_geldigheid, besluittypen, informatieobjecttypen, \
  deelzaaktypen";

pub struct RawZaakType {
  pub uuid:                        String,
  pub catalogus:                   String,
  pub identificatie:               String,
  pub omschrijving:                String,
  pub vertrouwelijkheidaanduiding: String,
  pub selectielijst_procestype:    Option<String>,
  pub begin_geldigheid:            String,
  pub einde_geldigheid:            Option<String>,
  pub besluittypen:                String,
  pub informatieobjecttypen:       String,
  pub deelzaaktypen:               String,
}

impl RawZaakType {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                        row.get(0)?,
      catalogus:                   row.get(1)?,
      identificatie:               row.get(2)?,
      omschrijving:                row.get(3)?,
      vertrouwelijkheidaanduiding: row.get(4)?,
      selectielijst_procestype:    row.get(5)?,
      begin_geldigheid:            row.get(6)?,
      einde_geldigheid:            row.get(7)?,
      besluittypen:                row.get(8)?,
      informatieobjecttypen:       row.get(9)?,
      deelzaaktypen:               row.get(10)?,
    })
  }

  pub fn into_zaaktype(self) -> Result<ZaakType> {
    Ok(ZaakType {
      uuid:                        decode_uuid(&self.uuid)?,
      catalogus:                   decode_uuid(&self.catalogus)?,
      identificatie:               self.identificatie,
      omschrijving:                self.omschrijving,
      vertrouwelijkheidaanduiding: decode_choice(
        "vertrouwelijkheidaanduiding",
        &self.vertrouwelijkheidaanduiding,
      )?,
      selectielijst_procestype:    self.selectielijst_procestype,
      geldigheid:                  Geldigheid::new(
        decode_date(&self.begin_geldigheid)?,
        decode_opt_date(self.einde_geldigheid.as_deref())?,
      ),
      besluittypen:                decode_uuids(&self.besluittypen)?,
      informatieobjecttypen:       decode_uuids(&self.informatieobjecttypen)?,
      deelzaaktypen:               decode_uuids(&self.deelzaaktypen)?,
    })
  }
}

pub const BESLUITTYPE_COLUMNS: &str = "uuid, catalogus, omschrijving, \
  begin_geldigheid, einde_geldigheid, informatieobjecttypen";

pub struct RawBesluitType {
  pub uuid:                  String,
  pub catalogus:             String,
  pub omschrijving:          String,
  pub begin_geldigheid:      String,
  pub einde_geldigheid:      Option<String>,
  pub informatieobjecttypen: String,
}

impl RawBesluitType {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                  row.get(0)?,
      catalogus:             row.get(1)?,
      omschrijving:          row.get(2)?,
      begin_geldigheid:      row.get(3)?,
      einde_geldigheid:      row.get(4)?,
      informatieobjecttypen: row.get(5)?,
    })
  }

  pub fn into_besluittype(self) -> Result<BesluitType> {
    Ok(BesluitType {
      uuid:                  decode_uuid(&self.uuid)?,
      catalogus:             decode_uuid(&self.catalogus)?,
      omschrijving:          self.omschrijving,
      geldigheid:            Geldigheid::new(
        decode_date(&self.begin_geldigheid)?,
        decode_opt_date(self.einde_geldigheid.as_deref())?,
      ),
      informatieobjecttypen: decode_uuids(&self.informatieobjecttypen)?,
    })
  }
}

pub const INFORMATIEOBJECTTYPE_COLUMNS: &str = "uuid, catalogus, \
  omschrijving, vertrouwelijkheidaanduiding, begin_geldigheid, \
  einde_geldigheid";

pub struct RawInformatieObjectType {
  pub uuid:                        String,
  pub catalogus:                   String,
  pub omschrijving:                String,
  pub vertrouwelijkheidaanduiding: String,
  pub begin_geldigheid:            String,
  pub einde_geldigheid:            Option<String>,
}

impl RawInformatieObjectType {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                        row.get(0)?,
      catalogus:                   row.get(1)?,
      omschrijving:                row.get(2)?,
      vertrouwelijkheidaanduiding: row.get(3)?,
      begin_geldigheid:            row.get(4)?,
      einde_geldigheid:            row.get(5)?,
    })
  }

  pub fn into_informatieobjecttype(self) -> Result<InformatieObjectType> {
    Ok(InformatieObjectType {
      uuid:                        decode_uuid(&self.uuid)?,
      catalogus:                   decode_uuid(&self.catalogus)?,
      omschrijving:                self.omschrijving,
      vertrouwelijkheidaanduiding: decode_choice(
        "vertrouwelijkheidaanduiding",
        &self.vertrouwelijkheidaanduiding,
      )?,
      geldigheid:                  Geldigheid::new(
        decode_date(&self.begin_geldigheid)?,
        decode_opt_date(self.einde_geldigheid.as_deref())?,
      ),
    })
  }
}

pub const STATUSTYPE_COLUMNS: &str = "uuid, zaaktype, omschrijving, volgnummer";

pub struct RawStatusType {
  pub uuid:         String,
  pub zaaktype:     String,
  pub omschrijving: String,
  pub volgnummer:   i64,
}

impl RawStatusType {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:         row.get(0)?,
      zaaktype:     row.get(1)?,
      omschrijving: row.get(2)?,
      volgnummer:   row.get(3)?,
    })
  }

  pub fn into_statustype(self) -> Result<StatusType> {
    let volgnummer =
      u16::try_from(self.volgnummer).map_err(|e| Error::Corrupt {
        column:  "volgnummer",
        message: e.to_string(),
      })?;
    Ok(StatusType {
      uuid: decode_uuid(&self.uuid)?,
      zaaktype: decode_uuid(&self.zaaktype)?,
      omschrijving: self.omschrijving,
      volgnummer,
    })
  }
}

pub const RESULTAATTYPE_COLUMNS: &str = "uuid, zaaktype, omschrijving, \
  selectielijstklasse, archiefnominatie, archiefactietermijn, \
  brondatum_archiefprocedure";

pub struct RawResultaatType {
  pub uuid:                       String,
  pub zaaktype:                   String,
  pub omschrijving:               String,
  pub selectielijstklasse:        Option<String>,
  pub archiefnominatie:           String,
  pub archiefactietermijn:        Option<String>,
  pub brondatum_archiefprocedure: String,
}

impl RawResultaatType {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                       row.get(0)?,
      zaaktype:                   row.get(1)?,
      omschrijving:               row.get(2)?,
      selectielijstklasse:        row.get(3)?,
      archiefnominatie:           row.get(4)?,
      archiefactietermijn:        row.get(5)?,
      brondatum_archiefprocedure: row.get(6)?,
    })
  }

  pub fn into_resultaattype(self) -> Result<ResultaatType> {
    Ok(ResultaatType {
      uuid:                       decode_uuid(&self.uuid)?,
      zaaktype:                   decode_uuid(&self.zaaktype)?,
      omschrijving:               self.omschrijving,
      selectielijstklasse:        self.selectielijstklasse,
      archiefnominatie:           decode_choice(
        "archiefnominatie",
        &self.archiefnominatie,
      )?,
      archiefactietermijn:        decode_termijn(
        self.archiefactietermijn.as_deref(),
      )?,
      brondatum_archiefprocedure: serde_json::from_str(
        &self.brondatum_archiefprocedure,
      )?,
    })
  }
}

pub const EIGENSCHAP_COLUMNS: &str = "uuid, zaaktype, naam, formaat";

pub struct RawEigenschap {
  pub uuid:     String,
  pub zaaktype: String,
  pub naam:     String,
  pub formaat:  String,
}

impl RawEigenschap {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:     row.get(0)?,
      zaaktype: row.get(1)?,
      naam:     row.get(2)?,
      formaat:  row.get(3)?,
    })
  }

  pub fn into_eigenschap(self) -> Result<Eigenschap> {
    Ok(Eigenschap {
      uuid:     decode_uuid(&self.uuid)?,
      zaaktype: decode_uuid(&self.zaaktype)?,
      naam:     self.naam,
      formaat:  decode_choice("formaat", &self.formaat)?,
    })
  }
}

// ─── Zaken rows ──────────────────────────────────────────────────────────────

pub const ZAAK_COLUMNS: &str = "uuid, identificatie, bronorganisatie, \
  zaaktype, startdatum, einddatum, archiefnominatie, archiefactiedatum, \
  archiefactiedatum_handmatig, hoofdzaak, relevante_andere_zaken";

pub struct RawZaak {
  pub uuid:                        String,
  pub identificatie:               String,
  pub bronorganisatie:             String,
  pub zaaktype:                    String,
  pub startdatum:                  String,
  pub einddatum:                   Option<String>,
  pub archiefnominatie:            Option<String>,
  pub archiefactiedatum:           Option<String>,
  pub archiefactiedatum_handmatig: bool,
  pub hoofdzaak:                   Option<String>,
  pub relevante_andere_zaken:      String,
}

impl RawZaak {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                        row.get(0)?,
      identificatie:               row.get(1)?,
      bronorganisatie:             row.get(2)?,
      zaaktype:                    row.get(3)?,
      startdatum:                  row.get(4)?,
      einddatum:                   row.get(5)?,
      archiefnominatie:            row.get(6)?,
      archiefactiedatum:           row.get(7)?,
      archiefactiedatum_handmatig: row.get(8)?,
      hoofdzaak:                   row.get(9)?,
      relevante_andere_zaken:      row.get(10)?,
    })
  }

  pub fn into_zaak(self) -> Result<Zaak> {
    Ok(Zaak {
      uuid:                        decode_uuid(&self.uuid)?,
      identificatie:               self.identificatie,
      bronorganisatie:             self.bronorganisatie,
      zaaktype:                    decode_uuid(&self.zaaktype)?,
      startdatum:                  decode_date(&self.startdatum)?,
      einddatum:                   decode_opt_date(self.einddatum.as_deref())?,
      archiefnominatie:            self
        .archiefnominatie
        .as_deref()
        .map(|s| decode_choice("archiefnominatie", s))
        .transpose()?,
      archiefactiedatum:           decode_opt_date(
        self.archiefactiedatum.as_deref(),
      )?,
      archiefactiedatum_handmatig: self.archiefactiedatum_handmatig,
      hoofdzaak:                   decode_opt_uuid(self.hoofdzaak.as_deref())?,
      relevante_andere_zaken:      decode_uuids(&self.relevante_andere_zaken)?,
    })
  }
}

pub const STATUS_COLUMNS: &str =
  "uuid, zaak, statustype, datum_status_gezet, statustoelichting";

pub struct RawStatus {
  pub uuid:               String,
  pub zaak:               String,
  pub statustype:         String,
  pub datum_status_gezet: String,
  pub statustoelichting:  String,
}

impl RawStatus {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:               row.get(0)?,
      zaak:               row.get(1)?,
      statustype:         row.get(2)?,
      datum_status_gezet: row.get(3)?,
      statustoelichting:  row.get(4)?,
    })
  }

  pub fn into_status(self) -> Result<Status> {
    Ok(Status {
      uuid:               decode_uuid(&self.uuid)?,
      zaak:               decode_uuid(&self.zaak)?,
      statustype:         decode_uuid(&self.statustype)?,
      datum_status_gezet: decode_dt(&self.datum_status_gezet)?,
      statustoelichting:  self.statustoelichting,
    })
  }
}

pub const RESULTAAT_COLUMNS: &str = "uuid, zaak, resultaattype, toelichting";

pub struct RawResultaat {
  pub uuid:          String,
  pub zaak:          String,
  pub resultaattype: String,
  pub toelichting:   String,
}

impl RawResultaat {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:          row.get(0)?,
      zaak:          row.get(1)?,
      resultaattype: row.get(2)?,
      toelichting:   row.get(3)?,
    })
  }

  pub fn into_resultaat(self) -> Result<Resultaat> {
    Ok(Resultaat {
      uuid:          decode_uuid(&self.uuid)?,
      zaak:          decode_uuid(&self.zaak)?,
      resultaattype: decode_uuid(&self.resultaattype)?,
      toelichting:   self.toelichting,
    })
  }
}

pub const ZAAKEIGENSCHAP_COLUMNS: &str = "uuid, zaak, eigenschap, naam, waarde";

pub struct RawZaakEigenschap {
  pub uuid:       String,
  pub zaak:       String,
  pub eigenschap: String,
  pub naam:       String,
  pub waarde:     String,
}

impl RawZaakEigenschap {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:       row.get(0)?,
      zaak:       row.get(1)?,
      eigenschap: row.get(2)?,
      naam:       row.get(3)?,
      waarde:     row.get(4)?,
    })
  }

  pub fn into_zaakeigenschap(self) -> Result<ZaakEigenschap> {
    Ok(ZaakEigenschap {
      uuid:       decode_uuid(&self.uuid)?,
      zaak:       decode_uuid(&self.zaak)?,
      eigenschap: decode_uuid(&self.eigenschap)?,
      naam:       self.naam,
      waarde:     self.waarde,
    })
  }
}

pub const INFORMATIEOBJECT_COLUMNS: &str =
  "uuid, identificatie, titel, informatieobjecttype";

pub struct RawInformatieObject {
  pub uuid:                 String,
  pub identificatie:        String,
  pub titel:                String,
  pub informatieobjecttype: String,
}

impl RawInformatieObject {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                 row.get(0)?,
      identificatie:        row.get(1)?,
      titel:                row.get(2)?,
      informatieobjecttype: row.get(3)?,
    })
  }

  pub fn into_informatieobject(self) -> Result<InformatieObject> {
    Ok(InformatieObject {
      uuid:                 decode_uuid(&self.uuid)?,
      identificatie:        self.identificatie,
      titel:                self.titel,
      informatieobjecttype: decode_uuid(&self.informatieobjecttype)?,
    })
  }
}

// ─── Besluiten rows ──────────────────────────────────────────────────────────

pub const BESLUIT_COLUMNS: &str = "uuid, identificatie, \
  verantwoordelijke_organisatie, besluittype, besluittype_url, zaak, \
  zaak_url, datum, toelichting, bestuursorgaan, ingangsdatum, vervaldatum, \
  vervalreden, publicatiedatum, verzenddatum, uiterlijke_reactiedatum";

pub struct RawBesluit {
  pub uuid:                          String,
  pub identificatie:                 String,
  pub verantwoordelijke_organisatie: String,
  pub besluittype:                   Option<String>,
  pub besluittype_url:               String,
  pub zaak:                          Option<String>,
  pub zaak_url:                      String,
  pub datum:                         String,
  pub toelichting:                   String,
  pub bestuursorgaan:                String,
  pub ingangsdatum:                  String,
  pub vervaldatum:                   Option<String>,
  pub vervalreden:                   Option<String>,
  pub publicatiedatum:               Option<String>,
  pub verzenddatum:                  Option<String>,
  pub uiterlijke_reactiedatum:       Option<String>,
}

impl RawBesluit {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                          row.get(0)?,
      identificatie:                 row.get(1)?,
      verantwoordelijke_organisatie: row.get(2)?,
      besluittype:                   row.get(3)?,
      besluittype_url:               row.get(4)?,
      zaak:                          row.get(5)?,
      zaak_url:                      row.get(6)?,
      datum:                         row.get(7)?,
      toelichting:                   row.get(8)?,
      bestuursorgaan:                row.get(9)?,
      ingangsdatum:                  row.get(10)?,
      vervaldatum:                   row.get(11)?,
      vervalreden:                   row.get(12)?,
      publicatiedatum:               row.get(13)?,
      verzenddatum:                  row.get(14)?,
      uiterlijke_reactiedatum:       row.get(15)?,
    })
  }

  pub fn into_besluit(self) -> Result<Besluit> {
    let zaak = if self.zaak.is_none() && self.zaak_url.is_empty() {
      None
    } else {
      Some(decode_relation("zaak", self.zaak.as_deref(), &self.zaak_url)?)
    };

    Ok(Besluit {
      uuid: decode_uuid(&self.uuid)?,
      identificatie: self.identificatie,
      verantwoordelijke_organisatie: self.verantwoordelijke_organisatie,
      besluittype: decode_relation(
        "besluittype",
        self.besluittype.as_deref(),
        &self.besluittype_url,
      )?,
      zaak,
      datum: decode_date(&self.datum)?,
      toelichting: self.toelichting,
      bestuursorgaan: self.bestuursorgaan,
      ingangsdatum: decode_date(&self.ingangsdatum)?,
      vervaldatum: decode_opt_date(self.vervaldatum.as_deref())?,
      vervalreden: self
        .vervalreden
        .as_deref()
        .map(|s| decode_choice("vervalreden", s))
        .transpose()?,
      publicatiedatum: decode_opt_date(self.publicatiedatum.as_deref())?,
      verzenddatum: decode_opt_date(self.verzenddatum.as_deref())?,
      uiterlijke_reactiedatum: decode_opt_date(
        self.uiterlijke_reactiedatum.as_deref(),
      )?,
    })
  }
}

pub const BIO_COLUMNS: &str =
  "uuid, besluit, informatieobject, informatieobject_url";

pub struct RawBesluitInformatieObject {
  pub uuid:                 String,
  pub besluit:              String,
  pub informatieobject:     Option<String>,
  pub informatieobject_url: String,
}

impl RawBesluitInformatieObject {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uuid:                 row.get(0)?,
      besluit:              row.get(1)?,
      informatieobject:     row.get(2)?,
      informatieobject_url: row.get(3)?,
    })
  }

  pub fn into_bio(self) -> Result<BesluitInformatieObject> {
    Ok(BesluitInformatieObject {
      uuid:             decode_uuid(&self.uuid)?,
      besluit:          decode_uuid(&self.besluit)?,
      informatieobject: decode_relation(
        "informatieobject",
        self.informatieobject.as_deref(),
        &self.informatieobject_url,
      )?,
    })
  }
}

#[cfg(test)]
mod tests {
  use zgw_core::catalogi::Archiefnominatie;

  use super::*;

  #[test]
  fn choices_use_their_canonical_value() {
    assert_eq!(
      encode_choice(&Archiefnominatie::BlijvendBewaren),
      "blijvend_bewaren"
    );
    let back: Archiefnominatie =
      decode_choice("archiefnominatie", "vernietigen").unwrap();
    assert_eq!(back, Archiefnominatie::Vernietigen);

    let err = decode_choice::<Archiefnominatie>("archiefnominatie", "weg")
      .unwrap_err();
    assert!(matches!(
      err,
      Error::Core(zgw_core::Error::UnknownChoice { .. })
    ));
  }

  #[test]
  fn relation_columns() {
    let id = Uuid::new_v4();
    let (local, url) = encode_relation(&Relation::Local(id));
    assert_eq!(url, "");
    let back = decode_relation("zaak", local.as_deref(), &url).unwrap();
    assert_eq!(back, Relation::Local(id));

    let err = decode_relation("zaak", None, "").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }
}
