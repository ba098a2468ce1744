//! [`ZakenStore`] for [`SqliteStore`].
//!
//! Status posting is the heart of this module: the status insert, the
//! lifecycle transition and the zaak update share one transaction.

use chrono::{Datelike as _, NaiveDate};
use rusqlite::{Connection, params};
use uuid::Uuid;
use zgw_core::{
  archief::Brongegevens,
  catalogi::ResultaatType,
  documenten::{InformatieObject, NewInformatieObject},
  lifecycle::{self, ArchiefInput, ClosureResult},
  store::ZakenStore,
  validation::{
    besluiten::{self as document_rules, InformatieObjectContext},
    require,
    zaken::{self as rules, ResultaatContext, ZaakContext, ZaakEigenschapContext},
  },
  zaken::{
    NewResultaat, NewStatus, NewZaak, NewZaakEigenschap, Resultaat, Status,
    Zaak, ZaakEigenschap, ZaakPatch,
  },
};

use crate::{
  Result,
  catalogi::{
    load_eigenschap, load_informatieobjecttype, load_resultaattype,
    load_statustype, load_statustypen, load_zaaktype,
  },
  encode::{
    INFORMATIEOBJECT_COLUMNS, RESULTAAT_COLUMNS, RESULTAATTYPE_COLUMNS,
    RawInformatieObject, RawResultaat, RawResultaatType, RawStatus, RawZaak,
    RawZaakEigenschap, STATUS_COLUMNS, ZAAK_COLUMNS, ZAAKEIGENSCHAP_COLUMNS,
    decode_date, decode_opt_date, encode_choice, encode_date, encode_dt, encode_uuid,
    encode_uuids,
  },
  store::{
    SqliteStore, exists, generate_identificatie, not_found, query_all,
    query_one,
  },
};

// ─── Loaders ─────────────────────────────────────────────────────────────────

pub(crate) fn load_zaak(conn: &Connection, id: Uuid) -> Result<Option<Zaak>> {
  query_one(
    conn,
    &format!("SELECT {ZAAK_COLUMNS} FROM zaken WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawZaak::from_row,
    RawZaak::into_zaak,
  )
}

pub(crate) fn load_informatieobject(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<InformatieObject>> {
  query_one(
    conn,
    &format!(
      "SELECT {INFORMATIEOBJECT_COLUMNS} FROM informatieobjecten WHERE uuid = ?1"
    ),
    params![encode_uuid(id)],
    RawInformatieObject::from_row,
    RawInformatieObject::into_informatieobject,
  )
}

fn load_resultaat_of(conn: &Connection, zaak: Uuid) -> Result<Option<Resultaat>> {
  query_one(
    conn,
    &format!("SELECT {RESULTAAT_COLUMNS} FROM resultaten WHERE zaak = ?1"),
    params![encode_uuid(zaak)],
    RawResultaat::from_row,
    RawResultaat::into_resultaat,
  )
}

fn load_resultaattype_of(
  conn: &Connection,
  zaak: Uuid,
) -> Result<Option<ResultaatType>> {
  query_one(
    conn,
    &format!(
      "SELECT {RESULTAATTYPE_COLUMNS} FROM resultaattypen WHERE uuid = \
       (SELECT resultaattype FROM resultaten WHERE zaak = ?1)"
    ),
    params![encode_uuid(zaak)],
    RawResultaatType::from_row,
    RawResultaatType::into_resultaattype,
  )
}

fn einddatum_of(conn: &Connection, zaak: Uuid) -> Result<Option<NaiveDate>> {
  let raw: Option<Option<String>> = query_one(
    conn,
    "SELECT einddatum FROM zaken WHERE uuid = ?1",
    params![encode_uuid(zaak)],
    |row| row.get(0),
    Ok,
  )?;
  decode_opt_date(raw.flatten().as_deref())
}

// ─── Contexts ────────────────────────────────────────────────────────────────

fn zaak_context(
  conn: &Connection,
  candidate: &Zaak,
  existing: Option<Zaak>,
) -> Result<ZaakContext> {
  let hoofdzaak = candidate
    .hoofdzaak
    .map(|id| load_zaak(conn, id))
    .transpose()?
    .flatten();

  // Walk up from the proposed hoofdzaak; stop on a repeat so corrupt data
  // cannot loop forever.
  let mut hoofdzaak_ancestors = Vec::new();
  let mut next = candidate.hoofdzaak;
  while let Some(id) = next {
    if hoofdzaak_ancestors.contains(&id) {
      break;
    }
    hoofdzaak_ancestors.push(id);
    next = load_zaak(conn, id)?.and_then(|z| z.hoofdzaak);
  }

  let mut relevante_andere_zaken = Vec::new();
  for id in &candidate.relevante_andere_zaken {
    relevante_andere_zaken.extend(load_zaak(conn, *id)?);
  }

  let identificatie_taken = exists(
    conn,
    "SELECT 1 FROM zaken \
     WHERE identificatie = ?1 AND bronorganisatie = ?2 AND uuid != ?3",
    params![
      candidate.identificatie,
      candidate.bronorganisatie,
      encode_uuid(candidate.uuid)
    ],
  )?;

  Ok(ZaakContext {
    existing,
    zaaktype: load_zaaktype(conn, candidate.zaaktype)?,
    hoofdzaak,
    hoofdzaak_ancestors,
    relevante_andere_zaken,
    identificatie_taken,
  })
}

/// The data archive derivation may need from the zaak's neighbourhood.
fn brongegevens(
  conn: &Connection,
  zaak: &Zaak,
  extern_datum: Option<NaiveDate>,
) -> Result<Brongegevens> {
  let besluit_data: Vec<(String, Option<String>)> = query_all(
    conn,
    "SELECT ingangsdatum, vervaldatum FROM besluiten WHERE zaak = ?1",
    params![encode_uuid(zaak.uuid)],
    |row| Ok((row.get(0)?, row.get(1)?)),
    Ok,
  )?;
  let mut besluit_ingangsdata = Vec::with_capacity(besluit_data.len());
  let mut besluit_vervaldata = Vec::new();
  for (ingang, verval) in besluit_data {
    besluit_ingangsdata.push(decode_date(&ingang)?);
    besluit_vervaldata.extend(decode_opt_date(verval.as_deref())?);
  }

  let eigenschappen = query_all(
    conn,
    &format!("SELECT {ZAAKEIGENSCHAP_COLUMNS} FROM zaakeigenschappen WHERE zaak = ?1"),
    params![encode_uuid(zaak.uuid)],
    RawZaakEigenschap::from_row,
    RawZaakEigenschap::into_zaakeigenschap,
  )?;

  let gerelateerde_einddata = zaak
    .relevante_andere_zaken
    .iter()
    .map(|id| einddatum_of(conn, *id))
    .collect::<Result<Vec<_>>>()?;

  let hoofdzaak_einddatum = match zaak.hoofdzaak {
    Some(id) => einddatum_of(conn, id)?,
    None => None,
  };

  Ok(Brongegevens {
    besluit_ingangsdata,
    besluit_vervaldata,
    eigenschappen,
    gerelateerde_einddata,
    hoofdzaak_einddatum,
    extern_datum,
  })
}

// ─── Writes ──────────────────────────────────────────────────────────────────

fn insert_zaak(conn: &Connection, z: &Zaak) -> Result<()> {
  conn.execute(
    "INSERT INTO zaken (uuid, identificatie, bronorganisatie, zaaktype, \
     startdatum, einddatum, archiefnominatie, archiefactiedatum, \
     archiefactiedatum_handmatig, hoofdzaak, relevante_andere_zaken) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    params![
      encode_uuid(z.uuid),
      z.identificatie,
      z.bronorganisatie,
      encode_uuid(z.zaaktype),
      encode_date(z.startdatum),
      z.einddatum.map(encode_date),
      z.archiefnominatie.as_ref().map(encode_choice),
      z.archiefactiedatum.map(encode_date),
      z.archiefactiedatum_handmatig,
      z.hoofdzaak.map(encode_uuid),
      encode_uuids(&z.relevante_andere_zaken)?,
    ],
  )?;
  Ok(())
}

fn update_zaak_row(conn: &Connection, z: &Zaak) -> Result<()> {
  conn.execute(
    "UPDATE zaken SET identificatie = ?2, bronorganisatie = ?3, \
     zaaktype = ?4, startdatum = ?5, einddatum = ?6, archiefnominatie = ?7, \
     archiefactiedatum = ?8, archiefactiedatum_handmatig = ?9, \
     hoofdzaak = ?10, relevante_andere_zaken = ?11 WHERE uuid = ?1",
    params![
      encode_uuid(z.uuid),
      z.identificatie,
      z.bronorganisatie,
      encode_uuid(z.zaaktype),
      encode_date(z.startdatum),
      z.einddatum.map(encode_date),
      z.archiefnominatie.as_ref().map(encode_choice),
      z.archiefactiedatum.map(encode_date),
      z.archiefactiedatum_handmatig,
      z.hoofdzaak.map(encode_uuid),
      encode_uuids(&z.relevante_andere_zaken)?,
    ],
  )?;
  Ok(())
}

// ─── ZakenStore impl ─────────────────────────────────────────────────────────

impl ZakenStore for SqliteStore {
  // ── Zaak ──────────────────────────────────────────────────────────────────

  async fn create_zaak(&self, input: NewZaak) -> Result<Zaak> {
    self
      .write(move |tx| {
        let identificatie = match input.identificatie.clone() {
          Some(identificatie) => identificatie,
          None => generate_identificatie(
            tx,
            "zaken",
            "ZAAK",
            input.startdatum.year(),
          )?,
        };
        let zaak = input.into_zaak(Uuid::new_v4(), identificatie);

        let context = zaak_context(tx, &zaak, None)?;
        rules::zaak().run(&zaak, &context)?;
        insert_zaak(tx, &zaak)?;
        Ok(zaak)
      })
      .await
  }

  async fn get_zaak(&self, id: Uuid) -> Result<Option<Zaak>> {
    self.read(move |conn| load_zaak(conn, id)).await
  }

  async fn update_zaak(&self, id: Uuid, patch: ZaakPatch) -> Result<Zaak> {
    self
      .write(move |tx| {
        let existing = load_zaak(tx, id)?.ok_or_else(|| not_found("zaak", id))?;
        let zaak = patch.apply_to(&existing);

        let context = zaak_context(tx, &zaak, Some(existing))?;
        rules::zaak().run(&zaak, &context)?;
        update_zaak_row(tx, &zaak)?;
        Ok(zaak)
      })
      .await
  }

  async fn reopen_zaak(&self, id: Uuid) -> Result<Zaak> {
    self
      .write(move |tx| {
        let mut zaak = load_zaak(tx, id)?.ok_or_else(|| not_found("zaak", id))?;
        zaak.apply_closure(&lifecycle::reopen(&zaak));
        update_zaak_row(tx, &zaak)?;
        tracing::debug!(zaak = %zaak.uuid, "zaak reopened");
        Ok(zaak)
      })
      .await
  }

  // ── Status ────────────────────────────────────────────────────────────────

  async fn create_status(
    &self,
    input: NewStatus,
    extern_datum: Option<NaiveDate>,
  ) -> Result<(Status, ClosureResult)> {
    self
      .write(move |tx| {
        let zaak = load_zaak(tx, input.zaak)?;
        let mut zaak = require(zaak.as_ref(), "zaak")?.clone();
        let statustype = load_statustype(tx, input.statustype)?;
        let statustype = require(statustype.as_ref(), "statustype")?;
        let statustypen = load_statustypen(tx, Some(zaak.zaaktype))?;

        let resultaattype = load_resultaattype_of(tx, zaak.uuid)?;
        let bron = match &resultaattype {
          Some(_) => brongegevens(tx, &zaak, extern_datum)?,
          None => Brongegevens::default(),
        };
        let archief = resultaattype.as_ref().map(|resultaattype| ArchiefInput {
          resultaattype,
          brongegevens: &bron,
        });

        let closure = lifecycle::on_status_posted(
          &zaak,
          statustype,
          &statustypen,
          input.datum_status_gezet,
          archief,
        )?;

        let status = Status {
          uuid:               Uuid::new_v4(),
          zaak:               zaak.uuid,
          statustype:         statustype.uuid,
          datum_status_gezet: input.datum_status_gezet,
          statustoelichting:  input.statustoelichting,
        };
        tx.execute(
          "INSERT INTO statussen (uuid, zaak, statustype, datum_status_gezet, \
           statustoelichting) VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            encode_uuid(status.uuid),
            encode_uuid(status.zaak),
            encode_uuid(status.statustype),
            encode_dt(status.datum_status_gezet),
            status.statustoelichting,
          ],
        )?;

        zaak.apply_closure(&closure);
        update_zaak_row(tx, &zaak)?;
        Ok((status, closure))
      })
      .await
  }

  async fn get_status(&self, id: Uuid) -> Result<Option<Status>> {
    self
      .read(move |conn| {
        query_one(
          conn,
          &format!("SELECT {STATUS_COLUMNS} FROM statussen WHERE uuid = ?1"),
          params![encode_uuid(id)],
          RawStatus::from_row,
          RawStatus::into_status,
        )
      })
      .await
  }

  // ── Resultaat ─────────────────────────────────────────────────────────────

  async fn create_resultaat(&self, input: NewResultaat) -> Result<Resultaat> {
    self
      .write(move |tx| {
        let context = ResultaatContext {
          zaak:               load_zaak(tx, input.zaak)?,
          resultaattype:      load_resultaattype(tx, input.resultaattype)?,
          zaak_has_resultaat: load_resultaat_of(tx, input.zaak)?.is_some(),
        };
        rules::resultaat().run(&input, &context)?;

        let resultaat = Resultaat {
          uuid:          Uuid::new_v4(),
          zaak:          input.zaak,
          resultaattype: input.resultaattype,
          toelichting:   input.toelichting,
        };
        tx.execute(
          "INSERT INTO resultaten (uuid, zaak, resultaattype, toelichting) \
           VALUES (?1, ?2, ?3, ?4)",
          params![
            encode_uuid(resultaat.uuid),
            encode_uuid(resultaat.zaak),
            encode_uuid(resultaat.resultaattype),
            resultaat.toelichting,
          ],
        )?;
        Ok(resultaat)
      })
      .await
  }

  async fn get_resultaat(&self, id: Uuid) -> Result<Option<Resultaat>> {
    self
      .read(move |conn| {
        query_one(
          conn,
          &format!("SELECT {RESULTAAT_COLUMNS} FROM resultaten WHERE uuid = ?1"),
          params![encode_uuid(id)],
          RawResultaat::from_row,
          RawResultaat::into_resultaat,
        )
      })
      .await
  }

  async fn get_resultaattype_for_zaak(&self, zaak: Uuid) -> Result<Option<ResultaatType>> {
    self.read(move |conn| load_resultaattype_of(conn, zaak)).await
  }

  // ── ZaakEigenschap ────────────────────────────────────────────────────────

  async fn create_zaakeigenschap(
    &self,
    input: NewZaakEigenschap,
  ) -> Result<ZaakEigenschap> {
    self
      .write(move |tx| {
        let context = ZaakEigenschapContext {
          zaak:       load_zaak(tx, input.zaak)?,
          eigenschap: load_eigenschap(tx, input.eigenschap)?,
        };
        rules::zaakeigenschap().run(&input, &context)?;
        let eigenschap = require(context.eigenschap.as_ref(), "eigenschap")?;

        let zaakeigenschap = ZaakEigenschap {
          uuid:       Uuid::new_v4(),
          zaak:       input.zaak,
          eigenschap: input.eigenschap,
          naam:       eigenschap.naam.clone(),
          waarde:     input.waarde,
        };
        tx.execute(
          "INSERT INTO zaakeigenschappen (uuid, zaak, eigenschap, naam, waarde) \
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![
            encode_uuid(zaakeigenschap.uuid),
            encode_uuid(zaakeigenschap.zaak),
            encode_uuid(zaakeigenschap.eigenschap),
            zaakeigenschap.naam,
            zaakeigenschap.waarde,
          ],
        )?;
        Ok(zaakeigenschap)
      })
      .await
  }

  // ── InformatieObject ──────────────────────────────────────────────────────

  async fn create_informatieobject(
    &self,
    input: NewInformatieObject,
  ) -> Result<InformatieObject> {
    self
      .write(move |tx| {
        let context = InformatieObjectContext {
          informatieobjecttype: load_informatieobjecttype(
            tx,
            input.informatieobjecttype,
          )?,
        };
        document_rules::informatieobject().run(&input, &context)?;

        let document = InformatieObject {
          uuid:                 Uuid::new_v4(),
          identificatie:        input.identificatie,
          titel:                input.titel,
          informatieobjecttype: input.informatieobjecttype,
        };
        tx.execute(
          "INSERT INTO informatieobjecten (uuid, identificatie, titel, \
           informatieobjecttype) VALUES (?1, ?2, ?3, ?4)",
          params![
            encode_uuid(document.uuid),
            document.identificatie,
            document.titel,
            encode_uuid(document.informatieobjecttype),
          ],
        )?;
        Ok(document)
      })
      .await
  }

  async fn get_informatieobject(&self, id: Uuid) -> Result<Option<InformatieObject>> {
    self.read(move |conn| load_informatieobject(conn, id)).await
  }
}
