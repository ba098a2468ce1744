//! [`BesluitenStore`] for [`SqliteStore`].

use chrono::Datelike as _;
use rusqlite::{Connection, params};
use uuid::Uuid;
use zgw_core::{
  besluiten::{
    Besluit, BesluitInformatieObject, NewBesluit, NewBesluitInformatieObject,
  },
  relation::Relation,
  store::BesluitenStore,
  validation::besluiten::{
    self as rules, BesluitContext, BesluitInformatieObjectContext,
  },
};

use crate::{
  Result,
  catalogi::{load_besluittype, load_zaaktype},
  encode::{
    BESLUIT_COLUMNS, BIO_COLUMNS, RawBesluit, RawBesluitInformatieObject,
    encode_choice, encode_date, encode_relation, encode_uuid,
  },
  store::{SqliteStore, exists, generate_identificatie, not_found, query_one},
  zaken::{load_informatieobject, load_zaak},
};

fn load_besluit(conn: &Connection, id: Uuid) -> Result<Option<Besluit>> {
  query_one(
    conn,
    &format!("SELECT {BESLUIT_COLUMNS} FROM besluiten WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawBesluit::from_row,
    RawBesluit::into_besluit,
  )
}

fn besluit_context(
  conn: &Connection,
  candidate: &Besluit,
  existing: Option<Besluit>,
) -> Result<BesluitContext> {
  let besluittype = match candidate.besluittype.local() {
    Some(id) => load_besluittype(conn, id)?,
    None => None,
  };
  let zaak = match candidate.zaak.as_ref().and_then(Relation::local) {
    Some(id) => load_zaak(conn, id)?,
    None => None,
  };
  let zaaktype = match &zaak {
    Some(zaak) => load_zaaktype(conn, zaak.zaaktype)?,
    None => None,
  };

  let identificatie_taken = exists(
    conn,
    "SELECT 1 FROM besluiten WHERE identificatie = ?1 \
     AND verantwoordelijke_organisatie = ?2 AND uuid != ?3",
    params![
      candidate.identificatie,
      candidate.verantwoordelijke_organisatie,
      encode_uuid(candidate.uuid)
    ],
  )?;

  Ok(BesluitContext {
    existing,
    besluittype,
    zaak,
    zaaktype,
    identificatie_taken,
  })
}

fn upsert_besluit(conn: &Connection, b: &Besluit) -> Result<()> {
  let (besluittype, besluittype_url) = encode_relation(&b.besluittype);
  let (zaak, zaak_url) = b
    .zaak
    .as_ref()
    .map(encode_relation)
    .unwrap_or_default();

  conn.execute(
    "INSERT INTO besluiten (uuid, identificatie, verantwoordelijke_organisatie, \
     besluittype, besluittype_url, zaak, zaak_url, datum, toelichting, \
     bestuursorgaan, ingangsdatum, vervaldatum, vervalreden, publicatiedatum, \
     verzenddatum, uiterlijke_reactiedatum) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16) \
     ON CONFLICT (uuid) DO UPDATE SET \
       besluittype = excluded.besluittype, \
       besluittype_url = excluded.besluittype_url, \
       zaak = excluded.zaak, \
       zaak_url = excluded.zaak_url, \
       datum = excluded.datum, \
       toelichting = excluded.toelichting, \
       bestuursorgaan = excluded.bestuursorgaan, \
       ingangsdatum = excluded.ingangsdatum, \
       vervaldatum = excluded.vervaldatum, \
       vervalreden = excluded.vervalreden, \
       publicatiedatum = excluded.publicatiedatum, \
       verzenddatum = excluded.verzenddatum, \
       uiterlijke_reactiedatum = excluded.uiterlijke_reactiedatum",
    params![
      encode_uuid(b.uuid),
      b.identificatie,
      b.verantwoordelijke_organisatie,
      besluittype,
      besluittype_url,
      zaak,
      zaak_url,
      encode_date(b.datum),
      b.toelichting,
      b.bestuursorgaan,
      encode_date(b.ingangsdatum),
      b.vervaldatum.map(encode_date),
      b.vervalreden.as_ref().map(encode_choice),
      b.publicatiedatum.map(encode_date),
      b.verzenddatum.map(encode_date),
      b.uiterlijke_reactiedatum.map(encode_date),
    ],
  )?;
  Ok(())
}

// ─── BesluitenStore impl ─────────────────────────────────────────────────────

impl BesluitenStore for SqliteStore {
  async fn create_besluit(&self, input: NewBesluit) -> Result<Besluit> {
    self
      .write(move |tx| {
        let identificatie = match input.identificatie.clone() {
          Some(identificatie) => identificatie,
          None => {
            generate_identificatie(tx, "besluiten", "BESLUIT", input.datum.year())?
          }
        };
        let besluit = input.into_besluit(Uuid::new_v4(), identificatie)?;

        let context = besluit_context(tx, &besluit, None)?;
        rules::besluit().run(&besluit, &context)?;
        upsert_besluit(tx, &besluit)?;
        Ok(besluit)
      })
      .await
  }

  async fn update_besluit(&self, id: Uuid, input: NewBesluit) -> Result<Besluit> {
    self
      .write(move |tx| {
        let existing =
          load_besluit(tx, id)?.ok_or_else(|| not_found("besluit", id))?;
        let identificatie = input
          .identificatie
          .clone()
          .unwrap_or_else(|| existing.identificatie.clone());
        let besluit = input.into_besluit(id, identificatie)?;

        let context = besluit_context(tx, &besluit, Some(existing))?;
        rules::besluit().run(&besluit, &context)?;
        upsert_besluit(tx, &besluit)?;
        Ok(besluit)
      })
      .await
  }

  async fn get_besluit(&self, id: Uuid) -> Result<Option<Besluit>> {
    self.read(move |conn| load_besluit(conn, id)).await
  }

  // ── BesluitInformatieObject ───────────────────────────────────────────────

  async fn create_besluitinformatieobject(
    &self,
    input: NewBesluitInformatieObject,
  ) -> Result<BesluitInformatieObject> {
    self
      .write(move |tx| {
        let bio = input.into_bio(Uuid::new_v4())?;

        let besluit = load_besluit(tx, bio.besluit)?;
        let besluittype = match besluit.as_ref().and_then(|b| b.besluittype.local()) {
          Some(id) => load_besluittype(tx, id)?,
          None => None,
        };
        let (informatieobject, duplicate) = match &bio.informatieobject {
          Relation::Local(id) => (
            load_informatieobject(tx, *id)?,
            exists(
              tx,
              "SELECT 1 FROM besluitinformatieobjecten \
               WHERE besluit = ?1 AND informatieobject = ?2",
              params![encode_uuid(bio.besluit), encode_uuid(*id)],
            )?,
          ),
          Relation::Remote(url) => (
            None,
            exists(
              tx,
              "SELECT 1 FROM besluitinformatieobjecten \
               WHERE besluit = ?1 AND informatieobject_url = ?2",
              params![encode_uuid(bio.besluit), url],
            )?,
          ),
        };

        let context = BesluitInformatieObjectContext {
          besluit,
          besluittype,
          informatieobject,
          duplicate,
        };
        rules::besluitinformatieobject().run(&bio, &context)?;

        let (local, url) = encode_relation(&bio.informatieobject);
        tx.execute(
          "INSERT INTO besluitinformatieobjecten (uuid, besluit, \
           informatieobject, informatieobject_url) VALUES (?1, ?2, ?3, ?4)",
          params![encode_uuid(bio.uuid), encode_uuid(bio.besluit), local, url],
        )?;
        Ok(bio)
      })
      .await
  }

  async fn get_besluitinformatieobject(
    &self,
    id: Uuid,
  ) -> Result<Option<BesluitInformatieObject>> {
    self
      .read(move |conn| {
        query_one(
          conn,
          &format!(
            "SELECT {BIO_COLUMNS} FROM besluitinformatieobjecten WHERE uuid = ?1"
          ),
          params![encode_uuid(id)],
          RawBesluitInformatieObject::from_row,
          RawBesluitInformatieObject::into_bio,
        )
      })
      .await
  }
}
