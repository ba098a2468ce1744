//! [`CatalogiStore`] for [`SqliteStore`].

use rusqlite::{Connection, params};
use uuid::Uuid;
use zgw_core::{
  catalogi::{
    BesluitType, Catalogus, Eigenschap, InformatieObjectType, NewBesluitType,
    NewCatalogus, NewEigenschap, NewInformatieObjectType, NewResultaatType,
    NewStatusType, NewZaakType, ResultaatType, StatusType, ZaakType,
  },
  selectielijst::Selectielijstklasse,
  store::CatalogiStore,
  validation::catalogi::{
    self as rules, BesluitTypeContext, EigenschapContext,
    InformatieObjectTypeContext, ResultaatTypeContext, StatusTypeContext,
    ZaakTypeContext,
  },
};

use crate::{
  Result,
  encode::{
    BESLUITTYPE_COLUMNS, CATALOGUS_COLUMNS, EIGENSCHAP_COLUMNS,
    INFORMATIEOBJECTTYPE_COLUMNS, RESULTAATTYPE_COLUMNS, RawBesluitType,
    RawCatalogus, RawEigenschap, RawInformatieObjectType, RawResultaatType,
    RawStatusType, RawZaakType, STATUSTYPE_COLUMNS, ZAAKTYPE_COLUMNS,
    encode_choice, encode_date, encode_uuid, encode_uuids,
  },
  store::{SqliteStore, not_found, query_all, query_one},
};

// ─── Loaders ─────────────────────────────────────────────────────────────────

pub(crate) fn load_catalogus(conn: &Connection, id: Uuid) -> Result<Option<Catalogus>> {
  query_one(
    conn,
    &format!("SELECT {CATALOGUS_COLUMNS} FROM catalogussen WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawCatalogus::from_row,
    RawCatalogus::into_catalogus,
  )
}

pub(crate) fn load_zaaktype(conn: &Connection, id: Uuid) -> Result<Option<ZaakType>> {
  query_one(
    conn,
    &format!("SELECT {ZAAKTYPE_COLUMNS} FROM zaaktypen WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawZaakType::from_row,
    RawZaakType::into_zaaktype,
  )
}

pub(crate) fn load_besluittype(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<BesluitType>> {
  query_one(
    conn,
    &format!("SELECT {BESLUITTYPE_COLUMNS} FROM besluittypen WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawBesluitType::from_row,
    RawBesluitType::into_besluittype,
  )
}

pub(crate) fn load_informatieobjecttype(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<InformatieObjectType>> {
  query_one(
    conn,
    &format!(
      "SELECT {INFORMATIEOBJECTTYPE_COLUMNS} FROM informatieobjecttypen \
       WHERE uuid = ?1"
    ),
    params![encode_uuid(id)],
    RawInformatieObjectType::from_row,
    RawInformatieObjectType::into_informatieobjecttype,
  )
}

pub(crate) fn load_statustype(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<StatusType>> {
  query_one(
    conn,
    &format!("SELECT {STATUSTYPE_COLUMNS} FROM statustypen WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawStatusType::from_row,
    RawStatusType::into_statustype,
  )
}

pub(crate) fn load_statustypen(
  conn: &Connection,
  zaaktype: Option<Uuid>,
) -> Result<Vec<StatusType>> {
  match zaaktype {
    Some(zaaktype) => query_all(
      conn,
      &format!(
        "SELECT {STATUSTYPE_COLUMNS} FROM statustypen WHERE zaaktype = ?1 \
         ORDER BY volgnummer"
      ),
      params![encode_uuid(zaaktype)],
      RawStatusType::from_row,
      RawStatusType::into_statustype,
    ),
    None => query_all(
      conn,
      &format!(
        "SELECT {STATUSTYPE_COLUMNS} FROM statustypen \
         ORDER BY zaaktype, volgnummer"
      ),
      [],
      RawStatusType::from_row,
      RawStatusType::into_statustype,
    ),
  }
}

pub(crate) fn load_resultaattype(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<ResultaatType>> {
  query_one(
    conn,
    &format!("SELECT {RESULTAATTYPE_COLUMNS} FROM resultaattypen WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawResultaatType::from_row,
    RawResultaatType::into_resultaattype,
  )
}

pub(crate) fn load_eigenschap(
  conn: &Connection,
  id: Uuid,
) -> Result<Option<Eigenschap>> {
  query_one(
    conn,
    &format!("SELECT {EIGENSCHAP_COLUMNS} FROM eigenschappen WHERE uuid = ?1"),
    params![encode_uuid(id)],
    RawEigenschap::from_row,
    RawEigenschap::into_eigenschap,
  )
}

/// Load every id that exists; missing ones are left out for the validator
/// to report.
fn load_each<T>(
  conn: &Connection,
  ids: &[Uuid],
  load: fn(&Connection, Uuid) -> Result<Option<T>>,
) -> Result<Vec<T>> {
  let mut found = Vec::with_capacity(ids.len());
  for id in ids {
    found.extend(load(conn, *id)?);
  }
  Ok(found)
}

// ─── Contexts ────────────────────────────────────────────────────────────────

fn zaaktype_context(conn: &Connection, candidate: &ZaakType) -> Result<ZaakTypeContext> {
  Ok(ZaakTypeContext {
    catalogus:             load_catalogus(conn, candidate.catalogus)?,
    same_scope:            query_all(
      conn,
      &format!(
        "SELECT {ZAAKTYPE_COLUMNS} FROM zaaktypen \
         WHERE catalogus = ?1 AND omschrijving = ?2"
      ),
      params![encode_uuid(candidate.catalogus), candidate.omschrijving],
      RawZaakType::from_row,
      RawZaakType::into_zaaktype,
    )?,
    besluittypen:          load_each(conn, &candidate.besluittypen, load_besluittype)?,
    informatieobjecttypen: load_each(
      conn,
      &candidate.informatieobjecttypen,
      load_informatieobjecttype,
    )?,
    deelzaaktypen:         load_each(conn, &candidate.deelzaaktypen, load_zaaktype)?,
  })
}

fn besluittype_context(
  conn: &Connection,
  candidate: &BesluitType,
) -> Result<BesluitTypeContext> {
  Ok(BesluitTypeContext {
    catalogus:             load_catalogus(conn, candidate.catalogus)?,
    same_scope:            query_all(
      conn,
      &format!(
        "SELECT {BESLUITTYPE_COLUMNS} FROM besluittypen \
         WHERE catalogus = ?1 AND omschrijving = ?2"
      ),
      params![encode_uuid(candidate.catalogus), candidate.omschrijving],
      RawBesluitType::from_row,
      RawBesluitType::into_besluittype,
    )?,
    informatieobjecttypen: load_each(
      conn,
      &candidate.informatieobjecttypen,
      load_informatieobjecttype,
    )?,
  })
}

fn informatieobjecttype_context(
  conn: &Connection,
  candidate: &InformatieObjectType,
) -> Result<InformatieObjectTypeContext> {
  Ok(InformatieObjectTypeContext {
    catalogus:  load_catalogus(conn, candidate.catalogus)?,
    same_scope: query_all(
      conn,
      &format!(
        "SELECT {INFORMATIEOBJECTTYPE_COLUMNS} FROM informatieobjecttypen \
         WHERE catalogus = ?1 AND omschrijving = ?2"
      ),
      params![encode_uuid(candidate.catalogus), candidate.omschrijving],
      RawInformatieObjectType::from_row,
      RawInformatieObjectType::into_informatieobjecttype,
    )?,
  })
}

// ─── Writes ──────────────────────────────────────────────────────────────────

fn upsert_zaaktype(conn: &Connection, z: &ZaakType) -> Result<()> {
  conn.execute(
    "INSERT INTO zaaktypen (uuid, catalogus, identificatie, omschrijving, \
     vertrouwelijkheidaanduiding, selectielijst_procestype, begin_geldigheid, \
     einde_geldigheid, besluittypen, informatieobjecttypen, deelzaaktypen) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
     ON CONFLICT (uuid) DO UPDATE SET \
       catalogus = excluded.catalogus, \
       identificatie = excluded.identificatie, \
       omschrijving = excluded.omschrijving, \
       vertrouwelijkheidaanduiding = excluded.vertrouwelijkheidaanduiding, \
       selectielijst_procestype = excluded.selectielijst_procestype, \
       begin_geldigheid = excluded.begin_geldigheid, \
       einde_geldigheid = excluded.einde_geldigheid, \
       besluittypen = excluded.besluittypen, \
       informatieobjecttypen = excluded.informatieobjecttypen, \
       deelzaaktypen = excluded.deelzaaktypen",
    params![
      encode_uuid(z.uuid),
      encode_uuid(z.catalogus),
      z.identificatie,
      z.omschrijving,
      encode_choice(&z.vertrouwelijkheidaanduiding),
      z.selectielijst_procestype,
      encode_date(z.geldigheid.begin),
      z.geldigheid.einde.map(encode_date),
      encode_uuids(&z.besluittypen)?,
      encode_uuids(&z.informatieobjecttypen)?,
      encode_uuids(&z.deelzaaktypen)?,
    ],
  )?;
  Ok(())
}

// ─── CatalogiStore impl ──────────────────────────────────────────────────────

impl CatalogiStore for SqliteStore {
  async fn create_catalogus(&self, input: NewCatalogus) -> Result<Catalogus> {
    rules::catalogus().run(&input, &())?;

    let catalogus = Catalogus {
      uuid:                       Uuid::new_v4(),
      domein:                     input.domein,
      rsin:                       input.rsin,
      contactpersoon_beheer_naam: input.contactpersoon_beheer_naam,
    };

    let row = catalogus.clone();
    self
      .write(move |tx| {
        tx.execute(
          "INSERT INTO catalogussen (uuid, domein, rsin, contactpersoon_beheer_naam) \
           VALUES (?1, ?2, ?3, ?4)",
          params![
            encode_uuid(row.uuid),
            row.domein,
            row.rsin,
            row.contactpersoon_beheer_naam
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(catalogus)
  }

  async fn get_catalogus(&self, id: Uuid) -> Result<Option<Catalogus>> {
    self.read(move |conn| load_catalogus(conn, id)).await
  }

  // ── ZaakType ──────────────────────────────────────────────────────────────

  async fn create_zaaktype(&self, input: NewZaakType) -> Result<ZaakType> {
    let zaaktype = input.into_zaaktype(Uuid::new_v4());

    self
      .write(move |tx| {
        let context = zaaktype_context(tx, &zaaktype)?;
        rules::zaaktype().run(&zaaktype, &context)?;
        upsert_zaaktype(tx, &zaaktype)?;
        Ok(zaaktype)
      })
      .await
  }

  async fn update_zaaktype(&self, id: Uuid, input: NewZaakType) -> Result<ZaakType> {
    let zaaktype = input.into_zaaktype(id);

    self
      .write(move |tx| {
        if load_zaaktype(tx, id)?.is_none() {
          return Err(not_found("zaaktype", id));
        }
        let context = zaaktype_context(tx, &zaaktype)?;
        rules::zaaktype().run(&zaaktype, &context)?;
        upsert_zaaktype(tx, &zaaktype)?;
        Ok(zaaktype)
      })
      .await
  }

  async fn get_zaaktype(&self, id: Uuid) -> Result<Option<ZaakType>> {
    self.read(move |conn| load_zaaktype(conn, id)).await
  }

  // ── BesluitType ───────────────────────────────────────────────────────────

  async fn create_besluittype(&self, input: NewBesluitType) -> Result<BesluitType> {
    let besluittype = BesluitType {
      uuid:                  Uuid::new_v4(),
      catalogus:             input.catalogus,
      omschrijving:          input.omschrijving,
      geldigheid:            input.geldigheid,
      informatieobjecttypen: input.informatieobjecttypen,
    };

    self
      .write(move |tx| {
        let context = besluittype_context(tx, &besluittype)?;
        rules::besluittype().run(&besluittype, &context)?;

        let b = &besluittype;
        tx.execute(
          "INSERT INTO besluittypen (uuid, catalogus, omschrijving, \
           begin_geldigheid, einde_geldigheid, informatieobjecttypen) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            encode_uuid(b.uuid),
            encode_uuid(b.catalogus),
            b.omschrijving,
            encode_date(b.geldigheid.begin),
            b.geldigheid.einde.map(encode_date),
            encode_uuids(&b.informatieobjecttypen)?,
          ],
        )?;
        Ok(besluittype)
      })
      .await
  }

  async fn get_besluittype(&self, id: Uuid) -> Result<Option<BesluitType>> {
    self.read(move |conn| load_besluittype(conn, id)).await
  }

  // ── InformatieObjectType ──────────────────────────────────────────────────

  async fn create_informatieobjecttype(
    &self,
    input: NewInformatieObjectType,
  ) -> Result<InformatieObjectType> {
    let iot = InformatieObjectType {
      uuid:                        Uuid::new_v4(),
      catalogus:                   input.catalogus,
      omschrijving:                input.omschrijving,
      vertrouwelijkheidaanduiding: input.vertrouwelijkheidaanduiding,
      geldigheid:                  input.geldigheid,
    };

    self
      .write(move |tx| {
        let context = informatieobjecttype_context(tx, &iot)?;
        rules::informatieobjecttype().run(&iot, &context)?;

        tx.execute(
          "INSERT INTO informatieobjecttypen (uuid, catalogus, omschrijving, \
           vertrouwelijkheidaanduiding, begin_geldigheid, einde_geldigheid) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            encode_uuid(iot.uuid),
            encode_uuid(iot.catalogus),
            iot.omschrijving,
            encode_choice(&iot.vertrouwelijkheidaanduiding),
            encode_date(iot.geldigheid.begin),
            iot.geldigheid.einde.map(encode_date),
          ],
        )?;
        Ok(iot)
      })
      .await
  }

  async fn get_informatieobjecttype(
    &self,
    id: Uuid,
  ) -> Result<Option<InformatieObjectType>> {
    self.read(move |conn| load_informatieobjecttype(conn, id)).await
  }

  // ── StatusType ────────────────────────────────────────────────────────────

  async fn create_statustype(&self, input: NewStatusType) -> Result<StatusType> {
    let statustype = StatusType {
      uuid:         Uuid::new_v4(),
      zaaktype:     input.zaaktype,
      omschrijving: input.omschrijving,
      volgnummer:   input.volgnummer,
    };

    self
      .write(move |tx| {
        let context = StatusTypeContext {
          zaaktype: load_zaaktype(tx, statustype.zaaktype)?,
          siblings: load_statustypen(tx, Some(statustype.zaaktype))?,
        };
        rules::statustype().run(&statustype, &context)?;

        tx.execute(
          "INSERT INTO statustypen (uuid, zaaktype, omschrijving, volgnummer) \
           VALUES (?1, ?2, ?3, ?4)",
          params![
            encode_uuid(statustype.uuid),
            encode_uuid(statustype.zaaktype),
            statustype.omschrijving,
            statustype.volgnummer,
          ],
        )?;
        Ok(statustype)
      })
      .await
  }

  async fn get_statustype(&self, id: Uuid) -> Result<Option<StatusType>> {
    self.read(move |conn| load_statustype(conn, id)).await
  }

  async fn list_statustypen(&self, zaaktype: Option<Uuid>) -> Result<Vec<StatusType>> {
    self.read(move |conn| load_statustypen(conn, zaaktype)).await
  }

  // ── ResultaatType ─────────────────────────────────────────────────────────

  async fn create_resultaattype(
    &self,
    input: NewResultaatType,
    selectielijstklasse: Option<Selectielijstklasse>,
  ) -> Result<ResultaatType> {
    let resultaattype = ResultaatType {
      uuid:                       Uuid::new_v4(),
      zaaktype:                   input.zaaktype,
      omschrijving:               input.omschrijving,
      selectielijstklasse:        input.selectielijstklasse,
      archiefnominatie:           input.archiefnominatie,
      archiefactietermijn:        input.archiefactietermijn,
      brondatum_archiefprocedure: input.brondatum_archiefprocedure,
    };

    self
      .write(move |tx| {
        let context = ResultaatTypeContext {
          zaaktype: load_zaaktype(tx, resultaattype.zaaktype)?,
          selectielijstklasse,
        };
        rules::resultaattype().run(&resultaattype, &context)?;

        let r = &resultaattype;
        tx.execute(
          "INSERT INTO resultaattypen (uuid, zaaktype, omschrijving, \
           selectielijstklasse, archiefnominatie, archiefactietermijn, \
           brondatum_archiefprocedure) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            encode_uuid(r.uuid),
            encode_uuid(r.zaaktype),
            r.omschrijving,
            r.selectielijstklasse,
            encode_choice(&r.archiefnominatie),
            r.archiefactietermijn.map(|t| t.to_string()),
            serde_json::to_string(&r.brondatum_archiefprocedure)?,
          ],
        )?;
        Ok(resultaattype)
      })
      .await
  }

  async fn get_resultaattype(&self, id: Uuid) -> Result<Option<ResultaatType>> {
    self.read(move |conn| load_resultaattype(conn, id)).await
  }

  // ── Eigenschap ────────────────────────────────────────────────────────────

  async fn create_eigenschap(&self, input: NewEigenschap) -> Result<Eigenschap> {
    let eigenschap = Eigenschap {
      uuid:     Uuid::new_v4(),
      zaaktype: input.zaaktype,
      naam:     input.naam,
      formaat:  input.formaat,
    };

    self
      .write(move |tx| {
        let context = EigenschapContext {
          zaaktype: load_zaaktype(tx, eigenschap.zaaktype)?,
          siblings: query_all(
            tx,
            &format!("SELECT {EIGENSCHAP_COLUMNS} FROM eigenschappen WHERE zaaktype = ?1"),
            params![encode_uuid(eigenschap.zaaktype)],
            RawEigenschap::from_row,
            RawEigenschap::into_eigenschap,
          )?,
        };
        rules::eigenschap().run(&eigenschap, &context)?;

        tx.execute(
          "INSERT INTO eigenschappen (uuid, zaaktype, naam, formaat) \
           VALUES (?1, ?2, ?3, ?4)",
          params![
            encode_uuid(eigenschap.uuid),
            encode_uuid(eigenschap.zaaktype),
            eigenschap.naam,
            encode_choice(&eigenschap.formaat),
          ],
        )?;
        Ok(eigenschap)
      })
      .await
  }

  async fn get_eigenschap(&self, id: Uuid) -> Result<Option<Eigenschap>> {
    self.read(move |conn| load_eigenschap(conn, id)).await
  }
}
