//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use zgw_core::{
  archief::UnresolvedSource,
  catalogi::{Afleidingswijze, BesluitType, Catalogus, InformatieObjectType, ZaakType},
  lifecycle::ZaakState,
  relation::Relation,
  selectielijst::{Procestermijn, Selectielijstklasse},
  store::{BesluitenStore, CatalogiStore, StoreError, ZakenStore},
  zaken::{Zaak, ZaakPatch},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn code(err: &Error) -> &'static str {
  err
    .validation_failure()
    .unwrap_or_else(|| panic!("expected a validation failure, got {err:?}"))
    .code()
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

async fn catalogus(s: &SqliteStore) -> Catalogus {
  s.create_catalogus(
    serde_json::from_value(json!({
      "domein": "ABR",
      "rsin": "517439943",
      "contactpersoon_beheer_naam": "Beheer",
    }))
    .unwrap(),
  )
  .await
  .unwrap()
}

async fn besluittype(
  s: &SqliteStore,
  catalogus: Uuid,
  omschrijving: &str,
  iots: &[Uuid],
) -> BesluitType {
  s.create_besluittype(
    serde_json::from_value(json!({
      "catalogus": catalogus,
      "omschrijving": omschrijving,
      "begin_geldigheid": "2018-01-01",
      "informatieobjecttypen": iots,
    }))
    .unwrap(),
  )
  .await
  .unwrap()
}

async fn informatieobjecttype(s: &SqliteStore, catalogus: Uuid) -> InformatieObjectType {
  s.create_informatieobjecttype(
    serde_json::from_value(json!({
      "catalogus": catalogus,
      "omschrijving": "Aanvraagformulier",
      "vertrouwelijkheidaanduiding": "openbaar",
      "begin_geldigheid": "2018-01-01",
    }))
    .unwrap(),
  )
  .await
  .unwrap()
}

async fn zaaktype(s: &SqliteStore, catalogus: Uuid, besluittypen: &[Uuid]) -> ZaakType {
  s.create_zaaktype(
    serde_json::from_value(json!({
      "catalogus": catalogus,
      "identificatie": "ZT-1",
      "omschrijving": "Aanvraag vergunning",
      "vertrouwelijkheidaanduiding": "openbaar",
      "selectielijst_procestype": "https://selectielijst.example.com/procestypen/1",
      "begin_geldigheid": "2018-01-01",
      "besluittypen": besluittypen,
    }))
    .unwrap(),
  )
  .await
  .unwrap()
}

/// A zaaktype with statustypen 1 ("ontvangen") and 2 ("afgehandeld") and a
/// resultaattype deriving its brondatum with `procedure`.
struct Setup {
  zaaktype:      ZaakType,
  besluittype:   BesluitType,
  eind:          Uuid,
  start:         Uuid,
  resultaattype: Uuid,
}

async fn setup(s: &SqliteStore, procedure: serde_json::Value) -> Setup {
  let cat = catalogus(s).await;
  let bt = besluittype(s, cat.uuid, "Vergunning", &[]).await;
  let zt = zaaktype(s, cat.uuid, &[bt.uuid]).await;

  let start = s
    .create_statustype(
      serde_json::from_value(json!({
        "zaaktype": zt.uuid, "omschrijving": "Ontvangen", "volgnummer": 1,
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  let eind = s
    .create_statustype(
      serde_json::from_value(json!({
        "zaaktype": zt.uuid, "omschrijving": "Afgehandeld", "volgnummer": 2,
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  let resultaattype = s
    .create_resultaattype(
      serde_json::from_value(json!({
        "zaaktype": zt.uuid,
        "omschrijving": "Verleend",
        "archiefnominatie": "vernietigen",
        "archiefactietermijn": "P10Y",
        "brondatum_archiefprocedure": procedure,
      }))
      .unwrap(),
      None,
    )
    .await
    .unwrap();

  Setup {
    zaaktype: zt,
    besluittype: bt,
    eind: eind.uuid,
    start: start.uuid,
    resultaattype: resultaattype.uuid,
  }
}

async fn zaak(s: &SqliteStore, zaaktype: Uuid) -> Zaak {
  s.create_zaak(
    serde_json::from_value(json!({
      "bronorganisatie": "517439943",
      "zaaktype": zaaktype,
      "startdatum": "2018-06-01",
    }))
    .unwrap(),
  )
  .await
  .unwrap()
}

async fn resultaat(s: &SqliteStore, zaak: Uuid, resultaattype: Uuid) {
  s.create_resultaat(
    serde_json::from_value(json!({ "zaak": zaak, "resultaattype": resultaattype }))
      .unwrap(),
  )
  .await
  .unwrap();
}

async fn post_status(
  s: &SqliteStore,
  zaak: Uuid,
  statustype: Uuid,
  gezet: &str,
) -> Result<zgw_core::lifecycle::ClosureResult, Error> {
  s.create_status(
    serde_json::from_value(json!({
      "zaak": zaak,
      "statustype": statustype,
      "datum_status_gezet": gezet,
    }))
    .unwrap(),
    None,
  )
  .await
  .map(|(_, closure)| closure)
}

// ─── Catalogi ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn overlapping_zaaktype_versions_are_rejected() {
  let s = store().await;
  let cat = catalogus(&s).await;
  zaaktype(&s, cat.uuid, &[]).await;

  let err = s
    .create_zaaktype(
      serde_json::from_value(json!({
        "catalogus": cat.uuid,
        "identificatie": "ZT-1",
        "omschrijving": "Aanvraag vergunning",
        "vertrouwelijkheidaanduiding": "openbaar",
        "begin_geldigheid": "2019-01-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "overlap");
}

#[tokio::test]
async fn closed_version_allows_a_successor() {
  let s = store().await;
  let cat = catalogus(&s).await;
  let mut first = zaaktype(&s, cat.uuid, &[]).await;

  first.geldigheid.einde = Some(d(2018, 12, 31));
  let input = serde_json::from_value(json!({
    "catalogus": cat.uuid,
    "identificatie": "ZT-1",
    "omschrijving": "Aanvraag vergunning",
    "vertrouwelijkheidaanduiding": "openbaar",
    "begin_geldigheid": "2018-01-01",
    "einde_geldigheid": "2018-12-31",
  }))
  .unwrap();
  let updated = s.update_zaaktype(first.uuid, input).await.unwrap();
  assert_eq!(updated.geldigheid, first.geldigheid);

  s.create_zaaktype(
    serde_json::from_value(json!({
      "catalogus": cat.uuid,
      "identificatie": "ZT-1",
      "omschrijving": "Aanvraag vergunning",
      "vertrouwelijkheidaanduiding": "openbaar",
      "begin_geldigheid": "2019-01-01",
    }))
    .unwrap(),
  )
  .await
  .unwrap();
}

#[tokio::test]
async fn besluittype_of_another_catalogus_is_rejected() {
  let s = store().await;
  let ours = catalogus(&s).await;
  let theirs = catalogus(&s).await;
  let foreign = besluittype(&s, theirs.uuid, "Vergunning", &[]).await;

  let err = s
    .create_zaaktype(
      serde_json::from_value(json!({
        "catalogus": ours.uuid,
        "identificatie": "ZT-2",
        "omschrijving": "Melding",
        "vertrouwelijkheidaanduiding": "openbaar",
        "begin_geldigheid": "2018-01-01",
        "besluittypen": [foreign.uuid],
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "relations-incorrect-catalogus");
}

#[tokio::test]
async fn update_of_missing_zaaktype_is_not_found() {
  let s = store().await;
  let cat = catalogus(&s).await;
  let err = s
    .update_zaaktype(
      Uuid::new_v4(),
      serde_json::from_value(json!({
        "catalogus": cat.uuid,
        "identificatie": "ZT-1",
        "omschrijving": "Aanvraag",
        "vertrouwelijkheidaanduiding": "openbaar",
        "begin_geldigheid": "2018-01-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn statustype_volgnummer_is_unique_per_zaaktype() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;

  let err = s
    .create_statustype(
      serde_json::from_value(json!({
        "zaaktype": setup.zaaktype.uuid, "omschrijving": "Dubbel", "volgnummer": 2,
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "unique");

  let listed = s.list_statustypen(Some(setup.zaaktype.uuid)).await.unwrap();
  let volgnummers: Vec<u16> = listed.iter().map(|st| st.volgnummer).collect();
  assert_eq!(volgnummers, [1, 2]);
}

#[tokio::test]
async fn resultaattype_checks_the_selectielijstklasse() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;

  let klasse = |proces_type: &str, procestermijn| Selectielijstklasse {
    url: "https://selectielijst.example.com/resultaten/1".into(),
    proces_type: proces_type.into(),
    procestermijn,
    nummer: Some(1),
    naam: None,
    bewaartermijn: None,
  };
  let input = || {
    serde_json::from_value(json!({
      "zaaktype": setup.zaaktype.uuid,
      "omschrijving": "Geweigerd",
      "selectielijstklasse": "https://selectielijst.example.com/resultaten/1",
      "archiefnominatie": "vernietigen",
      "archiefactietermijn": "P5Y",
      "brondatum_archiefprocedure": { "afleidingswijze": "afgehandeld" },
    }))
    .unwrap()
  };

  let err = s
    .create_resultaattype(
      input(),
      Some(klasse("https://selectielijst.example.com/procestypen/2", None)),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "procestype-mismatch");

  let err = s
    .create_resultaattype(
      input(),
      Some(klasse(
        "https://selectielijst.example.com/procestypen/1",
        Some(Procestermijn::IngeschatteBestaansduurProcesobject),
      )),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "invalid-afleidingswijze-for-procestermijn");

  let created = s
    .create_resultaattype(
      input(),
      Some(klasse(
        "https://selectielijst.example.com/procestypen/1",
        Some(Procestermijn::SamengevoegdMetBewaartermijn),
      )),
    )
    .await
    .unwrap();
  let fetched = s.get_resultaattype(created.uuid).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

// ─── Zaken ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn identificatie_is_generated_per_year() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;

  let first = zaak(&s, setup.zaaktype.uuid).await;
  let second = zaak(&s, setup.zaaktype.uuid).await;
  assert_eq!(first.identificatie, "ZAAK-2018-0000000001");
  assert_eq!(second.identificatie, "ZAAK-2018-0000000002");

  let err = s
    .create_zaak(
      serde_json::from_value(json!({
        "identificatie": "ZAAK-2018-0000000001",
        "bronorganisatie": "517439943",
        "zaaktype": setup.zaaktype.uuid,
        "startdatum": "2018-06-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "identificatie-niet-uniek");
}

async fn zaak_with_identificatie(s: &SqliteStore, zaaktype: Uuid, identificatie: &str) -> Zaak {
  s.create_zaak(
    serde_json::from_value(json!({
      "identificatie": identificatie,
      "bronorganisatie": "517439943",
      "zaaktype": zaaktype,
      "startdatum": "2018-06-01",
    }))
    .unwrap(),
  )
  .await
  .unwrap()
}

#[tokio::test]
async fn supplied_identificatie_of_another_shape_does_not_move_the_sequence() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  zaak_with_identificatie(&s, setup.zaaktype.uuid, "ZAAK-2018-A1").await;
  zaak_with_identificatie(&s, setup.zaaktype.uuid, "ZAAK-2018-18446744073709551615")
    .await;

  let first = zaak(&s, setup.zaaktype.uuid).await;
  let second = zaak(&s, setup.zaaktype.uuid).await;
  assert_eq!(first.identificatie, "ZAAK-2018-0000000001");
  assert_eq!(second.identificatie, "ZAAK-2018-0000000002");
}

#[tokio::test]
async fn exhausted_sequence_is_rejected_and_the_store_stays_usable() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let last = zaak_with_identificatie(&s, setup.zaaktype.uuid, "ZAAK-2018-9999999999").await;

  let err = s
    .create_zaak(
      serde_json::from_value(json!({
        "bronorganisatie": "517439943",
        "zaaktype": setup.zaaktype.uuid,
        "startdatum": "2018-06-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "identificatie-niet-uniek");

  let fetched = s.get_zaak(last.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.identificatie, "ZAAK-2018-9999999999");
  let next_year = s
    .create_zaak(
      serde_json::from_value(json!({
        "bronorganisatie": "517439943",
        "zaaktype": setup.zaaktype.uuid,
        "startdatum": "2019-01-02",
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(next_year.identificatie, "ZAAK-2019-0000000001");
}

#[tokio::test]
async fn zaak_identity_is_immutable() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let z = zaak(&s, setup.zaaktype.uuid).await;

  let patch = ZaakPatch {
    bronorganisatie: Some("000000000".into()),
    ..ZaakPatch::default()
  };
  let err = s.update_zaak(z.uuid, patch).await.unwrap_err();
  assert_eq!(code(&err), "wijzigen-niet-toegelaten");

  let patch = ZaakPatch {
    startdatum: Some(d(2018, 7, 1)),
    ..ZaakPatch::default()
  };
  let updated = s.update_zaak(z.uuid, patch).await.unwrap();
  assert_eq!(updated.startdatum, d(2018, 7, 1));
}

#[tokio::test]
async fn deelzaak_cannot_be_hoofdzaak() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let top = zaak(&s, setup.zaaktype.uuid).await;

  let deelzaak = s
    .create_zaak(
      serde_json::from_value(json!({
        "bronorganisatie": "517439943",
        "zaaktype": setup.zaaktype.uuid,
        "startdatum": "2018-06-01",
        "hoofdzaak": top.uuid,
      }))
      .unwrap(),
    )
    .await
    .unwrap();

  let err = s
    .create_zaak(
      serde_json::from_value(json!({
        "bronorganisatie": "517439943",
        "zaaktype": setup.zaaktype.uuid,
        "startdatum": "2018-06-01",
        "hoofdzaak": deelzaak.uuid,
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "deelzaak-als-hoofdzaak");

  let patch = ZaakPatch {
    hoofdzaak: Some(Some(deelzaak.uuid)),
    ..ZaakPatch::default()
  };
  let err = s.update_zaak(top.uuid, patch).await.unwrap_err();
  assert_eq!(code(&err), "cycle");
}

#[tokio::test]
async fn closing_derives_archiefactiedatum_from_einddatum() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let z = zaak(&s, setup.zaaktype.uuid).await;
  resultaat(&s, z.uuid, setup.resultaattype).await;

  let open = post_status(&s, z.uuid, setup.start, "2018-09-01T09:00:00Z")
    .await
    .unwrap();
  assert_eq!(open.state, ZaakState::Open);

  let closed = post_status(&s, z.uuid, setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap();
  assert_eq!(closed.state, ZaakState::Closed);
  assert!(!closed.manual_resolution_required);

  let stored = s.get_zaak(z.uuid).await.unwrap().unwrap();
  assert_eq!(stored.einddatum, Some(d(2018, 10, 22)));
  assert_eq!(stored.archiefactiedatum, Some(d(2028, 10, 22)));
  assert_eq!(
    stored.archiefnominatie,
    Some(zgw_core::catalogi::Archiefnominatie::Vernietigen)
  );
}

#[tokio::test]
async fn closing_uses_the_besluit_ingangsdatum() {
  let s = store().await;
  let setup =
    setup(&s, json!({ "afleidingswijze": "ingangsdatum_besluit" })).await;
  let z = zaak(&s, setup.zaaktype.uuid).await;
  resultaat(&s, z.uuid, setup.resultaattype).await;

  s.create_besluit(
    serde_json::from_value(json!({
      "verantwoordelijke_organisatie": "517439943",
      "besluittype": { "local": setup.besluittype.uuid },
      "zaak": { "local": z.uuid },
      "datum": "2018-09-06",
      "ingangsdatum": "2020-05-03",
    }))
    .unwrap(),
  )
  .await
  .unwrap();

  post_status(&s, z.uuid, setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap();
  let stored = s.get_zaak(z.uuid).await.unwrap().unwrap();
  assert_eq!(stored.archiefactiedatum, Some(d(2030, 5, 3)));
}

#[tokio::test]
async fn missing_eigenschap_requires_manual_resolution() {
  let s = store().await;
  let setup = setup(
    &s,
    json!({ "afleidingswijze": "eigenschap", "datumkenmerk": "vervaldatum" }),
  )
  .await;
  let z = zaak(&s, setup.zaaktype.uuid).await;
  resultaat(&s, z.uuid, setup.resultaattype).await;

  let closed = post_status(&s, z.uuid, setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap();
  assert!(closed.manual_resolution_required);
  assert_eq!(
    closed.unresolved,
    Some(UnresolvedSource::EigenschapMissing {
      naam: "vervaldatum".into(),
    })
  );

  let stored = s.get_zaak(z.uuid).await.unwrap().unwrap();
  assert_eq!(stored.state(), ZaakState::Closed);
  assert_eq!(stored.archiefactiedatum, None);
  assert!(stored.archiefactiedatum_handmatig);

  // Filling the date in by hand settles it.
  let patch = ZaakPatch {
    archiefactiedatum: Some(d(2030, 1, 1)),
    ..ZaakPatch::default()
  };
  let settled = s.update_zaak(z.uuid, patch).await.unwrap();
  assert!(!settled.archiefactiedatum_handmatig);
}

#[tokio::test]
async fn eigenschap_supplies_the_brondatum() {
  let s = store().await;
  let setup = setup(
    &s,
    json!({ "afleidingswijze": "eigenschap", "datumkenmerk": "vervaldatum" }),
  )
  .await;
  let eigenschap = s
    .create_eigenschap(
      serde_json::from_value(json!({
        "zaaktype": setup.zaaktype.uuid, "naam": "vervaldatum", "formaat": "datum",
      }))
      .unwrap(),
    )
    .await
    .unwrap();

  let z = zaak(&s, setup.zaaktype.uuid).await;
  resultaat(&s, z.uuid, setup.resultaattype).await;
  s.create_zaakeigenschap(
    serde_json::from_value(json!({
      "zaak": z.uuid, "eigenschap": eigenschap.uuid, "waarde": "2019-03-01",
    }))
    .unwrap(),
  )
  .await
  .unwrap();

  post_status(&s, z.uuid, setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap();
  let stored = s.get_zaak(z.uuid).await.unwrap().unwrap();
  assert_eq!(stored.archiefactiedatum, Some(d(2029, 3, 1)));
}

#[tokio::test]
async fn closing_without_resultaat_is_flagged() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let z = zaak(&s, setup.zaaktype.uuid).await;

  let closed = post_status(&s, z.uuid, setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap();
  assert_eq!(closed.state, ZaakState::Closed);
  assert_eq!(closed.unresolved, Some(UnresolvedSource::NoResultaat));
}

#[tokio::test]
async fn reopen_clears_the_closure() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let z = zaak(&s, setup.zaaktype.uuid).await;
  resultaat(&s, z.uuid, setup.resultaattype).await;
  post_status(&s, z.uuid, setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap();

  let reopened = s.reopen_zaak(z.uuid).await.unwrap();
  assert_eq!(reopened.state(), ZaakState::Open);
  assert_eq!(reopened.archiefactiedatum, None);

  let stored = s.get_zaak(z.uuid).await.unwrap().unwrap();
  assert_eq!(stored, reopened);
}

#[tokio::test]
async fn status_of_unknown_zaak_is_rejected() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;

  let err = post_status(&s, Uuid::new_v4(), setup.eind, "2018-10-22T10:00:00Z")
    .await
    .unwrap_err();
  assert_eq!(code(&err), "does_not_exist");
}

#[tokio::test]
async fn second_resultaat_is_rejected() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let z = zaak(&s, setup.zaaktype.uuid).await;
  resultaat(&s, z.uuid, setup.resultaattype).await;

  let err = s
    .create_resultaat(
      serde_json::from_value(json!({
        "zaak": z.uuid, "resultaattype": setup.resultaattype,
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "unique");
}

// ─── Besluiten ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn besluit_relations_round_trip() {
  let s = store().await;
  let remote = "https://catalogi.example.com/api/v1/besluittypen/7";

  let besluit = s
    .create_besluit(
      serde_json::from_value(json!({
        "verantwoordelijke_organisatie": "517439943",
        "besluittype": { "remote": remote },
        "datum": "2018-09-06",
        "ingangsdatum": "2018-10-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(besluit.identificatie, "BESLUIT-2018-0000000001");

  let fetched = s.get_besluit(besluit.uuid).await.unwrap().unwrap();
  assert_eq!(fetched.besluittype, Relation::Remote(remote.into()));
  assert_eq!(fetched.zaak, None);
}

#[tokio::test]
async fn besluit_with_both_references_is_rejected() {
  let s = store().await;
  let err = s
    .create_besluit(
      serde_json::from_value(json!({
        "verantwoordelijke_organisatie": "517439943",
        "besluittype": {
          "local": Uuid::new_v4(),
          "remote": "https://catalogi.example.com/api/v1/besluittypen/7",
        },
        "datum": "2018-09-06",
        "ingangsdatum": "2018-10-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "both-filled");
}

#[tokio::test]
async fn besluittype_must_fit_the_zaaktype() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let other = besluittype(&s, setup.zaaktype.catalogus, "Subsidie", &[]).await;
  assert!(!setup.zaaktype.besluittypen.contains(&other.uuid));
  let z = zaak(&s, setup.zaaktype.uuid).await;

  let err = s
    .create_besluit(
      serde_json::from_value(json!({
        "verantwoordelijke_organisatie": "517439943",
        "besluittype": { "local": other.uuid },
        "zaak": { "local": z.uuid },
        "datum": "2018-09-06",
        "ingangsdatum": "2018-10-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "zaaktype-mismatch");
}

#[tokio::test]
async fn besluit_organisatie_is_immutable() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "afgehandeld" })).await;
  let body = |organisatie: &str| {
    serde_json::from_value(json!({
      "verantwoordelijke_organisatie": organisatie,
      "besluittype": { "local": setup.besluittype.uuid },
      "datum": "2018-09-06",
      "ingangsdatum": "2018-10-01",
    }))
    .unwrap()
  };

  let besluit = s.create_besluit(body("517439943")).await.unwrap();
  let err = s
    .update_besluit(besluit.uuid, body("000000000"))
    .await
    .unwrap_err();
  assert_eq!(code(&err), "wijzigen-niet-toegelaten");

  let kept = s.update_besluit(besluit.uuid, body("517439943")).await.unwrap();
  assert_eq!(kept.identificatie, besluit.identificatie);
}

#[tokio::test]
async fn besluitinformatieobject_rules() {
  let s = store().await;
  let cat = catalogus(&s).await;
  let allowed = informatieobjecttype(&s, cat.uuid).await;
  let bt = besluittype(&s, cat.uuid, "Vergunning", &[allowed.uuid]).await;

  let besluit = s
    .create_besluit(
      serde_json::from_value(json!({
        "verantwoordelijke_organisatie": "517439943",
        "besluittype": { "local": bt.uuid },
        "datum": "2018-09-06",
        "ingangsdatum": "2018-10-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  let document = s
    .create_informatieobject(
      serde_json::from_value(json!({
        "identificatie": "DOC-1",
        "informatieobjecttype": allowed.uuid,
      }))
      .unwrap(),
    )
    .await
    .unwrap();

  let link = || {
    serde_json::from_value(json!({
      "besluit": besluit.uuid,
      "informatieobject": { "local": document.uuid },
    }))
    .unwrap()
  };
  let bio = s.create_besluitinformatieobject(link()).await.unwrap();
  let fetched = s.get_besluitinformatieobject(bio.uuid).await.unwrap().unwrap();
  assert_eq!(fetched, bio);

  let err = s.create_besluitinformatieobject(link()).await.unwrap_err();
  assert_eq!(code(&err), "unique");

  // A document of a type the besluittype does not list.
  let stranger_type = s
    .create_informatieobjecttype(
      serde_json::from_value(json!({
        "catalogus": cat.uuid,
        "omschrijving": "Bijlage",
        "vertrouwelijkheidaanduiding": "intern",
        "begin_geldigheid": "2018-01-01",
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  let stranger = s
    .create_informatieobject(
      serde_json::from_value(json!({
        "identificatie": "DOC-2",
        "informatieobjecttype": stranger_type.uuid,
      }))
      .unwrap(),
    )
    .await
    .unwrap();
  let err = s
    .create_besluitinformatieobject(
      serde_json::from_value(json!({
        "besluit": besluit.uuid,
        "informatieobject": { "local": stranger.uuid },
      }))
      .unwrap(),
    )
    .await
    .unwrap_err();
  assert_eq!(code(&err), "missing-besluittype-informatieobjecttype-relation");
}

#[tokio::test]
async fn afleidingswijze_choices_are_stored_by_value() {
  let s = store().await;
  let setup = setup(&s, json!({ "afleidingswijze": "hoofdzaak" })).await;
  let rt = s.get_resultaattype(setup.resultaattype).await.unwrap().unwrap();
  assert_eq!(
    rt.brondatum_archiefprocedure.afleidingswijze,
    Afleidingswijze::Hoofdzaak
  );
}
