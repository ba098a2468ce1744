//! Handlers for the Zaken component, mounted under `/zaken/api/v1`.
//!
//! | Method       | Path | Notes |
//! |--------------|------|-------|
//! | `POST`       | `/zaken` | Identificatie generated when omitted |
//! | `GET`/`PATCH`| `/zaken/{id}` | |
//! | `POST`       | `/zaken/{id}/heropen` | Clears the closure fields |
//! | `POST`       | `/statussen` | May close the zaak |
//! | `GET`        | `/statussen/{id}` | |
//! | `POST`       | `/resultaten` | One per zaak |
//! | `GET`        | `/resultaten/{id}` | |
//! | `POST`       | `/zaakeigenschappen` | |
//! | `POST`       | `/informatieobjecten` | |
//! | `GET`        | `/informatieobjecten/{id}` | |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  routing::{get, post},
};
use chrono::NaiveDate;
use uuid::Uuid;
use zgw_core::{
  archief::DatumkenmerkResolver,
  documenten::{InformatieObject, NewInformatieObject},
  selectielijst::ClassificationLookup,
  store::{CatalogiStore, ZakenStore, ZgwStore},
  zaken::{
    NewResultaat, NewStatus, NewZaak, NewZaakEigenschap, Resultaat, Status,
    Zaak, ZaakPatch,
  },
};

use crate::{
  ApiState,
  error::{ApiError, found},
};

pub fn router<S, L, R>() -> Router<ApiState<S, L, R>>
where
  S: ZgwStore + 'static,
  L: ClassificationLookup + 'static,
  R: DatumkenmerkResolver + 'static,
{
  Router::new()
    .route("/zaken", post(create_zaak::<S>))
    .route("/zaken/{id}", get(get_zaak::<S>).patch(update_zaak::<S>))
    .route("/zaken/{id}/heropen", post(reopen_zaak::<S>))
    .route("/statussen", post(create_status::<S, L, R>))
    .route("/statussen/{id}", get(get_status::<S>))
    .route("/resultaten", post(create_resultaat::<S>))
    .route("/resultaten/{id}", get(get_resultaat::<S>))
    .route("/zaakeigenschappen", post(create_zaakeigenschap::<S>))
    .route("/informatieobjecten", post(create_informatieobject::<S>))
    .route("/informatieobjecten/{id}", get(get_informatieobject::<S>))
}

// ─── Zaak ────────────────────────────────────────────────────────────────────

/// `POST /zaken`
pub async fn create_zaak<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewZaak>,
) -> Result<impl IntoResponse, ApiError> {
  let zaak = store.create_zaak(body).await.map_err(ApiError::store)?;
  tracing::debug!(zaak = %zaak.uuid, identificatie = %zaak.identificatie, "zaak created");
  Ok((StatusCode::CREATED, Json(zaak)))
}

/// `GET /zaken/{id}`
pub async fn get_zaak<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Zaak>, ApiError> {
  let zaak = store.get_zaak(id).await.map_err(ApiError::store)?;
  found(zaak, "zaak", id)
}

/// `PATCH /zaken/{id}`
pub async fn update_zaak<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ZaakPatch>,
) -> Result<Json<Zaak>, ApiError> {
  let zaak = store.update_zaak(id, body).await.map_err(ApiError::store)?;
  Ok(Json(zaak))
}

/// `POST /zaken/{id}/heropen`
pub async fn reopen_zaak<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Zaak>, ApiError> {
  let zaak = store.reopen_zaak(id).await.map_err(ApiError::store)?;
  tracing::info!(zaak = %id, "zaak reopened");
  Ok(Json(zaak))
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// `POST /statussen`
///
/// When the posted statustype is the eindstatus and the zaak's
/// resultaattype derives its brondatum from another registration, the
/// resolver is consulted before the status is written.
///
/// The resolve runs outside the store's write transaction. A resultaat
/// posted between the resolve and the write leaves the external date
/// unset, so the zaak closes with a manual-resolution flag.
pub async fn create_status<S, L, R>(
  State(state): State<ApiState<S, L, R>>,
  Json(body): Json<NewStatus>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ZakenStore + CatalogiStore,
  L: ClassificationLookup,
  R: DatumkenmerkResolver,
{
  let zaak_id = body.zaak;
  let closing = posts_eindstatus(state.store.as_ref(), body.statustype).await?;
  let extern_datum = if closing {
    resolve_extern_datum(&state, zaak_id).await?
  } else {
    None
  };

  let (status, closure) = state
    .store
    .create_status(body, extern_datum)
    .await
    .map_err(ApiError::store)?;

  if let Some(unresolved) = &closure.unresolved {
    tracing::warn!(
      zaak = %zaak_id,
      reason = %unresolved,
      "zaak closed; archiefactiedatum requires manual resolution"
    );
  } else if closure.closed() {
    tracing::info!(
      zaak = %zaak_id,
      einddatum = ?closure.einddatum,
      archiefactiedatum = ?closure.archiefactiedatum,
      "zaak closed"
    );
  }

  Ok((StatusCode::CREATED, Json(status)))
}

/// Whether `statustype` is the last one of its zaaktype. A missing
/// statustype is reported by the store write itself.
async fn posts_eindstatus<S: CatalogiStore>(
  store: &S,
  statustype: Uuid,
) -> Result<bool, ApiError> {
  let statustype = store
    .get_statustype(statustype)
    .await
    .map_err(ApiError::store)?;
  let Some(statustype) = statustype else {
    return Ok(false);
  };
  let siblings = store
    .list_statustypen(Some(statustype.zaaktype))
    .await
    .map_err(ApiError::store)?;
  Ok(statustype.is_eindstatus(&siblings))
}

async fn resolve_extern_datum<S, L, R>(
  state: &ApiState<S, L, R>,
  zaak_id: Uuid,
) -> Result<Option<NaiveDate>, ApiError>
where
  S: ZakenStore,
  R: DatumkenmerkResolver,
{
  let resultaattype = state
    .store
    .get_resultaattype_for_zaak(zaak_id)
    .await
    .map_err(ApiError::store)?;
  let Some(resultaattype) = resultaattype else {
    return Ok(None);
  };
  let procedure = &resultaattype.brondatum_archiefprocedure;
  if !procedure.afleidingswijze.needs_external_resolution() {
    return Ok(None);
  }

  // A missing zaak is reported by the store write itself.
  let Some(zaak) = state.store.get_zaak(zaak_id).await.map_err(ApiError::store)?
  else {
    return Ok(None);
  };
  Ok(state.resolver.resolve(&zaak, procedure).await)
}

/// `GET /statussen/{id}`
pub async fn get_status<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Status>, ApiError> {
  let status = store.get_status(id).await.map_err(ApiError::store)?;
  found(status, "status", id)
}

// ─── Resultaat ───────────────────────────────────────────────────────────────

/// `POST /resultaten`
pub async fn create_resultaat<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewResultaat>,
) -> Result<impl IntoResponse, ApiError> {
  let resultaat = store.create_resultaat(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(resultaat)))
}

/// `GET /resultaten/{id}`
pub async fn get_resultaat<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Resultaat>, ApiError> {
  let resultaat = store.get_resultaat(id).await.map_err(ApiError::store)?;
  found(resultaat, "resultaat", id)
}

// ─── ZaakEigenschap ──────────────────────────────────────────────────────────

/// `POST /zaakeigenschappen`
pub async fn create_zaakeigenschap<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewZaakEigenschap>,
) -> Result<impl IntoResponse, ApiError> {
  let eigenschap = store
    .create_zaakeigenschap(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(eigenschap)))
}

// ─── InformatieObject ────────────────────────────────────────────────────────

/// `POST /informatieobjecten`
pub async fn create_informatieobject<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewInformatieObject>,
) -> Result<impl IntoResponse, ApiError> {
  let document = store
    .create_informatieobject(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /informatieobjecten/{id}`
pub async fn get_informatieobject<S: ZakenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<InformatieObject>, ApiError> {
  let document = store
    .get_informatieobject(id)
    .await
    .map_err(ApiError::store)?;
  found(document, "informatieobject", id)
}
