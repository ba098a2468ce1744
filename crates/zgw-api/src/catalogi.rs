//! Handlers for the Catalogi component, mounted under `/catalogi/api/v1`.
//!
//! | Method     | Path | Notes |
//! |------------|------|-------|
//! | `POST`     | `/catalogussen` | |
//! | `GET`      | `/catalogussen/{id}` | 404 if not found |
//! | `POST`     | `/zaaktypen` | Overlap and cross-catalogus checks |
//! | `GET`/`PUT`| `/zaaktypen/{id}` | |
//! | `POST`     | `/besluittypen` | |
//! | `GET`      | `/besluittypen/{id}` | |
//! | `POST`     | `/informatieobjecttypen` | |
//! | `GET`      | `/informatieobjecttypen/{id}` | |
//! | `GET`      | `/statustypen` | Optional `?zaaktype=<uuid>` |
//! | `POST`     | `/statustypen` | |
//! | `GET`      | `/statustypen/{id}` | |
//! | `POST`     | `/resultaattypen` | Fetches the selectielijstklasse first |
//! | `GET`      | `/resultaattypen/{id}` | |
//! | `POST`     | `/eigenschappen` | |
//! | `GET`      | `/eigenschappen/{id}` | |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
  routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;
use zgw_core::{
  ValidationFailure,
  archief::DatumkenmerkResolver,
  catalogi::{
    BesluitType, Catalogus, Eigenschap, InformatieObjectType, NewBesluitType,
    NewCatalogus, NewEigenschap, NewInformatieObjectType, NewResultaatType,
    NewStatusType, NewZaakType, ResultaatType, StatusType, ZaakType,
  },
  selectielijst::{CachedLookup, ClassificationLookup, ResourceKind},
  store::{CatalogiStore, ZgwStore},
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
    .route("/catalogussen", post(create_catalogus::<S>))
    .route("/catalogussen/{id}", get(get_catalogus::<S>))
    .route("/zaaktypen", post(create_zaaktype::<S>))
    .route(
      "/zaaktypen/{id}",
      get(get_zaaktype::<S>).put(update_zaaktype::<S>),
    )
    .route("/besluittypen", post(create_besluittype::<S>))
    .route("/besluittypen/{id}", get(get_besluittype::<S>))
    .route(
      "/informatieobjecttypen",
      post(create_informatieobjecttype::<S>),
    )
    .route(
      "/informatieobjecttypen/{id}",
      get(get_informatieobjecttype::<S>),
    )
    .route(
      "/statustypen",
      get(list_statustypen::<S>).post(create_statustype::<S>),
    )
    .route("/statustypen/{id}", get(get_statustype::<S>))
    .route("/resultaattypen", post(create_resultaattype::<S, L, R>))
    .route("/resultaattypen/{id}", get(get_resultaattype::<S>))
    .route("/eigenschappen", post(create_eigenschap::<S>))
    .route("/eigenschappen/{id}", get(get_eigenschap::<S>))
}

// ─── Catalogus ───────────────────────────────────────────────────────────────

/// `POST /catalogussen`
pub async fn create_catalogus<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCatalogus>,
) -> Result<impl IntoResponse, ApiError> {
  let catalogus = store
    .create_catalogus(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(catalogus)))
}

/// `GET /catalogussen/{id}`
pub async fn get_catalogus<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Catalogus>, ApiError> {
  let catalogus = store.get_catalogus(id).await.map_err(ApiError::store)?;
  found(catalogus, "catalogus", id)
}

// ─── ZaakType ────────────────────────────────────────────────────────────────

/// `POST /zaaktypen`
pub async fn create_zaaktype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewZaakType>,
) -> Result<impl IntoResponse, ApiError> {
  let zaaktype = store.create_zaaktype(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(zaaktype)))
}

/// `GET /zaaktypen/{id}`
pub async fn get_zaaktype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ZaakType>, ApiError> {
  let zaaktype = store.get_zaaktype(id).await.map_err(ApiError::store)?;
  found(zaaktype, "zaaktype", id)
}

/// `PUT /zaaktypen/{id}`: replace every field, re-running the overlap and
/// relation checks against the other versions.
pub async fn update_zaaktype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewZaakType>,
) -> Result<Json<ZaakType>, ApiError> {
  let zaaktype = store
    .update_zaaktype(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(zaaktype))
}

// ─── BesluitType ─────────────────────────────────────────────────────────────

/// `POST /besluittypen`
pub async fn create_besluittype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewBesluitType>,
) -> Result<impl IntoResponse, ApiError> {
  let besluittype = store
    .create_besluittype(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(besluittype)))
}

/// `GET /besluittypen/{id}`
pub async fn get_besluittype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<BesluitType>, ApiError> {
  let besluittype = store.get_besluittype(id).await.map_err(ApiError::store)?;
  found(besluittype, "besluittype", id)
}

// ─── InformatieObjectType ────────────────────────────────────────────────────

/// `POST /informatieobjecttypen`
pub async fn create_informatieobjecttype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewInformatieObjectType>,
) -> Result<impl IntoResponse, ApiError> {
  let iot = store
    .create_informatieobjecttype(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(iot)))
}

/// `GET /informatieobjecttypen/{id}`
pub async fn get_informatieobjecttype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<InformatieObjectType>, ApiError> {
  let iot = store
    .get_informatieobjecttype(id)
    .await
    .map_err(ApiError::store)?;
  found(iot, "informatieobjecttype", id)
}

// ─── StatusType ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusTypeParams {
  pub zaaktype: Option<Uuid>,
}

/// `GET /statustypen[?zaaktype=<uuid>]`, ordered by volgnummer.
pub async fn list_statustypen<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<StatusTypeParams>,
) -> Result<Json<Vec<StatusType>>, ApiError> {
  let statustypen = store
    .list_statustypen(params.zaaktype)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(statustypen))
}

/// `POST /statustypen`
pub async fn create_statustype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewStatusType>,
) -> Result<impl IntoResponse, ApiError> {
  let statustype = store
    .create_statustype(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(statustype)))
}

/// `GET /statustypen/{id}`
pub async fn get_statustype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<StatusType>, ApiError> {
  let statustype = store.get_statustype(id).await.map_err(ApiError::store)?;
  found(statustype, "statustype", id)
}

// ─── ResultaatType ───────────────────────────────────────────────────────────

/// `POST /resultaattypen`
///
/// The selectielijstklasse is fetched before the store is touched. When the
/// registry cannot be reached the write is refused.
pub async fn create_resultaattype<S, L, R>(
  State(state): State<ApiState<S, L, R>>,
  Json(body): Json<NewResultaatType>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogiStore,
  L: ClassificationLookup,
  R: DatumkenmerkResolver,
{
  let klasse = match body.selectielijstklasse.as_deref() {
    Some(url) => {
      let lookup = CachedLookup::new(state.lookup.as_ref());
      let klasse = lookup
        .fetch_classification(ResourceKind::Resultaat, url)
        .await
        .map_err(|source| {
          tracing::warn!(url, error = %source, "selectielijstklasse lookup failed");
          ValidationFailure::Lookup {
            field: "selectielijstklasse",
            source,
          }
        })?;
      Some(klasse)
    }
    None => None,
  };

  let resultaattype = state
    .store
    .create_resultaattype(body, klasse)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(resultaattype)))
}

/// `GET /resultaattypen/{id}`
pub async fn get_resultaattype<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ResultaatType>, ApiError> {
  let resultaattype = store
    .get_resultaattype(id)
    .await
    .map_err(ApiError::store)?;
  found(resultaattype, "resultaattype", id)
}

// ─── Eigenschap ──────────────────────────────────────────────────────────────

/// `POST /eigenschappen`
pub async fn create_eigenschap<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEigenschap>,
) -> Result<impl IntoResponse, ApiError> {
  let eigenschap = store
    .create_eigenschap(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(eigenschap)))
}

/// `GET /eigenschappen/{id}`
pub async fn get_eigenschap<S: CatalogiStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Eigenschap>, ApiError> {
  let eigenschap = store.get_eigenschap(id).await.map_err(ApiError::store)?;
  found(eigenschap, "eigenschap", id)
}
