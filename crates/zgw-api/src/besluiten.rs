//! Handlers for the Besluiten component, mounted under `/besluiten/api/v1`.
//!
//! | Method     | Path | Notes |
//! |------------|------|-------|
//! | `POST`     | `/besluiten` | Identificatie generated when omitted |
//! | `GET`/`PUT`| `/besluiten/{id}` | Identificatie and organisatie are fixed |
//! | `POST`     | `/besluitinformatieobjecten` | Unique per besluit and document |
//! | `GET`      | `/besluitinformatieobjecten/{id}` | |

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  routing::{get, post},
};
use uuid::Uuid;
use zgw_core::{
  archief::DatumkenmerkResolver,
  besluiten::{Besluit, BesluitInformatieObject, NewBesluit, NewBesluitInformatieObject},
  selectielijst::ClassificationLookup,
  store::{BesluitenStore, ZgwStore},
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
    .route("/besluiten", post(create_besluit::<S>))
    .route(
      "/besluiten/{id}",
      get(get_besluit::<S>).put(update_besluit::<S>),
    )
    .route(
      "/besluitinformatieobjecten",
      post(create_besluitinformatieobject::<S>),
    )
    .route(
      "/besluitinformatieobjecten/{id}",
      get(get_besluitinformatieobject::<S>),
    )
}

// ─── Besluit ─────────────────────────────────────────────────────────────────

/// `POST /besluiten`
pub async fn create_besluit<S: BesluitenStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewBesluit>,
) -> Result<impl IntoResponse, ApiError> {
  let besluit = store.create_besluit(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(besluit)))
}

/// `GET /besluiten/{id}`
pub async fn get_besluit<S: BesluitenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Besluit>, ApiError> {
  let besluit = store.get_besluit(id).await.map_err(ApiError::store)?;
  found(besluit, "besluit", id)
}

/// `PUT /besluiten/{id}`
pub async fn update_besluit<S: BesluitenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewBesluit>,
) -> Result<Json<Besluit>, ApiError> {
  let besluit = store
    .update_besluit(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(besluit))
}

// ─── BesluitInformatieObject ─────────────────────────────────────────────────

/// `POST /besluitinformatieobjecten`
pub async fn create_besluitinformatieobject<S: BesluitenStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewBesluitInformatieObject>,
) -> Result<impl IntoResponse, ApiError> {
  let bio = store
    .create_besluitinformatieobject(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(bio)))
}

/// `GET /besluitinformatieobjecten/{id}`
pub async fn get_besluitinformatieobject<S: BesluitenStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<BesluitInformatieObject>, ApiError> {
  let bio = store
    .get_besluitinformatieobject(id)
    .await
    .map_err(ApiError::store)?;
  found(bio, "besluitinformatieobject", id)
}
