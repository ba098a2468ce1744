//! JSON REST API for the ZGW Catalogi, Zaken and Besluiten components.
//!
//! Exposes an axum [`Router`] backed by any [`zgw_core::store::ZgwStore`],
//! a [`ClassificationLookup`] for Selectielijst records and a
//! [`DatumkenmerkResolver`] for archive dates that live in other
//! registrations. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = zgw_api::api_router(store, lookup, Arc::new(Unresolved));
//! ```

pub mod besluiten;
pub mod catalogi;
pub mod error;
pub mod zaken;


use std::sync::Arc;

use axum::{Router, extract::FromRef};
use zgw_core::{
  archief::DatumkenmerkResolver, selectielijst::ClassificationLookup,
  store::ZgwStore,
};

pub use error::ApiError;

/// Shared handler state. Handlers that only touch the store extract
/// `State<Arc<S>>` directly.
pub struct ApiState<S, L, R> {
  pub store:    Arc<S>,
  pub lookup:   Arc<L>,
  pub resolver: Arc<R>,
}

impl<S, L, R> Clone for ApiState<S, L, R> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      lookup:   Arc::clone(&self.lookup),
      resolver: Arc::clone(&self.resolver),
    }
  }
}

impl<S, L, R> FromRef<ApiState<S, L, R>> for Arc<S> {
  fn from_ref(state: &ApiState<S, L, R>) -> Self { Arc::clone(&state.store) }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, L, R>(
  store: Arc<S>,
  lookup: Arc<L>,
  resolver: Arc<R>,
) -> Router<()>
where
  S: ZgwStore + 'static,
  L: ClassificationLookup + 'static,
  R: DatumkenmerkResolver + 'static,
{
  Router::new()
    .nest("/catalogi/api/v1", catalogi::router::<S, L, R>())
    .nest("/zaken/api/v1", zaken::router::<S, L, R>())
    .nest("/besluiten/api/v1", besluiten::router::<S, L, R>())
    .with_state(ApiState { store, lookup, resolver })
}
