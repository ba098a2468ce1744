//! The external classification registry ("Selectielijst").
//!
//! The registry is a collaborator reached by URL. This module defines the
//! record shape the core consumes, the lookup capability backends implement,
//! and a per-pass cache so validators that need the same classification do
//! not fetch it twice.

use std::{
  collections::HashMap,
  future::Future,
  sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumMessage, EnumString};
use thiserror::Error;

// ─── Record ──────────────────────────────────────────────────────────────────

/// The retention-term policy of a selectielijst resultaat.
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
pub enum Procestermijn {
  #[strum(message = "Nihil")]
  Nihil,
  #[strum(message = "De bestaans- of geldigheidsduur van het procesobject")]
  BestaansduurProcesobject,
  #[strum(message = "De ingeschatte maximale bestaans- of geldigheidsduur \
                     van het procesobject")]
  IngeschatteBestaansduurProcesobject,
  #[strum(message = "Tot een vast te leggen datum")]
  VastTeLeggenDatum,
  #[strum(message = "Samengevoegd met de bewaartermijn")]
  SamengevoegdMetBewaartermijn,
}

/// The fields of a selectielijst `resultaat` the core relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selectielijstklasse {
  pub url:           String,
  /// URL of the process type this resultaat belongs to.
  pub proces_type:   String,
  /// `None` when the registry leaves the field blank.
  #[serde(default, deserialize_with = "blank_as_none")]
  pub procestermijn: Option<Procestermijn>,
  #[serde(default)]
  pub nummer:        Option<i64>,
  #[serde(default)]
  pub naam:          Option<String>,
  #[serde(default)]
  pub bewaartermijn: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Procestermijn>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw: Option<String> = Option::deserialize(deserializer)?;
  match raw.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
  }
}

/// The kind of registry resource being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum ResourceKind {
  Resultaat,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// The registry could not be consulted. Callers fail closed on this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
  #[error("no configured service serves {url}")]
  UnknownService { url: String },

  #[error("request to {url} timed out")]
  Timeout { url: String },

  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("{url} responded with status {status}")]
  Status { url: String, status: u16 },

  #[error("could not decode response from {url}: {message}")]
  Decode { url: String, message: String },
}

// ─── Capability ──────────────────────────────────────────────────────────────

/// Fetches classification records from the registry.
pub trait ClassificationLookup: Send + Sync {
  fn fetch_classification<'a>(
    &'a self,
    kind: ResourceKind,
    url: &'a str,
  ) -> impl Future<Output = Result<Selectielijstklasse, LookupError>> + Send + 'a;
}

/// A lookup that remembers every record it fetched, scoped to one validation
/// pass. Failures are not cached.
pub struct CachedLookup<'l, L> {
  inner: &'l L,
  cache: Mutex<HashMap<String, Selectielijstklasse>>,
}

impl<'l, L: ClassificationLookup> CachedLookup<'l, L> {
  pub fn new(inner: &'l L) -> Self {
    Self {
      inner,
      cache: Mutex::new(HashMap::new()),
    }
  }

  fn cached(&self, url: &str) -> Option<Selectielijstklasse> {
    self
      .cache
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(url)
      .cloned()
  }

  fn remember(&self, klasse: &Selectielijstklasse, url: &str) {
    self
      .cache
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(url.to_owned(), klasse.clone());
  }
}

impl<L: ClassificationLookup> ClassificationLookup for CachedLookup<'_, L> {
  async fn fetch_classification(
    &self,
    kind: ResourceKind,
    url: &str,
  ) -> Result<Selectielijstklasse, LookupError> {
    if let Some(hit) = self.cached(url) {
      return Ok(hit);
    }
    let klasse = self.inner.fetch_classification(kind, url).await?;
    self.remember(&klasse, url);
    Ok(klasse)
  }
}
