//! ZGW registration server: configuration and router assembly.
//!
//! The binary in `main.rs` reads a [`ServerConfig`], opens the SQLite
//! store, builds the Selectielijst client and serves [`router`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use zgw_core::{
  archief::DatumkenmerkResolver,
  besluiten::VervalReden,
  catalogi::{Afleidingswijze, Archiefnominatie, Formaat, Vertrouwelijkheidaanduiding},
  choices::help_text,
  selectielijst::{ClassificationLookup, Procestermijn},
  store::ZgwStore,
};
use zgw_selectielijst::SelectielijstConfig;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ZGW_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  #[serde(default)]
  pub selectielijst: SelectielijstConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/zgw/zgw.sqlite3") }

impl ServerConfig {
  /// Layer `env` over the TOML file at `path`. The file may be absent.
  pub fn load(
    path: &Path,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// The environment source used by the binary: `ZGW_PORT`,
/// `ZGW_SELECTIELIJST__TIMEOUT_SECS` and so on.
pub fn environment() -> config::Environment {
  config::Environment::with_prefix("ZGW")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The API router with request tracing.
pub fn router<S, L, R>(store: Arc<S>, lookup: Arc<L>, resolver: Arc<R>) -> Router
where
  S: ZgwStore + 'static,
  L: ClassificationLookup + 'static,
  R: DatumkenmerkResolver + 'static,
{
  zgw_api::api_router(store, lookup, resolver).layer(TraceLayer::new_for_http())
}

// ─── Choice tables ───────────────────────────────────────────────────────────

/// Every choice field with its allowed values, as Markdown.
pub fn choice_tables() -> String {
  [
    ("afleidingswijze", help_text::<Afleidingswijze>()),
    ("archiefnominatie", help_text::<Archiefnominatie>()),
    ("formaat", help_text::<Formaat>()),
    ("procestermijn", help_text::<Procestermijn>()),
    ("vertrouwelijkheidaanduiding", help_text::<Vertrouwelijkheidaanduiding>()),
    ("vervalreden", help_text::<VervalReden>()),
  ]
  .into_iter()
  .map(|(field, values)| format!("## {field}\n\n{values}\n"))
  .collect::<Vec<_>>()
  .join("\n")
}
