//! zgw-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `ZGW_`-prefixed environment variables, opens an in-process SQLite store,
//! and serves the Catalogi, Zaken and Besluiten APIs over HTTP.
//!
//! # Choice values
//!
//! To list the allowed values of every choice field:
//!
//! ```
//! cargo run -p zgw-server -- --print-choices
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use zgw_core::archief::Unresolved;
use zgw_selectielijst::SelectielijstClient;
use zgw_server::{ServerConfig, choice_tables, environment, expand_tilde};
use zgw_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "ZGW Zaken and Besluiten registration server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the allowed values of every choice field and exit.
  #[arg(long)]
  print_choices: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.print_choices {
    println!("{}", choice_tables());
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config, environment())
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let lookup = SelectielijstClient::new(&server_cfg.selectielijst)
    .context("failed to build selectielijst client")?;

  let app = zgw_server::router(Arc::new(store), Arc::new(lookup), Arc::new(Unresolved));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
