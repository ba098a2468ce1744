//! [`SqliteStore`]: the SQLite implementation of the `zgw-core` store traits.

use std::path::Path;

use rusqlite::{
  Connection, OptionalExtension as _, Params, Row, Transaction,
  TransactionBehavior,
};
use zgw_core::{
  identificatie::{glob_pattern, next_identificatie},
  store::Store,
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ZGW store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` against the connection outside any explicit transaction.
  pub(crate) async fn read<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside a `BEGIN IMMEDIATE` transaction. The write lock is taken
  /// up front, so everything `f` reads stays valid until commit. Any error
  /// rolls the transaction back.
  pub(crate) async fn write<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(with_tx(conn, f))).await?
  }
}

impl Store for SqliteStore {
  type Error = Error;
}

fn with_tx<T>(
  conn: &mut Connection,
  f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let out = f(&tx)?;
  tx.commit()?;
  Ok(out)
}

// ─── Query helpers ───────────────────────────────────────────────────────────

/// At most one row, mapped through `raw` and decoded by `decode`.
pub(crate) fn query_one<R, T>(
  conn: &Connection,
  sql: &str,
  params: impl Params,
  raw: fn(&Row<'_>) -> rusqlite::Result<R>,
  decode: fn(R) -> Result<T>,
) -> Result<Option<T>> {
  conn
    .query_row(sql, params, raw)
    .optional()?
    .map(decode)
    .transpose()
}

pub(crate) fn query_all<R, T>(
  conn: &Connection,
  sql: &str,
  params: impl Params,
  raw: fn(&Row<'_>) -> rusqlite::Result<R>,
  decode: fn(R) -> Result<T>,
) -> Result<Vec<T>> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt
    .query_map(params, raw)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  rows.into_iter().map(decode).collect()
}

/// Whether `sql` (a `SELECT 1 ...`) yields a row.
pub(crate) fn exists(
  conn: &Connection,
  sql: &str,
  params: impl Params,
) -> Result<bool> {
  Ok(conn.query_row(sql, params, |_| Ok(())).optional()?.is_some())
}

/// The next free `<PREFIX>-<year>-<sequence>` identificatie in `table`.
/// Client-supplied identificaties that are not sequence-shaped are skipped.
pub(crate) fn generate_identificatie(
  conn: &Connection,
  table: &'static str,
  prefix: &str,
  year: i32,
) -> Result<String> {
  let last: Option<String> = conn.query_row(
    &format!("SELECT MAX(identificatie) FROM {table} WHERE identificatie GLOB ?1"),
    rusqlite::params![glob_pattern(prefix, year)],
    |row| row.get(0),
  )?;
  Ok(next_identificatie(prefix, year, last.as_deref())?)
}

pub(crate) fn not_found(kind: &'static str, id: uuid::Uuid) -> Error {
  Error::NotFound { kind, id }
}
