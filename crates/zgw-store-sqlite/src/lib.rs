//! SQLite backend for the ZGW registration components.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Guarded writes run inside a
//! `BEGIN IMMEDIATE` transaction together with the reads their validation
//! needs.

mod besluiten;
mod catalogi;
mod encode;
mod schema;
mod store;
mod zaken;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
