//! HTTP client for the Selectielijst registry.
//!
//! [`SelectielijstClient`] implements
//! [`ClassificationLookup`](zgw_core::selectielijst::ClassificationLookup)
//! against one or more configured registry services. A URL is only fetched
//! when it lives under one of those services.

mod client;
mod config;

pub use client::SelectielijstClient;
pub use config::SelectielijstConfig;
