//! Core types, validators and the archive-date derivation engine for the ZGW
//! Zaken and Besluiten registration components.
//!
//! No HTTP or database code lives here.
//! Storage backends implement the traits in [`store`]; the classification
//! registry is reached through [`selectielijst::ClassificationLookup`].

// Trait impls use native `async fn`; the traits spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod archief;
pub mod besluiten;
pub mod catalogi;
pub mod choices;
pub mod documenten;
pub mod error;
pub mod geldigheid;
pub mod identificatie;
pub mod lifecycle;
pub mod relation;
pub mod selectielijst;
pub mod store;
pub mod termijn;
pub mod validation;
pub mod zaken;

pub use error::{Error, Result, ValidationFailure};
