//! Storage traits.
//!
//! Backends (e.g. `zgw-store-sqlite`) implement these. Every guarded write
//! runs its validation pipeline and the write itself in one transaction, so
//! a check and the act it guards cannot interleave with another writer.
//! Data that lives outside the store (registry records, externally resolved
//! dates) is fetched by the caller beforehand and passed in.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  ValidationFailure,
  besluiten::{
    Besluit, BesluitInformatieObject, NewBesluit, NewBesluitInformatieObject,
  },
  catalogi::{
    BesluitType, Catalogus, Eigenschap, InformatieObjectType, NewBesluitType,
    NewCatalogus, NewEigenschap, NewInformatieObjectType, NewResultaatType,
    NewStatusType, NewZaakType, ResultaatType, StatusType, ZaakType,
  },
  documenten::{InformatieObject, NewInformatieObject},
  lifecycle::ClosureResult,
  selectielijst::Selectielijstklasse,
  zaken::{
    NewResultaat, NewStatus, NewZaak, NewZaakEigenschap, Resultaat, Status,
    Zaak, ZaakEigenschap, ZaakPatch,
  },
};

/// Lets callers tell user-correctable failures apart from backend faults
/// without knowing the backend's error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The rejected rule, if the write failed validation.
  fn validation_failure(&self) -> Option<&ValidationFailure>;

  /// The addressed resource does not exist.
  fn is_not_found(&self) -> bool;
}

/// Shared by the resource-family traits below.
pub trait Store: Send + Sync {
  type Error: StoreError;
}

// ─── Catalogi ────────────────────────────────────────────────────────────────

pub trait CatalogiStore: Store {
  fn create_catalogus(
    &self,
    input: NewCatalogus,
  ) -> impl Future<Output = Result<Catalogus, Self::Error>> + Send + '_;

  fn get_catalogus(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Catalogus>, Self::Error>> + Send + '_;

  fn create_zaaktype(
    &self,
    input: NewZaakType,
  ) -> impl Future<Output = Result<ZaakType, Self::Error>> + Send + '_;

  /// Replace a zaaktype. The overlap check ignores the version being
  /// replaced.
  fn update_zaaktype(
    &self,
    id: Uuid,
    input: NewZaakType,
  ) -> impl Future<Output = Result<ZaakType, Self::Error>> + Send + '_;

  fn get_zaaktype(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ZaakType>, Self::Error>> + Send + '_;

  fn create_besluittype(
    &self,
    input: NewBesluitType,
  ) -> impl Future<Output = Result<BesluitType, Self::Error>> + Send + '_;

  fn get_besluittype(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<BesluitType>, Self::Error>> + Send + '_;

  fn create_informatieobjecttype(
    &self,
    input: NewInformatieObjectType,
  ) -> impl Future<Output = Result<InformatieObjectType, Self::Error>> + Send + '_;

  fn get_informatieobjecttype(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<InformatieObjectType>, Self::Error>>
  + Send
  + '_;

  fn create_statustype(
    &self,
    input: NewStatusType,
  ) -> impl Future<Output = Result<StatusType, Self::Error>> + Send + '_;

  fn get_statustype(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StatusType>, Self::Error>> + Send + '_;

  /// All statustypen, or those of one zaaktype, ordered by volgnummer.
  fn list_statustypen(
    &self,
    zaaktype: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<StatusType>, Self::Error>> + Send + '_;

  /// `selectielijstklasse` is the registry record behind
  /// `input.selectielijstklasse`, already fetched by the caller.
  fn create_resultaattype(
    &self,
    input: NewResultaatType,
    selectielijstklasse: Option<Selectielijstklasse>,
  ) -> impl Future<Output = Result<ResultaatType, Self::Error>> + Send + '_;

  fn get_resultaattype(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ResultaatType>, Self::Error>> + Send + '_;

  fn create_eigenschap(
    &self,
    input: NewEigenschap,
  ) -> impl Future<Output = Result<Eigenschap, Self::Error>> + Send + '_;

  fn get_eigenschap(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Eigenschap>, Self::Error>> + Send + '_;
}

// ─── Zaken ───────────────────────────────────────────────────────────────────

pub trait ZakenStore: Store {
  /// Create an open zaak. A missing identificatie is generated.
  fn create_zaak(
    &self,
    input: NewZaak,
  ) -> impl Future<Output = Result<Zaak, Self::Error>> + Send + '_;

  fn get_zaak(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Zaak>, Self::Error>> + Send + '_;

  fn update_zaak(
    &self,
    id: Uuid,
    patch: ZaakPatch,
  ) -> impl Future<Output = Result<Zaak, Self::Error>> + Send + '_;

  /// Clear the closure fields of a closed zaak.
  fn reopen_zaak(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Zaak, Self::Error>> + Send + '_;

  /// Record a status and apply the lifecycle transition to its zaak.
  ///
  /// `extern_datum` is the brondatum an external resolver produced for
  /// `zaakobject` / `ander_datumkenmerk`, if any.
  fn create_status(
    &self,
    input: NewStatus,
    extern_datum: Option<NaiveDate>,
  ) -> impl Future<Output = Result<(Status, ClosureResult), Self::Error>> + Send + '_;

  fn get_status(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Status>, Self::Error>> + Send + '_;

  fn create_resultaat(
    &self,
    input: NewResultaat,
  ) -> impl Future<Output = Result<Resultaat, Self::Error>> + Send + '_;

  fn get_resultaat(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Resultaat>, Self::Error>> + Send + '_;

  /// The resultaattype of the zaak's resultaat, if it has one.
  fn get_resultaattype_for_zaak(
    &self,
    zaak: Uuid,
  ) -> impl Future<Output = Result<Option<ResultaatType>, Self::Error>> + Send + '_;

  fn create_zaakeigenschap(
    &self,
    input: NewZaakEigenschap,
  ) -> impl Future<Output = Result<ZaakEigenschap, Self::Error>> + Send + '_;

  fn create_informatieobject(
    &self,
    input: NewInformatieObject,
  ) -> impl Future<Output = Result<InformatieObject, Self::Error>> + Send + '_;

  fn get_informatieobject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<InformatieObject>, Self::Error>> + Send + '_;
}

// ─── Besluiten ───────────────────────────────────────────────────────────────

pub trait BesluitenStore: Store {
  /// Create a besluit. A missing identificatie is generated.
  fn create_besluit(
    &self,
    input: NewBesluit,
  ) -> impl Future<Output = Result<Besluit, Self::Error>> + Send + '_;

  fn update_besluit(
    &self,
    id: Uuid,
    input: NewBesluit,
  ) -> impl Future<Output = Result<Besluit, Self::Error>> + Send + '_;

  fn get_besluit(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Besluit>, Self::Error>> + Send + '_;

  fn create_besluitinformatieobject(
    &self,
    input: NewBesluitInformatieObject,
  ) -> impl Future<Output = Result<BesluitInformatieObject, Self::Error>> + Send + '_;

  fn get_besluitinformatieobject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<BesluitInformatieObject>, Self::Error>>
  + Send
  + '_;
}

/// Everything the API needs from a backend.
pub trait ZgwStore: CatalogiStore + ZakenStore + BesluitenStore {}

impl<S: CatalogiStore + ZakenStore + BesluitenStore> ZgwStore for S {}
