//! The zaak lifecycle.
//!
//! A zaak is created open and closes when a status whose statustype is the
//! zaaktype's eindstatus is posted. Closing sets `einddatum` and derives the
//! archive fields. Non-terminal statuses never reopen a closed zaak; that is
//! the job of [`reopen`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result, ValidationFailure,
  archief::{
    ArchiveDerivation, Brongegevens, UnresolvedSource, compute_archiefactiedatum,
  },
  catalogi::{Archiefnominatie, ResultaatType, StatusType},
  zaken::Zaak,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZaakState {
  Open,
  Closed,
}

/// The zaak's result type and the neighbourhood data derivation may need.
#[derive(Debug, Clone, Copy)]
pub struct ArchiefInput<'a> {
  pub resultaattype: &'a ResultaatType,
  pub brongegevens:  &'a Brongegevens,
}

/// The zaak fields after a status was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosureResult {
  pub state:                      ZaakState,
  pub einddatum:                  Option<NaiveDate>,
  pub archiefnominatie:           Option<Archiefnominatie>,
  pub archiefactiedatum:          Option<NaiveDate>,
  pub manual_resolution_required: bool,
  /// Why manual resolution is required, if it is.
  pub unresolved:                 Option<UnresolvedSource>,
}

impl ClosureResult {
  fn unchanged(zaak: &Zaak) -> Self {
    Self {
      state:                      zaak.state(),
      einddatum:                  zaak.einddatum,
      archiefnominatie:           zaak.archiefnominatie,
      archiefactiedatum:          zaak.archiefactiedatum,
      manual_resolution_required: zaak.archiefactiedatum_handmatig,
      unresolved:                 None,
    }
  }

  pub fn closed(&self) -> bool { self.state == ZaakState::Closed }
}

/// Apply a newly posted status to `zaak`.
///
/// `statustypen` are the status types of the zaak's zaaktype; the posted
/// status type is terminal iff it has the highest volgnummer among them.
pub fn on_status_posted(
  zaak: &Zaak,
  statustype: &StatusType,
  statustypen: &[StatusType],
  datum_status_gezet: DateTime<Utc>,
  archief: Option<ArchiefInput<'_>>,
) -> Result<ClosureResult> {
  if statustype.zaaktype != zaak.zaaktype {
    return Err(
      ValidationFailure::IncompatibleType {
        field: "statustype",
        other: "zaak",
        code:  "zaaktype-mismatch",
      }
      .into(),
    );
  }

  if !statustype.is_eindstatus(statustypen) {
    return Ok(ClosureResult::unchanged(zaak));
  }

  let einddatum = datum_status_gezet.date_naive();

  let Some(ArchiefInput {
    resultaattype,
    brongegevens,
  }) = archief
  else {
    return Ok(ClosureResult {
      state:                      ZaakState::Closed,
      einddatum:                  Some(einddatum),
      archiefnominatie:           zaak.archiefnominatie,
      archiefactiedatum:          None,
      manual_resolution_required: true,
      unresolved:                 Some(UnresolvedSource::NoResultaat),
    });
  };

  let archiefnominatie = zaak
    .archiefnominatie
    .or(Some(resultaattype.archiefnominatie));

  let closure = match compute_archiefactiedatum(
    resultaattype,
    einddatum,
    brongegevens,
  )? {
    ArchiveDerivation::Computed { archiefactiedatum } => ClosureResult {
      state: ZaakState::Closed,
      einddatum: Some(einddatum),
      archiefnominatie,
      archiefactiedatum: Some(archiefactiedatum),
      manual_resolution_required: false,
      unresolved: None,
    },
    ArchiveDerivation::ManualResolutionRequired { unresolved } => {
      ClosureResult {
        state: ZaakState::Closed,
        einddatum: Some(einddatum),
        archiefnominatie,
        archiefactiedatum: None,
        manual_resolution_required: true,
        unresolved: Some(unresolved),
      }
    }
  };
  Ok(closure)
}

/// Reopen a closed zaak. Only reachable through an explicit reopen action.
pub fn reopen(zaak: &Zaak) -> ClosureResult {
  ClosureResult {
    state:                      ZaakState::Open,
    einddatum:                  None,
    archiefnominatie:           zaak.archiefnominatie,
    archiefactiedatum:          None,
    manual_resolution_required: false,
    unresolved:                 None,
  }
}
