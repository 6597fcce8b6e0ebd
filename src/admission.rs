//! # Admission Protocol
//!
//! One boarding attempt by a traveler (or a parent and dependent crossing
//! together):
//!
//! 1. Acquire the gate matching the party's cargo status.
//! 2. Under the station lock, read the closing flags, `departing`, counters
//!    and limits.
//! 3. Closing → [`AdmissionOutcome::Rejected`].
//! 4. Departure in progress or not enough room → [`AdmissionOutcome::NoRoom`].
//! 5. Otherwise count the party in → [`AdmissionOutcome::Boarded`].
//!
//! The gate is held across steps 2–5, so no other attempt of the same
//! category interleaves between the capacity check and the counter update.
//! The lock alone already makes the check-and-increment atomic; the gate is
//! what lets a departing operator shut out a whole category at once.

use crate::error::StationError;
use crate::model::TravelerId;
use crate::state::Station;
use serde::Serialize;
use tracing::debug;

/// Result of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdmissionOutcome {
    Boarded,
    /// Full or departing; worth retrying on the next cycle.
    NoRoom,
    /// The station is closing; retrying is pointless.
    Rejected,
}

/// Whoever crosses the gate in one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Party {
    pub lead: TravelerId,
    pub dependent: Option<TravelerId>,
    pub has_cargo: bool,
}

impl Party {
    pub fn single(lead: TravelerId, has_cargo: bool) -> Self {
        Self {
            lead,
            dependent: None,
            has_cargo,
        }
    }

    pub fn pair(lead: TravelerId, dependent: TravelerId, has_cargo: bool) -> Self {
        Self {
            lead,
            dependent: Some(dependent),
            has_cargo,
        }
    }

    pub fn seats(&self) -> u32 {
        1 + u32::from(self.dependent.is_some())
    }

    pub fn cargo_units(&self) -> u32 {
        u32::from(self.has_cargo)
    }
}

/// Runs the admission protocol once for `party`.
///
/// # Errors
/// [`StationError::GateClosed`] if the station was torn down while waiting.
pub async fn attempt_admission(
    station: &Station,
    party: &Party,
) -> Result<AdmissionOutcome, StationError> {
    let gate = station.gates().for_cargo(party.has_cargo);
    let pass = gate.acquire().await?;
    let outcome = station.with_lock(|state| state.admit(party));
    pass.release();
    debug!(traveler = %party.lead, seats = party.seats(), ?outcome, "Admission attempt");
    Ok(outcome)
}
