//! # Vehicle Operator
//!
//! Each operator drives one vehicle around the cycle described by
//! [`OperatorPhase`]. The station gate admits one vehicle at a time; the
//! operator holds it from arrival until its vehicle has left.
//!
//! - **Arriving**: take the station gate, then under the lock either find the
//!   station finished (closing or complete) and terminate, or become the
//!   `current_operator` and reopen boarding (`departing = false`).
//! - **Waiting**: up to `wait_units`, cut short by closing, by a forced
//!   departure aimed at this operator, or by completion. Terminal conditions
//!   are re-read afterwards.
//! - **BoardingClosed**: take both category gates so no admission is in
//!   flight, snapshot and reset the trip, release everything.
//! - **Traveling**: a random number of units away, cut short by closing.
//!
//! Travelers admitted after the station closed never depart; they are
//! reported as `left_aboard`.

mod phase;

pub use phase::OperatorPhase;

use crate::config::{SimConfig, UnitRange};
use crate::error::StationError;
use crate::framework::Actor;
use crate::gate::GatePass;
use crate::model::OperatorId;
use crate::state::{Station, StationState, StationWatch};
use async_trait::async_trait;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, info};

/// The vehicle operator actor.
pub struct VehicleOperator {
    id: OperatorId,
    unit: Duration,
    wait_units: u32,
    travel_units: UnitRange,
    rng: ChaCha8Rng,
    phase: OperatorPhase,
    /// Held while the vehicle is at the station.
    at_station: Option<GatePass>,
    trips: u32,
}

impl VehicleOperator {
    pub fn new(id: OperatorId, config: &SimConfig) -> Self {
        Self {
            id,
            unit: config.time_unit,
            wait_units: config.wait_units,
            travel_units: config.travel_units,
            rng: config.actor_rng(u64::from(id.0)),
            phase: OperatorPhase::Arriving,
            at_station: None,
            trips: 0,
        }
    }

    fn leave_station(&mut self) {
        if let Some(pass) = self.at_station.take() {
            pass.release();
        }
    }

    async fn arrive(&mut self, station: &Station) -> Result<OperatorPhase, StationError> {
        let pass = station.gates().station.acquire().await?;
        let id = self.id;
        let terminal = station.update(|s| {
            if let Some(reason) = s.terminal_reason() {
                return Some(reason);
            }
            s.current_operator = Some(id);
            s.departing = false;
            s.forced_departure = None;
            None
        });
        if let Some(reason) = terminal {
            pass.release();
            info!(?reason, trips = self.trips, "Station finished, not pulling in");
            return Ok(OperatorPhase::Terminated);
        }
        self.at_station = Some(pass);
        info!("Arrived at station");
        Ok(OperatorPhase::Waiting)
    }

    async fn wait_at_station(&mut self, station: &Station, watch: &mut StationWatch) -> OperatorPhase {
        let id = self.id;
        let interrupted = move |s: &StationState| {
            s.is_closing() || s.forced_departure == Some(id) || s.completion_reached()
        };
        let duration = self.unit.saturating_mul(self.wait_units);
        let waited_out = watch.sleep_unless(station, duration, interrupted).await;

        let (terminal, forced, left_aboard) = station.with_lock(|s| {
            let forced = s.forced_departure == Some(id);
            if forced {
                s.forced_departure = None;
            }
            (s.terminal_reason(), forced, s.boarded_this_trip)
        });
        if let Some(reason) = terminal {
            self.leave_station();
            info!(?reason, left_aboard, trips = self.trips, "Terminating at the station");
            return OperatorPhase::Terminated;
        }
        if forced {
            info!("Forced departure");
        } else {
            debug!(waited_out, "Wait over");
        }
        OperatorPhase::BoardingClosed
    }

    async fn depart(&mut self, station: &Station) -> Result<OperatorPhase, StationError> {
        let (no_cargo, cargo) = station.gates().acquire_categories().await?;
        let departure = station.update(|s| s.depart(self.id));
        drop((no_cargo, cargo));
        self.leave_station();
        self.trips += 1;
        info!(
            trip = departure.trip,
            occupants = departure.occupants,
            cargo = departure.cargo,
            "Departed"
        );
        Ok(OperatorPhase::Traveling)
    }

    async fn travel(&mut self, station: &Station, watch: &mut StationWatch) -> OperatorPhase {
        let units = self
            .rng
            .gen_range(self.travel_units.min..=self.travel_units.max);
        debug!(units, "Traveling");
        let closing = |s: &StationState| s.is_closing();
        if !watch.sleep_unless(station, self.unit.saturating_mul(units), closing).await {
            info!(trips = self.trips, "Station closing, not returning");
            return OperatorPhase::Terminated;
        }
        OperatorPhase::Arriving
    }
}

#[async_trait]
impl Actor for VehicleOperator {
    fn kind(&self) -> &'static str {
        "operator"
    }

    fn id(&self) -> Option<u32> {
        Some(self.id.0)
    }

    async fn run(&mut self, station: Station) -> Result<(), StationError> {
        let mut watch = station.watch();
        while !self.phase.is_terminal() {
            let next = match self.phase {
                OperatorPhase::Arriving => self.arrive(&station).await,
                OperatorPhase::Waiting => Ok(self.wait_at_station(&station, &mut watch).await),
                OperatorPhase::BoardingClosed => self.depart(&station).await,
                OperatorPhase::Traveling => Ok(self.travel(&station, &mut watch).await),
                OperatorPhase::Terminated => Ok(OperatorPhase::Terminated),
            };
            let next = match next {
                Ok(next) => next,
                Err(e) => {
                    self.leave_station();
                    self.phase = OperatorPhase::Terminated;
                    return Err(e);
                }
            };
            debug!(from = %self.phase, to = %next, "Phase change");
            self.phase = next;
        }
        Ok(())
    }
}
