//! # Station State
//!
//! [`StationState`] is the single record every actor coordinates through, and
//! [`Station`] is the cloneable handle that owns it together with the gates.
//!
//! ## Access rules
//!
//! - Every read and every read-modify-write goes through [`Station::with_lock`]
//!   (or [`Station::update`], which additionally wakes waiters). A decision that
//!   needs several fields reads them inside one closure, never across two calls.
//! - `station_closed` and `shutting_down` only ever go from `false` to `true`;
//!   they are private and set through [`StationState::close`] and
//!   [`StationState::begin_shutdown`].
//!
//! ## Waiting for changes
//!
//! Actors never busy-poll. They hold a [`StationWatch`] and call
//! [`StationWatch::changed_within`], which returns as soon as any actor publishes
//! a change through [`Station::update`], or when the bound elapses. Because
//! every wait is bounded, every loop re-checks the closing flags at least once
//! per bound.

use crate::admission::{AdmissionOutcome, Party};
use crate::config::SimConfig;
use crate::gate::Gates;
use crate::model::{
    Departure, OperatorId, OutcomeTally, SimulationReport, TravelerId, TravelerOutcome,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Why an operator (or any other actor) should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    ShuttingDown,
    Closed,
    /// Every traveler is resolved and the vehicle is empty.
    Completed,
}

/// The shared record. Only reachable through [`Station`]'s lock.
#[derive(Debug, Clone)]
pub struct StationState {
    pub max_occupants: u32,
    pub max_cargo: u32,
    pub wait_units: u32,
    pub operator_count: u32,

    pub boarded_this_trip: u32,
    pub cargo_this_trip: u32,
    pub(crate) total_boarded_ever: u64,

    pub departing: bool,
    station_closed: bool,
    shutting_down: bool,

    pub active_travelers: u32,
    pub arrivals_finished: bool,
    pub ticket_office_finished: bool,

    pub current_operator: Option<OperatorId>,
    /// Set by the controller for the operator currently at the station.
    pub forced_departure: Option<OperatorId>,

    /// Travelers admitted since the last departure.
    pub manifest: Vec<TravelerId>,
    pub departures: Vec<Departure>,
    pub outcomes: OutcomeTally,
}

impl StationState {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            max_occupants: config.max_occupants,
            max_cargo: config.max_cargo,
            wait_units: config.wait_units,
            operator_count: config.operators,
            boarded_this_trip: 0,
            cargo_this_trip: 0,
            total_boarded_ever: 0,
            departing: false,
            station_closed: false,
            shutting_down: false,
            active_travelers: 0,
            arrivals_finished: false,
            ticket_office_finished: false,
            current_operator: None,
            forced_departure: None,
            manifest: Vec::new(),
            departures: Vec::new(),
            outcomes: OutcomeTally::default(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.station_closed
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Either flag set: nobody new may approach.
    pub fn is_closing(&self) -> bool {
        self.station_closed || self.shutting_down
    }

    pub fn close(&mut self) {
        self.station_closed = true;
    }

    pub fn begin_shutdown(&mut self) {
        self.shutting_down = true;
    }

    pub fn total_boarded_ever(&self) -> u64 {
        self.total_boarded_ever
    }

    /// Natural end of the run: arrivals and the ticket office are done, no
    /// traveler is alive and nobody is left aboard.
    pub fn completion_reached(&self) -> bool {
        self.arrivals_finished
            && self.ticket_office_finished
            && self.active_travelers == 0
            && self.boarded_this_trip == 0
    }

    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        if self.shutting_down {
            Some(TerminalReason::ShuttingDown)
        } else if self.station_closed {
            Some(TerminalReason::Closed)
        } else if self.completion_reached() {
            Some(TerminalReason::Completed)
        } else {
            None
        }
    }

    /// Whether a party could board an empty vehicle at all.
    pub fn can_ever_fit(&self, party: &Party) -> bool {
        party.seats() <= self.max_occupants && party.cargo_units() <= self.max_cargo
    }

    /// The locked step of the admission protocol: check flags and capacity,
    /// then count the party in.
    pub fn admit(&mut self, party: &Party) -> AdmissionOutcome {
        if self.is_closing() {
            return AdmissionOutcome::Rejected;
        }
        let seats = party.seats();
        let cargo = party.cargo_units();
        if self.departing
            || self.boarded_this_trip + seats > self.max_occupants
            || self.cargo_this_trip + cargo > self.max_cargo
        {
            return AdmissionOutcome::NoRoom;
        }
        self.boarded_this_trip += seats;
        self.cargo_this_trip += cargo;
        self.manifest.push(party.lead);
        self.manifest.extend(party.dependent);
        AdmissionOutcome::Boarded
    }

    /// Closes boarding for `operator`: snapshot and reset the trip counters,
    /// fold the snapshot into the running total, and record the departure.
    pub fn depart(&mut self, operator: OperatorId) -> Departure {
        self.departing = true;
        let departure = Departure {
            trip: self.departures.len() as u32 + 1,
            operator,
            occupants: self.boarded_this_trip,
            cargo: self.cargo_this_trip,
            travelers: std::mem::take(&mut self.manifest),
        };
        self.total_boarded_ever += u64::from(departure.occupants);
        self.boarded_this_trip = 0;
        self.cargo_this_trip = 0;
        if self.current_operator == Some(operator) {
            self.current_operator = None;
        }
        self.departures.push(departure.clone());
        departure
    }

    /// Counts a traveler that is about to be spawned.
    pub fn traveler_spawned(&mut self) {
        self.active_travelers += 1;
    }

    /// Counts a traveler out and records how its journey ended.
    pub fn traveler_exited(&mut self, outcome: TravelerOutcome) {
        match self.active_travelers.checked_sub(1) {
            Some(active) => self.active_travelers = active,
            None => warn!(?outcome, "Traveler exit without a matching spawn"),
        }
        self.outcomes.record(outcome);
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            departures: self.departures.clone(),
            total_boarded: self.total_boarded_ever,
            left_aboard: self.boarded_this_trip,
            outcomes: self.outcomes,
            station_closed: self.station_closed,
            shut_down: self.shutting_down,
            completed: !self.is_closing() && self.completion_reached(),
        }
    }
}

struct Shared {
    state: Mutex<StationState>,
    gates: Gates,
    changed: watch::Sender<u64>,
}

/// Cloneable handle to the station's state, lock and gates.
#[derive(Clone)]
pub struct Station {
    inner: Arc<Shared>,
}

impl Station {
    pub fn new(config: &SimConfig) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            inner: Arc::new(Shared {
                state: Mutex::new(StationState::new(config)),
                gates: Gates::default(),
                changed,
            }),
        }
    }

    /// Runs `f` with the lock held. The lock is released on every exit path;
    /// a panic inside another holder does not poison the station.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut StationState) -> R) -> R {
        let mut guard = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Like [`with_lock`](Self::with_lock), then wakes every [`StationWatch`].
    pub fn update<R>(&self, f: impl FnOnce(&mut StationState) -> R) -> R {
        let result = self.with_lock(f);
        self.inner.changed.send_modify(|version| *version += 1);
        result
    }

    /// A consistent copy of the whole record.
    pub fn snapshot(&self) -> StationState {
        self.with_lock(|state| state.clone())
    }

    pub fn gates(&self) -> &Gates {
        &self.inner.gates
    }

    /// Subscribes to state changes published through [`update`](Self::update).
    pub fn watch(&self) -> StationWatch {
        StationWatch {
            rx: self.inner.changed.subscribe(),
        }
    }

    /// Releases the shared resources. Consumes the handle; any actor still
    /// waiting on a gate fails with [`GateClosed`](crate::error::StationError::GateClosed).
    pub fn teardown(self) {
        self.inner.gates.close_all();
        let holders = Arc::strong_count(&self.inner);
        if holders > 1 {
            debug!(holders, "Station handles still alive at teardown");
        }
        info!("Station resources released");
    }
}

/// Receiver side of the station's change notifications.
pub struct StationWatch {
    rx: watch::Receiver<u64>,
}

impl StationWatch {
    /// Returns `true` when a change was published within `bound`.
    pub async fn changed_within(&mut self, bound: Duration) -> bool {
        matches!(tokio::time::timeout(bound, self.rx.changed()).await, Ok(Ok(())))
    }

    /// Sleeps for `duration` unless `stop` holds first, checking on every
    /// published change. Returns `false` when cut short.
    pub async fn sleep_unless(
        &mut self,
        station: &Station,
        duration: Duration,
        stop: impl Fn(&StationState) -> bool,
    ) -> bool {
        let start = tokio::time::Instant::now();
        // far enough out to never be reached in one run
        let deadline = start
            .checked_add(duration)
            .unwrap_or_else(|| start + Duration::from_secs(100 * 365 * 86_400));
        loop {
            if station.with_lock(|s| stop(&*s)) {
                return false;
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return true;
            }
            self.changed_within(deadline - now).await;
        }
    }
}
