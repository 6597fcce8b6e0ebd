use crate::model::{OperatorId, TravelerId};
use serde::Serialize;

/// Snapshot taken when a vehicle leaves the station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    /// 1-based, counted across all operators.
    pub trip: u32,
    pub operator: OperatorId,
    pub occupants: u32,
    pub cargo: u32,
    pub travelers: Vec<TravelerId>,
}

/// How a traveler's journey ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TravelerOutcome {
    Boarded,
    /// Turned away at the gate because the station was closing.
    Rejected,
    TicketDenied,
    /// Gave up while waiting (station closed before a reply or handshake).
    Abandoned,
    UnaccompaniedMinor,
    /// Needs more seats or cargo room than a whole vehicle offers.
    Oversized,
    /// The ticket office stopped before answering.
    OfficeUnavailable,
}

/// Per-outcome counters, one entry per traveler actor (dependents included).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub boarded: u32,
    pub rejected: u32,
    pub ticket_denied: u32,
    pub abandoned: u32,
    pub unaccompanied: u32,
    pub oversized: u32,
    pub office_unavailable: u32,
}

impl OutcomeTally {
    pub fn record(&mut self, outcome: TravelerOutcome) {
        let slot = match outcome {
            TravelerOutcome::Boarded => &mut self.boarded,
            TravelerOutcome::Rejected => &mut self.rejected,
            TravelerOutcome::TicketDenied => &mut self.ticket_denied,
            TravelerOutcome::Abandoned => &mut self.abandoned,
            TravelerOutcome::UnaccompaniedMinor => &mut self.unaccompanied,
            TravelerOutcome::Oversized => &mut self.oversized,
            TravelerOutcome::OfficeUnavailable => &mut self.office_unavailable,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.boarded
            + self.rejected
            + self.ticket_denied
            + self.abandoned
            + self.unaccompanied
            + self.oversized
            + self.office_unavailable
    }
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub departures: Vec<Departure>,
    pub total_boarded: u64,
    /// Travelers admitted to a vehicle that never departed (station closed).
    pub left_aboard: u32,
    pub outcomes: OutcomeTally,
    pub station_closed: bool,
    pub shut_down: bool,
    /// Ended on its own, without a close or an interrupt.
    pub completed: bool,
}

impl SimulationReport {
    /// Sum of occupants over every departure.
    pub fn departed_occupants(&self) -> u64 {
        self.departures.iter().map(|d| u64::from(d.occupants)).sum()
    }
}
