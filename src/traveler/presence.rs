use crate::model::{TravelerId, TravelerOutcome};
use crate::state::Station;
use tracing::debug;

/// A traveler's entry in `active_travelers`.
///
/// Created by whoever is about to spawn the traveler, which counts it in.
/// Dropping it counts the traveler out and records its outcome, on every exit
/// path of the actor.
pub struct Presence {
    station: Station,
    traveler: TravelerId,
    outcome: TravelerOutcome,
}

impl Presence {
    pub fn enter(station: &Station, traveler: TravelerId) -> Self {
        station.update(|s| s.traveler_spawned());
        Self {
            station: station.clone(),
            traveler,
            // overwritten by every regular exit
            outcome: TravelerOutcome::Abandoned,
        }
    }

    pub fn record(&mut self, outcome: TravelerOutcome) {
        self.outcome = outcome;
    }
}

impl Drop for Presence {
    fn drop(&mut self) {
        let outcome = self.outcome;
        self.station.update(|s| s.traveler_exited(outcome));
        debug!(traveler = %self.traveler, ?outcome, "Traveler left");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn counts_in_and_out() {
        let station = Station::new(&SimConfig::new(1, 4, 1, 5, 10).unwrap());
        let mut first = Presence::enter(&station, TravelerId(1));
        let second = Presence::enter(&station, TravelerId(2));
        assert_eq!(station.snapshot().active_travelers, 2);

        first.record(TravelerOutcome::Boarded);
        drop(first);
        drop(second);

        let state = station.snapshot();
        assert_eq!(state.active_travelers, 0);
        assert_eq!(state.outcomes.boarded, 1);
        assert_eq!(state.outcomes.abandoned, 1);
    }
}
