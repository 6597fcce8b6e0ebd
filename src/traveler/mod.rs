//! # Traveler
//!
//! One traveler's journey, in order:
//!
//! 1. Turned away at once if the station is already closing.
//! 2. Register with the ticket office. Everyone without priority waits for
//!    the reply; a denial or a closing station ends the journey before any
//!    gate is touched.
//! 3. A minor without a guardian is refused once a ticket is granted.
//! 4. A party that could not fit even an empty vehicle gives up.
//! 5. Attempt admission until boarded or rejected, waiting for the next
//!    station change after every "no room".
//!
//! A traveler with a dependent spawns the [`Dependent`] before registering,
//! crosses the gate for both, and hands the dependent its outcome over a
//! oneshot handshake.

mod dependent;
mod presence;

pub use dependent::Dependent;
pub use presence::Presence;

use crate::admission::{attempt_admission, AdmissionOutcome, Party};
use crate::clients::{TicketClient, TicketWait};
use crate::error::StationError;
use crate::framework::{Actor, ActorSet};
use crate::model::{TicketMessage, TravelerOutcome, TravelerProfile};
use crate::state::Station;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// The traveler actor.
pub struct Traveler {
    profile: TravelerProfile,
    tickets: Option<TicketClient>,
    poll: Duration,
    presence: Presence,
}

impl Traveler {
    /// Counts the traveler in; spawn the returned actor right away.
    pub fn enter(
        station: &Station,
        profile: TravelerProfile,
        tickets: TicketClient,
        poll: Duration,
    ) -> Self {
        let presence = Presence::enter(station, profile.id);
        Self {
            profile,
            tickets: Some(tickets),
            poll,
            presence,
        }
    }

    fn party(&self) -> Party {
        match self.profile.dependent {
            Some(dependent) => Party::pair(self.profile.id, dependent, self.profile.has_cargo),
            None => Party::single(self.profile.id, self.profile.has_cargo),
        }
    }

    async fn journey(&mut self, station: &Station) -> Result<TravelerOutcome, StationError> {
        let tickets = self.tickets.take();
        if station.with_lock(|s| s.is_closing()) {
            info!("Station closing, turned away");
            return Ok(TravelerOutcome::Rejected);
        }

        if let Some(tickets) = tickets {
            let pending = match tickets.register(TicketMessage::registration(&self.profile)).await {
                Ok(pending) => pending,
                Err(_) if station.with_lock(|s| s.is_closing()) => {
                    return Ok(TravelerOutcome::Rejected);
                }
                Err(e) => return Err(e.into()),
            };
            drop(tickets);

            if let Some(pending) = pending {
                match pending.wait(station, self.poll).await? {
                    TicketWait::Granted => debug!("Ticket granted"),
                    TicketWait::Denied => {
                        info!("Ticket denied");
                        return Ok(TravelerOutcome::TicketDenied);
                    }
                    TicketWait::Abandoned => {
                        info!("Station closing, stopped waiting for a ticket");
                        return Ok(TravelerOutcome::Abandoned);
                    }
                }
            }
        }

        if self.profile.is_minor() {
            info!(age = self.profile.age, "Unaccompanied minor refused");
            return Ok(TravelerOutcome::UnaccompaniedMinor);
        }

        let party = self.party();
        if !station.with_lock(|s| s.can_ever_fit(&party)) {
            info!(seats = party.seats(), cargo = party.cargo_units(), "Party cannot fit any vehicle");
            return Ok(TravelerOutcome::Oversized);
        }

        let mut watch = station.watch();
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match attempt_admission(station, &party).await? {
                AdmissionOutcome::Boarded => {
                    info!(attempts, seats = party.seats(), cargo = party.has_cargo, "Boarded");
                    return Ok(TravelerOutcome::Boarded);
                }
                AdmissionOutcome::Rejected => {
                    info!(attempts, "Rejected, station closing");
                    return Ok(TravelerOutcome::Rejected);
                }
                AdmissionOutcome::NoRoom => {
                    watch.changed_within(self.poll).await;
                }
            }
        }
    }
}

#[async_trait]
impl Actor for Traveler {
    fn kind(&self) -> &'static str {
        "traveler"
    }

    fn id(&self) -> Option<u32> {
        Some(self.profile.id.0)
    }

    async fn run(&mut self, station: Station) -> Result<(), StationError> {
        debug!(profile = ?self.profile, "Arrived");

        let mut companions = ActorSet::new();
        let mut handshake = None;
        if let (Some(dependent), Some(tickets)) = (self.profile.dependent, self.tickets.as_ref()) {
            let (tx, rx) = oneshot::channel();
            let actor = Dependent::enter(
                &station,
                dependent,
                self.profile.id,
                self.profile.is_priority,
                tickets.clone(),
                rx,
            );
            companions.spawn(actor, station.clone());
            handshake = Some(tx);
        }

        let result = self.journey(&station).await;
        let outcome = match &result {
            Ok(outcome) => *outcome,
            Err(StationError::Ticket(_)) => TravelerOutcome::OfficeUnavailable,
            Err(_) => TravelerOutcome::Abandoned,
        };
        self.presence.record(outcome);

        if let Some(tx) = handshake {
            if tx.send(outcome).is_err() {
                debug!("Dependent already gone");
            }
        }
        for exit in companions.join_all().await {
            if let Err(e) = exit.result {
                warn!(companion = %exit.label, error = %e, "Dependent failed");
            }
        }

        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::framework::mock::MockTicketOffice;
    use crate::model::TravelerId;

    const POLL: Duration = Duration::from_millis(5);

    fn station(max_occupants: i64, max_cargo: i64) -> Station {
        Station::new(&SimConfig::new(1, max_occupants, max_cargo, 5, 10).unwrap())
    }

    async fn run_one(station: &Station, profile: TravelerProfile, tickets: TicketClient) {
        let mut actors = ActorSet::new();
        actors.spawn(Traveler::enter(station, profile, tickets, POLL), station.clone());
        actors.join_all().await;
        // let the mock office catch up with queued registrations
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn priority_traveler_boards_without_a_reply() {
        let station = station(2, 1);
        let mut mock = MockTicketOffice::new();
        mock.expect_registration(TravelerId(1)).without_reply();

        run_one(&station, TravelerProfile::adult(1).with_priority().with_cargo(), mock.client()).await;

        let state = station.snapshot();
        assert_eq!(state.manifest, vec![TravelerId(1)]);
        assert_eq!(state.cargo_this_trip, 1);
        assert_eq!(state.active_travelers, 0);
        assert_eq!(state.outcomes.boarded, 1);
        mock.verify();
    }

    #[tokio::test]
    async fn pair_boards_together_and_dependent_registers() {
        let station = station(2, 1);
        let mut mock = MockTicketOffice::new();
        mock.expect_registration(TravelerId(1)).reply_authorized();
        mock.expect_registration(TravelerId(2)).without_reply();

        let parent = TravelerProfile::adult(1).with_dependent(2).with_cargo();
        run_one(&station, parent, mock.client()).await;

        let state = station.snapshot();
        assert_eq!(state.boarded_this_trip, 2);
        assert_eq!(state.cargo_this_trip, 1);
        assert_eq!(state.outcomes.boarded, 2);
        assert_eq!(state.active_travelers, 0);

        let dependent = mock
            .registrations()
            .into_iter()
            .find(|m| m.traveler_id == TravelerId(2))
            .expect("dependent registered");
        assert!(dependent.is_minor);
        assert!(!dependent.expects_reply());
        mock.verify();
    }

    #[tokio::test]
    async fn pair_never_fits_a_single_seat() {
        let station = station(1, 1);
        let mut mock = MockTicketOffice::new();
        mock.expect_registration(TravelerId(1)).reply_authorized();
        mock.expect_registration(TravelerId(2)).without_reply();

        run_one(&station, TravelerProfile::adult(1).with_dependent(2), mock.client()).await;

        let state = station.snapshot();
        assert_eq!(state.boarded_this_trip, 0);
        assert_eq!(state.outcomes.oversized, 2);
        assert_eq!(state.active_travelers, 0);
        mock.verify();
    }

    #[tokio::test]
    async fn lone_minor_is_refused() {
        let station = station(2, 1);
        let mut mock = MockTicketOffice::new();
        mock.expect_registration(TravelerId(1)).reply_authorized();

        run_one(&station, TravelerProfile::minor(1), mock.client()).await;

        let state = station.snapshot();
        assert_eq!(state.boarded_this_trip, 0);
        assert_eq!(state.outcomes.unaccompanied, 1);
        mock.verify();
    }
}
