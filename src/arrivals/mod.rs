//! # Arrival Generator
//!
//! Spawns the traveler actors. Between two arrivals it sleeps a random
//! interval (or one unit in batch mode), and stops early as soon as the
//! station starts closing. Every traveler is counted into
//! `active_travelers` before its task is spawned. On exit the generator drops
//! its ticket client, publishes `arrivals_finished` and joins every traveler
//! it spawned.
//!
//! The traveler target counts arrivals; a dependent travels on top of its
//! guardian's arrival.

use crate::clients::TicketClient;
use crate::config::{ArrivalMode, SimConfig, TravelerMix};
use crate::error::StationError;
use crate::framework::{Actor, ActorSet};
use crate::model::{TravelerId, TravelerProfile};
use crate::state::{Station, StationState};
use crate::traveler::Traveler;
use async_trait::async_trait;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Random stream reserved for the generator; operators use their own id.
const ARRIVALS_STREAM: u64 = 0;

/// Where the next traveler comes from.
enum Roster {
    Drawn { mix: TravelerMix, remaining: u32 },
    Scripted(VecDeque<TravelerProfile>),
}

/// The arrival generator actor.
pub struct ArrivalGenerator {
    tickets: Option<TicketClient>,
    roster: Roster,
    cadence: ArrivalMode,
    unit: Duration,
    poll: Duration,
    rng: ChaCha8Rng,
    next_id: u32,
}

impl ArrivalGenerator {
    /// Draws `config.total_travelers` travelers from `config.mix`.
    pub fn new(config: &SimConfig, tickets: TicketClient) -> Self {
        let roster = Roster::Drawn {
            mix: config.mix,
            remaining: config.total_travelers,
        };
        Self::with_roster(config, tickets, roster)
    }

    /// Sends exactly `profiles`, in order, at the configured cadence.
    pub fn scripted(config: &SimConfig, tickets: TicketClient, profiles: Vec<TravelerProfile>) -> Self {
        Self::with_roster(config, tickets, Roster::Scripted(profiles.into()))
    }

    fn with_roster(config: &SimConfig, tickets: TicketClient, roster: Roster) -> Self {
        Self {
            tickets: Some(tickets),
            roster,
            cadence: config.arrivals,
            unit: config.time_unit,
            poll: config.poll_interval(),
            rng: config.actor_rng(ARRIVALS_STREAM),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> TravelerId {
        let id = TravelerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn next_profile(&mut self) -> Option<TravelerProfile> {
        match &mut self.roster {
            Roster::Scripted(profiles) => profiles.pop_front(),
            Roster::Drawn { mix, remaining } => {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
                let traits = mix.draw(&mut self.rng);
                let id = self.allocate_id();
                let dependent = traits.brings_dependent.then(|| self.allocate_id());
                Some(TravelerProfile::from_traits(id, traits, dependent))
            }
        }
    }

    fn interval(&mut self) -> Duration {
        match self.cadence {
            ArrivalMode::Random { interval } => {
                self.unit.saturating_mul(self.rng.gen_range(interval.min..=interval.max))
            }
            ArrivalMode::Batch => self.unit,
        }
    }
}

#[async_trait]
impl Actor for ArrivalGenerator {
    fn kind(&self) -> &'static str {
        "arrivals"
    }

    async fn run(&mut self, station: Station) -> Result<(), StationError> {
        let mut travelers = ActorSet::new();
        let mut watch = station.watch();
        let mut spawned = 0u32;

        loop {
            let interval = self.interval();
            let closing = |s: &StationState| s.is_closing();
            if !watch.sleep_unless(&station, interval, closing).await {
                info!(spawned, "Station closing, no more arrivals");
                break;
            }
            let Some(profile) = self.next_profile() else {
                break;
            };
            let Some(tickets) = self.tickets.as_ref() else {
                break;
            };
            debug!(traveler = %profile.id, dependent = ?profile.dependent, "Arrival");
            let traveler = Traveler::enter(&station, profile, tickets.clone(), self.poll);
            travelers.spawn(traveler, station.clone());
            spawned += 1;
        }

        self.tickets = None;
        station.update(|s| s.arrivals_finished = true);
        info!(spawned, "Arrivals finished");

        let failed = travelers
            .join_all()
            .await
            .into_iter()
            .filter(|exit| !exit.is_ok())
            .count();
        if failed > 0 {
            warn!(failed, "Some travelers ended with an error");
        }
        Ok(())
    }
}
