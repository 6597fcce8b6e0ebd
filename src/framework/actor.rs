//! # The Actor Contract
//!
//! Every participant of the simulation (operators, the ticket office, the
//! controller, the arrival generator, travelers) implements [`Actor`]. The
//! trait is deliberately small: an actor has a label for the logs and a `run`
//! method that receives the shared [`Station`] handle when it is spawned.
//!
//! # Architecture Note
//! Actors never hold references to each other. Everything they share goes
//! through the `Station` (state, lock, gates) or through channels handed to
//! them at construction time (ticket and control clients). Spawning goes
//! through [`ActorSet`](super::ActorSet), which wraps every run in a tracing
//! span and logs start and exit the same way for every kind of actor.

use crate::error::StationError;
use crate::state::Station;
use async_trait::async_trait;

/// A separately scheduled unit of the simulation.
#[async_trait]
pub trait Actor: Send + 'static {
    /// Short kind name used in logs, e.g. `"operator"`.
    fn kind(&self) -> &'static str;

    /// Numeric identity within its kind, if the actor has one.
    fn id(&self) -> Option<u32> {
        None
    }

    /// `kind` and `id` joined, e.g. `operator-2`.
    fn label(&self) -> String {
        match self.id() {
            Some(id) => format!("{}-{}", self.kind(), id),
            None => self.kind().to_string(),
        }
    }

    /// Runs the actor to completion.
    ///
    /// Implementations must bound every wait and re-check the station's
    /// closing flags at each bound; there is no external cancellation.
    async fn run(&mut self, station: Station) -> Result<(), StationError>;
}

/// How an actor's run ended.
#[derive(Debug)]
pub struct ActorExit {
    pub label: String,
    pub result: Result<(), StationError>,
}

impl ActorExit {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
