//! # Spawning and Joining Actors
//!
//! [`ActorSet`] owns the tasks of the actors it spawned. Whoever spawns an
//! actor keeps it in a set and joins the set before exiting, so no task is
//! ever left running unobserved.

use super::actor::{Actor, ActorExit};
use crate::error::StationError;
use crate::state::Station;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};

/// A group of spawned actors.
#[derive(Default)]
pub struct ActorSet {
    tasks: JoinSet<ActorExit>,
}

impl ActorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `actor` on the runtime inside an `actor` span.
    pub fn spawn<A: Actor>(&mut self, mut actor: A, station: Station) {
        let label = actor.label();
        let span = info_span!("actor", name = %label);
        self.tasks.spawn(
            async move {
                info!("Actor started");
                let result = actor.run(station).await;
                match &result {
                    Ok(()) => info!("Actor finished"),
                    Err(e) => warn!(error = %e, "Actor failed"),
                }
                ActorExit { label, result }
            }
            .instrument(span),
        );
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every actor in the set. A task that panicked is reported as
    /// a failed exit instead of propagating the panic.
    pub async fn join_all(mut self) -> Vec<ActorExit> {
        let mut exits = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(exit) => exits.push(exit),
                Err(e) => {
                    error!(error = %e, "Actor task failed");
                    exits.push(ActorExit {
                        label: "unknown".to_string(),
                        result: Err(StationError::ActorFailed {
                            actor: "unknown".to_string(),
                            reason: e.to_string(),
                        }),
                    });
                }
            }
        }
        exits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use async_trait::async_trait;

    struct Counter {
        id: u32,
        fail: bool,
    }

    #[async_trait]
    impl Actor for Counter {
        fn kind(&self) -> &'static str {
            "counter"
        }

        fn id(&self) -> Option<u32> {
            Some(self.id)
        }

        async fn run(&mut self, station: Station) -> Result<(), StationError> {
            station.update(|s| s.active_travelers += 1);
            if self.fail {
                return Err(StationError::GateClosed("test"));
            }
            Ok(())
        }
    }

    struct Panics;

    #[async_trait]
    impl Actor for Panics {
        fn kind(&self) -> &'static str {
            "panics"
        }

        async fn run(&mut self, _station: Station) -> Result<(), StationError> {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn joins_every_spawned_actor() {
        let station = Station::new(&SimConfig::new(1, 1, 0, 1, 1).unwrap());
        let mut set = ActorSet::new();
        set.spawn(Counter { id: 1, fail: false }, station.clone());
        set.spawn(Counter { id: 2, fail: true }, station.clone());
        set.spawn(Panics, station.clone());
        assert_eq!(set.len(), 3);

        let mut exits = set.join_all().await;
        exits.sort_by(|a, b| a.label.cmp(&b.label));
        let labels: Vec<_> = exits.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["counter-1", "counter-2", "unknown"]);
        assert!(exits[0].is_ok());
        assert!(!exits[1].is_ok());
        assert!(matches!(exits[2].result, Err(StationError::ActorFailed { .. })));
        assert_eq!(station.snapshot().active_travelers, 2);
    }
}
