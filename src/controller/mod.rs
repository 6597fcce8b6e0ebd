//! # Controller
//!
//! Turns external control signals into station state changes. Signals arrive
//! as [`ControlSignal`] messages from a [`ControlClient`], which the signal
//! forwarder, the [`ControlScript`] and tests all post through.
//!
//! | signal           | effect                                                     |
//! |------------------|------------------------------------------------------------|
//! | `ForceDeparture` | marks the operator at the station for immediate departure |
//! | `CloseStation`   | sets `station_closed` and `shutting_down`                  |
//! | `Interrupt`      | sets `shutting_down` and `station_closed`                  |
//!
//! Every change goes through [`Station::update`], so the operator waiting at
//! the station wakes up as soon as a signal is applied.

mod script;

pub use script::ControlScript;

use crate::clients::ControlClient;
use crate::error::StationError;
use crate::framework::Actor;
use crate::state::Station;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    ForceDeparture,
    CloseStation,
    Interrupt,
}

/// The controller actor.
pub struct Controller {
    receiver: mpsc::Receiver<ControlSignal>,
    poll: Duration,
    handled: u32,
}

/// Creates the controller and the client signals are posted through.
pub fn new(capacity: usize, poll: Duration) -> (Controller, ControlClient) {
    let (sender, receiver) = mpsc::channel(capacity);
    let controller = Controller {
        receiver,
        poll,
        handled: 0,
    };
    (controller, ControlClient::new(sender))
}

impl Controller {
    fn apply(&mut self, station: &Station, signal: ControlSignal) {
        self.handled += 1;
        match signal {
            ControlSignal::ForceDeparture => {
                let target = station.update(|s| {
                    s.forced_departure = s.current_operator;
                    s.current_operator
                });
                match target {
                    Some(operator) => info!(%operator, "Forced departure requested"),
                    None => info!("No vehicle at the station, forced departure ignored"),
                }
            }
            ControlSignal::CloseStation => {
                let operator = station.update(|s| {
                    s.close();
                    s.begin_shutdown();
                    s.current_operator
                });
                info!(?operator, "Station closed");
            }
            ControlSignal::Interrupt => {
                station.update(|s| {
                    s.begin_shutdown();
                    s.close();
                });
                info!("Interrupted, shutting down");
            }
        }
    }
}

#[async_trait]
impl Actor for Controller {
    fn kind(&self) -> &'static str {
        "controller"
    }

    async fn run(&mut self, station: Station) -> Result<(), StationError> {
        let mut watch = station.watch();
        loop {
            let terminal = station.with_lock(|s| s.terminal_reason());
            if let Some(reason) = terminal {
                info!(?reason, handled = self.handled, "Controller stopping");
                break;
            }
            tokio::select! {
                signal = self.receiver.recv() => match signal {
                    Some(signal) => self.apply(&station, signal),
                    None => {
                        info!(handled = self.handled, "Control channel closed");
                        break;
                    }
                },
                _ = watch.changed_within(self.poll) => {}
            }
        }
        self.receiver.close();
        Ok(())
    }
}
