use super::ControlSignal;
use crate::clients::ControlClient;
use crate::config::ControlSchedule;
use crate::error::StationError;
use crate::framework::Actor;
use crate::state::{Station, StationState};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Posts the signals of a [`ControlSchedule`] once their time has come.
pub struct ControlScript {
    control: Option<ControlClient>,
    /// Offsets from the start of the run, ascending.
    events: Vec<(Duration, ControlSignal)>,
}

impl ControlScript {
    pub fn new(control: ControlClient, schedule: &ControlSchedule, unit: Duration) -> Self {
        let mut events = Vec::new();
        if let Some(after) = schedule.force_departure_after {
            events.push((unit.saturating_mul(after), ControlSignal::ForceDeparture));
        }
        if let Some(after) = schedule.close_after {
            events.push((unit.saturating_mul(after), ControlSignal::CloseStation));
        }
        events.sort_by_key(|(at, _)| *at);
        Self {
            control: Some(control),
            events,
        }
    }
}

#[async_trait]
impl Actor for ControlScript {
    fn kind(&self) -> &'static str {
        "control_script"
    }

    async fn run(&mut self, station: Station) -> Result<(), StationError> {
        let Some(control) = self.control.take() else {
            return Ok(());
        };
        let start = Instant::now();
        let mut watch = station.watch();

        for &(at, signal) in &self.events {
            let remaining = at.saturating_sub(start.elapsed());
            let finished = |s: &StationState| s.terminal_reason().is_some();
            if !watch.sleep_unless(&station, remaining, finished).await {
                debug!("Station finished before the schedule");
                return Ok(());
            }
            info!(?signal, "Posting scheduled signal");
            if control.send(signal).await.is_err() {
                debug!("Controller already gone");
                return Ok(());
            }
        }
        Ok(())
    }
}
