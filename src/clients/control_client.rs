use crate::controller::ControlSignal;
use crate::error::StationError;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Client for posting control signals to the controller.
#[derive(Clone)]
pub struct ControlClient {
    sender: mpsc::Sender<ControlSignal>,
}

impl ControlClient {
    pub fn new(sender: mpsc::Sender<ControlSignal>) -> Self {
        Self { sender }
    }

    /// # Errors
    /// [`StationError::ControlClosed`] once the controller has exited.
    #[instrument(skip(self))]
    pub async fn send(&self, signal: ControlSignal) -> Result<(), StationError> {
        debug!("Posting control signal");
        self.sender
            .send(signal)
            .await
            .map_err(|_| StationError::ControlClosed)
    }

    pub async fn force_departure(&self) -> Result<(), StationError> {
        self.send(ControlSignal::ForceDeparture).await
    }

    pub async fn close_station(&self) -> Result<(), StationError> {
        self.send(ControlSignal::CloseStation).await
    }

    pub async fn interrupt(&self) -> Result<(), StationError> {
        self.send(ControlSignal::Interrupt).await
    }

    /// True once the controller has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
