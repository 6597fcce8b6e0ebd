use super::presence::Presence;
use crate::clients::TicketClient;
use crate::error::StationError;
use crate::framework::Actor;
use crate::model::{TicketMessage, TravelerId, TravelerOutcome};
use crate::state::Station;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, info};

/// A minor traveling with a guardian.
///
/// The dependent registers with the ticket office (never expecting a reply)
/// and then waits for its guardian's handshake. The guardian decides
/// admission for both of them and sends the dependent's outcome; the wait is
/// bounded by the guardian's own journey, which always ends with a handshake
/// or by dropping the sender.
pub struct Dependent {
    id: TravelerId,
    guardian: TravelerId,
    guardian_is_priority: bool,
    tickets: Option<TicketClient>,
    handshake: Option<oneshot::Receiver<TravelerOutcome>>,
    presence: Presence,
}

impl Dependent {
    /// Counts the dependent in; spawn the returned actor right away.
    pub fn enter(
        station: &Station,
        id: TravelerId,
        guardian: TravelerId,
        guardian_is_priority: bool,
        tickets: TicketClient,
        handshake: oneshot::Receiver<TravelerOutcome>,
    ) -> Self {
        Self {
            id,
            guardian,
            guardian_is_priority,
            tickets: Some(tickets),
            handshake: Some(handshake),
            presence: Presence::enter(station, id),
        }
    }
}

#[async_trait]
impl Actor for Dependent {
    fn kind(&self) -> &'static str {
        "dependent"
    }

    fn id(&self) -> Option<u32> {
        Some(self.id.0)
    }

    async fn run(&mut self, _station: Station) -> Result<(), StationError> {
        if let Some(tickets) = self.tickets.take() {
            let registration =
                TicketMessage::dependent_registration(self.id, self.guardian_is_priority);
            if let Err(e) = tickets.register(registration).await {
                debug!(error = %e, "Registration not delivered");
            }
        }

        let Some(handshake) = self.handshake.take() else {
            return Ok(());
        };
        let outcome = match handshake.await {
            Ok(outcome) => outcome,
            Err(_) => TravelerOutcome::Abandoned,
        };
        self.presence.record(outcome);
        info!(guardian = %self.guardian, ?outcome, "Dependent done");
        Ok(())
    }
}
