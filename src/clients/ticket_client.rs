use crate::model::{TicketMessage, TravelerId};
use crate::state::Station;
use crate::ticket_office::{TicketError, TicketRequest};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for registering with the ticket office.
///
/// Every traveler holds a clone only until its registration is sent; the
/// office sees its channel close once the arrival generator and all travelers
/// have dropped theirs.
#[derive(Clone)]
pub struct TicketClient {
    sender: mpsc::Sender<TicketRequest>,
}

/// How a traveler's wait for a ticket ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketWait {
    Granted,
    Denied,
    /// The station started closing before the reply came.
    Abandoned,
}

/// A registration that expects a reply.
#[derive(Debug)]
pub struct PendingTicket {
    traveler: TravelerId,
    reply: oneshot::Receiver<TicketMessage>,
}

impl TicketClient {
    pub fn new(sender: mpsc::Sender<TicketRequest>) -> Self {
        Self { sender }
    }

    /// Sends a registration. Returns the pending reply when the registration
    /// expects one, `None` for priority travelers and dependents.
    ///
    /// # Errors
    /// [`TicketError::OfficeClosed`] when the office no longer accepts
    /// registrations.
    #[instrument(skip(self, message), fields(traveler = %message.traveler_id))]
    pub async fn register(
        &self,
        message: TicketMessage,
    ) -> Result<Option<PendingTicket>, TicketError> {
        debug!("Sending registration");
        let (reply_to, pending) = if message.expects_reply() {
            let (tx, rx) = oneshot::channel();
            let pending = PendingTicket {
                traveler: message.traveler_id,
                reply: rx,
            };
            (Some(tx), Some(pending))
        } else {
            (None, None)
        };
        self.sender
            .send(TicketRequest { message, reply_to })
            .await
            .map_err(|_| TicketError::OfficeClosed)?;
        Ok(pending)
    }
}

impl PendingTicket {
    /// Waits for the reply with no bound.
    pub async fn into_reply(self) -> Result<TicketMessage, TicketError> {
        self.reply.await.map_err(|_| TicketError::ReplyDropped)
    }

    /// Waits for the reply, re-checking the station's closing flags on every
    /// state change and at least once per `poll`.
    ///
    /// # Errors
    /// [`TicketError::ReplyDropped`] if the office went away without
    /// answering while the station is still open.
    pub async fn wait(mut self, station: &Station, poll: Duration) -> Result<TicketWait, TicketError> {
        let mut watch = station.watch();
        loop {
            if station.with_lock(|s| s.is_closing()) {
                return Ok(TicketWait::Abandoned);
            }
            tokio::select! {
                reply = &mut self.reply => {
                    return match reply {
                        Ok(reply) if reply.grants(self.traveler) => Ok(TicketWait::Granted),
                        Ok(_) => Ok(TicketWait::Denied),
                        Err(_) if station.with_lock(|s| s.is_closing()) => Ok(TicketWait::Abandoned),
                        Err(_) => Err(TicketError::ReplyDropped),
                    };
                }
                _ = watch.changed_within(poll) => {}
            }
        }
    }
}
