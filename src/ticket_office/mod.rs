//! # Ticket Office
//!
//! Travelers that are neither priority nor dependents must be authorized
//! before they approach a gate:
//!
//! 1. The traveler sends a registration through its
//!    [`TicketClient`](crate::clients::TicketClient).
//! 2. The office answers every registration that expects a reply, over a
//!    reply channel owned by that traveler alone. Priority travelers and
//!    dependents register too, but are never answered.
//! 3. The traveler waits for its reply, bounded by the station's closing
//!    flags (see [`PendingTicket`](crate::clients::PendingTicket)).
//!
//! Who gets a ticket is decided by a [`TicketPolicy`]; a real run uses
//! [`IssueAll`].

mod error;
mod message;
mod office;
mod policy;

pub use error::TicketError;
pub use message::TicketRequest;
pub use office::TicketOffice;
pub use policy::{IssueAll, TicketPolicy};

use crate::clients::TicketClient;
use std::time::Duration;
use tokio::sync::mpsc;

/// Creates the office and the client travelers register through.
///
/// `poll` bounds how long the office waits for a registration before it
/// re-checks its exit condition.
pub fn new(
    capacity: usize,
    policy: Box<dyn TicketPolicy>,
    poll: Duration,
) -> (TicketOffice, TicketClient) {
    let (sender, receiver) = mpsc::channel(capacity);
    let office = TicketOffice::new(receiver, policy, poll);
    (office, TicketClient::new(sender))
}
