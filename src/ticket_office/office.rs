use super::message::TicketRequest;
use super::policy::TicketPolicy;
use crate::error::StationError;
use crate::framework::Actor;
use crate::state::Station;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The ticket office actor.
///
/// Drains registrations in arrival order and answers every one that expects
/// a reply. Exits when the ticket channel closes, when the station is
/// closing, or once arrivals are finished and no traveler is alive, then
/// publishes `ticket_office_finished`.
pub struct TicketOffice {
    receiver: mpsc::Receiver<TicketRequest>,
    policy: Box<dyn TicketPolicy>,
    poll: Duration,
    registrations: u64,
    issued: u64,
    denied: u64,
}

/// Why the office stopped serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OfficeExit {
    ChannelClosed,
    Closing,
    Drained,
}

impl TicketOffice {
    pub(super) fn new(
        receiver: mpsc::Receiver<TicketRequest>,
        policy: Box<dyn TicketPolicy>,
        poll: Duration,
    ) -> Self {
        Self {
            receiver,
            policy,
            poll,
            registrations: 0,
            issued: 0,
            denied: 0,
        }
    }

    fn handle(&mut self, request: TicketRequest) {
        let TicketRequest { message, reply_to } = request;
        self.registrations += 1;
        info!(
            traveler = %message.traveler_id,
            priority = message.is_priority,
            cargo = message.has_cargo,
            minor = message.is_minor,
            "Registration"
        );

        if !message.expects_reply() {
            return;
        }
        let Some(reply_to) = reply_to else {
            warn!(traveler = %message.traveler_id, "Registration without a reply channel");
            return;
        };

        let authorized = self.policy.authorize(&message);
        if authorized {
            self.issued += 1;
        } else {
            self.denied += 1;
        }
        debug!(traveler = %message.traveler_id, authorized, "Reply");
        if reply_to.send(message.reply(authorized)).is_err() {
            debug!(traveler = %message.traveler_id, "Traveler left before the reply");
        }
    }

    fn exit_condition(station: &Station) -> Option<OfficeExit> {
        station.with_lock(|s| {
            if s.is_closing() {
                Some(OfficeExit::Closing)
            } else if s.arrivals_finished && s.active_travelers == 0 {
                Some(OfficeExit::Drained)
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl Actor for TicketOffice {
    fn kind(&self) -> &'static str {
        "ticket_office"
    }

    async fn run(&mut self, station: Station) -> Result<(), StationError> {
        let mut watch = station.watch();
        let exit = loop {
            if let Some(exit) = Self::exit_condition(&station) {
                break exit;
            }
            tokio::select! {
                request = self.receiver.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break OfficeExit::ChannelClosed,
                },
                _ = watch.changed_within(self.poll) => {}
            }
        };

        // Queued requests are dropped with the receiver, which fails their
        // reply channels and wakes the travelers behind them.
        self.receiver.close();
        station.update(|s| s.ticket_office_finished = true);
        info!(
            ?exit,
            registrations = self.registrations,
            issued = self.issued,
            denied = self.denied,
            "Ticket office closed"
        );
        Ok(())
    }
}
