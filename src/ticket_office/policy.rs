use crate::model::TicketMessage;

/// Decides whether a registration is granted a ticket.
pub trait TicketPolicy: Send + Sync {
    fn authorize(&self, registration: &TicketMessage) -> bool;
}

/// Grants every registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueAll;

impl TicketPolicy for IssueAll {
    fn authorize(&self, _registration: &TicketMessage) -> bool {
        true
    }
}

impl<F> TicketPolicy for F
where
    F: Fn(&TicketMessage) -> bool + Send + Sync,
{
    fn authorize(&self, registration: &TicketMessage) -> bool {
        self(registration)
    }
}
