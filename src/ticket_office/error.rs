/// Failures of the ticket request/reply channel.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TicketError {
    #[error("ticket office is closed")]
    OfficeClosed,
    #[error("ticket office dropped the reply")]
    ReplyDropped,
}
