use crate::model::TicketMessage;
use tokio::sync::oneshot;

/// A registration on its way to the ticket office.
///
/// `reply_to` is present exactly when the registration expects an answer
/// (see [`TicketMessage::expects_reply`]); the reply goes back over it to the
/// one traveler that registered.
#[derive(Debug)]
pub struct TicketRequest {
    pub message: TicketMessage,
    pub reply_to: Option<oneshot::Sender<TicketMessage>>,
}
