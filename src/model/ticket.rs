use crate::model::{TravelerId, TravelerProfile};

/// Distinguishes a registration from the office's answer to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Registration,
    Reply,
}

/// The message exchanged with the ticket office.
///
/// A reply carries the `traveler_id` of the registration it answers and is
/// delivered to that traveler only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketMessage {
    pub kind: TicketKind,
    pub traveler_id: TravelerId,
    pub is_priority: bool,
    pub has_cargo: bool,
    pub is_minor: bool,
    /// Sent by a minor crossing with a guardian.
    pub is_dependent: bool,
    pub authorized: bool,
}

impl TicketMessage {
    /// Registration for a traveler arriving on their own.
    pub fn registration(profile: &TravelerProfile) -> Self {
        Self {
            kind: TicketKind::Registration,
            traveler_id: profile.id,
            is_priority: profile.is_priority,
            has_cargo: profile.has_cargo,
            is_minor: profile.is_minor(),
            is_dependent: false,
            authorized: profile.is_priority,
        }
    }

    /// Registration for a minor crossing with a guardian. Dependents inherit
    /// the guardian's priority flag and never carry cargo.
    pub fn dependent_registration(id: TravelerId, guardian_is_priority: bool) -> Self {
        Self {
            kind: TicketKind::Registration,
            traveler_id: id,
            is_priority: guardian_is_priority,
            has_cargo: false,
            is_minor: true,
            is_dependent: true,
            authorized: true,
        }
    }

    /// Every registration is answered except those of priority travelers
    /// and dependents. A minor on their own waits for a reply like anyone else.
    pub fn expects_reply(&self) -> bool {
        self.kind == TicketKind::Registration && !self.is_priority && !self.is_dependent
    }

    /// Builds the reply addressed to this registration's traveler.
    pub fn reply(&self, authorized: bool) -> Self {
        Self {
            kind: TicketKind::Reply,
            authorized,
            ..self.clone()
        }
    }

    /// True when this is a reply granting `traveler` a ticket.
    pub fn grants(&self, traveler: TravelerId) -> bool {
        self.kind == TicketKind::Reply && self.traveler_id == traveler && self.authorized
    }
}
