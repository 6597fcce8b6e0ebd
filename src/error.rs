//! # Station Errors
//!
//! Error types shared by every actor in the simulation. Configuration problems
//! are reported before any shared resource exists; everything else is raised by
//! a running actor and surfaces through its [`ActorExit`](crate::framework::ActorExit).

use crate::ticket_office::TicketError;

/// A startup parameter was missing or outside its accepted range.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {name}: {value} (must be {min}-{max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors raised while the simulation is running.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("gate {0} is closed")]
    GateClosed(&'static str),
    #[error(transparent)]
    Ticket(#[from] TicketError),
    #[error("controller is no longer accepting signals")]
    ControlClosed,
    #[error("actor {actor} failed: {reason}")]
    ActorFailed { actor: String, reason: String },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("summary encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}
