//! Typed handles for talking to the message-driven actors.

pub mod control_client;
pub mod ticket_client;

pub use control_client::*;
pub use ticket_client::*;
