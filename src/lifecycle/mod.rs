//! Startup, shutdown and process-level plumbing of a simulation run.
//!
//! - [`StationSystem`] creates the station, spawns every actor and joins them.
//! - [`setup_tracing`] installs the log subscriber.
//! - [`forward_os_signals`] turns OS signals into control signals.

pub mod signals;
pub mod station_system;
pub mod tracing;

pub use self::signals::forward_os_signals;
pub use self::station_system::{StationSystem, SystemBuilder};
pub use self::tracing::setup_tracing;
