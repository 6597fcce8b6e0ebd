//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the whole simulation.
//!
//! ## Configuration
//!
//! - **Log level** from `RUST_LOG`, `info` when unset
//! - **Compact format** without the module prefix (`with_target(false)`)
//! - **Report file**: with `--report <path>` every line is also appended to a
//!   plain-text file, ANSI colors disabled
//!
//! ## What Gets Traced
//!
//! Every actor runs inside an `actor{name=...}` span, so a line always says
//! who logged it:
//!
//! ```text
//! INFO actor{name=operator-1}: Arrived at station
//! INFO actor{name=traveler-7}: Boarded attempts=1 seats=2 cargo=false
//! INFO actor{name=operator-1}: Departed trip=3 occupants=5 cargo=1
//! INFO actor{name=controller}: Station closed operator=Some(OperatorId(2))
//! ```
//!
//! - `info`: lifecycle transitions (arrivals, boarding, departures, signals)
//! - `debug`: every admission attempt, registration and phase change
//! - `warn`: actors that ended with an error
//!
//! ```bash
//! RUST_LOG=debug station-sim 2 10 2 5 20
//! ```

use crate::error::StationError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Call once, before the simulation starts.
///
/// # Errors
/// [`StationError::Io`] if the report file cannot be opened.
pub fn setup_tracing(report: Option<&Path>) -> Result<(), StationError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_target(false) // the actor span already says who is talking
        .compact();

    let file = match report {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .compact()
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
    Ok(())
}
