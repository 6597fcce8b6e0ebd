//! # station-sim
//!
//! Runs one simulation of the station and prints how it went.
//!
//! ```bash
//! # 2 operators, 10 seats, 2 cargo slots, 5 units at the station, 20 travelers
//! RUST_LOG=info station-sim 2 10 2 5 20
//!
//! # fast run with a scripted close and a JSON summary
//! station-sim 3 8 2 4 100 --time-unit-ms 20 --close-after 50 --summary run.json
//! ```

use clap::Parser;
use station_sim::config::{ArrivalMode, ControlSchedule, SimConfig, DEFAULT_SEED};
use station_sim::error::{ConfigError, StationError};
use station_sim::lifecycle::{forward_os_signals, setup_tracing, StationSystem};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// Simulate a capacity-constrained transit station.
#[derive(Debug, Parser)]
#[command(author, version, about, allow_negative_numbers = true)]
struct Args {
    /// Number of vehicle operators (1-100)
    operators: i64,

    /// Seats per vehicle (1-1000)
    max_occupants: i64,

    /// Cargo slots per vehicle (0-100)
    max_cargo: i64,

    /// Time units a vehicle waits at the station (1-3600)
    wait_seconds: i64,

    /// Number of arriving travelers (1-10000)
    total_travelers: i64,

    /// Length of one time unit in milliseconds (1-3600000)
    #[arg(long, default_value_t = 1000)]
    time_unit_ms: u64,

    /// Seed for every random draw of the run
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Send all travelers at a fixed one-unit cadence
    #[arg(long, default_value_t = false)]
    batch: bool,

    /// Force the vehicle at the station to leave after N units
    #[arg(long, value_name = "UNITS")]
    force_departure_after: Option<u32>,

    /// Close the station after N units
    #[arg(long, value_name = "UNITS")]
    close_after: Option<u32>,

    /// Append every log line to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the final report as JSON to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> Result<SimConfig, ConfigError> {
        let mut config = SimConfig::new(
            self.operators,
            self.max_occupants,
            self.max_cargo,
            self.wait_seconds,
            self.total_travelers,
        )?
        .with_time_unit(Duration::from_millis(self.time_unit_ms))
        .with_seed(self.seed)
        .with_schedule(ControlSchedule {
            force_departure_after: self.force_departure_after,
            close_after: self.close_after,
        });
        if self.batch {
            config = config.with_arrivals(ArrivalMode::Batch);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Nothing is created before the configuration is known to be valid
    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = setup_tracing(args.report.as_deref()) {
        eprintln!("error: cannot open report file: {e}");
        return ExitCode::FAILURE;
    }

    match run(config, args.summary).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Simulation failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SimConfig, summary: Option<PathBuf>) -> Result<(), StationError> {
    let system = StationSystem::start(config)?;
    let signals = tokio::spawn(forward_os_signals(system.control()));

    let report = system.wait().await;
    signals.abort();
    let report = report?;

    info!(
        departures = report.departures.len(),
        total_boarded = report.total_boarded,
        boarded = report.outcomes.boarded,
        rejected = report.outcomes.rejected,
        ticket_denied = report.outcomes.ticket_denied,
        abandoned = report.outcomes.abandoned,
        unaccompanied = report.outcomes.unaccompanied,
        oversized = report.outcomes.oversized,
        "Summary"
    );

    if let Some(path) = summary {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "Summary written");
    }
    Ok(())
}
