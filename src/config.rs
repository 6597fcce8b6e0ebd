//! # Simulation Configuration
//!
//! [`SimConfig`] carries the five startup parameters of a run (operators,
//! occupant capacity, cargo capacity, wait time, traveler target) plus the
//! tunables that shape timing and the traveler population.
//!
//! All durations are expressed in *time units*. A unit is one second in a
//! real run; tests shrink it to a few milliseconds so a whole simulation
//! finishes quickly.
//!
//! ## Accepted ranges
//!
//! | parameter        | range     |
//! |------------------|-----------|
//! | operators        | 1–100     |
//! | max occupants    | 1–1000    |
//! | max cargo        | 0–100     |
//! | wait units       | 1–3600    |
//! | total travelers  | 1–10000   |

use crate::error::ConfigError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Seed used when the caller does not provide one.
pub const DEFAULT_SEED: u64 = 42;

/// Longest accepted time unit.
pub const MAX_TIME_UNIT: Duration = Duration::from_secs(3600);

/// Age below which a traveler is a minor.
pub const MINOR_AGE: u8 = 8;

/// An inclusive range of time units, e.g. `3..=9` for travel time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitRange {
    pub min: u32,
    pub max: u32,
}

impl UnitRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// How travelers enter the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalMode {
    /// One traveler every `interval` units, drawn uniformly.
    Random { interval: UnitRange },
    /// The whole target at a fixed one-unit cadence.
    Batch,
}

/// Probabilities shaping the traveler population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelerMix {
    pub priority_chance: f64,
    pub cargo_chance: f64,
    /// Chance that an adult travels with a dependent minor.
    pub dependent_chance: f64,
    /// Ages are drawn from `0..max_age`.
    pub max_age: u8,
}

impl Default for TravelerMix {
    fn default() -> Self {
        Self {
            priority_chance: 0.01,
            cargo_chance: 0.5,
            dependent_chance: 0.2,
            max_age: 80,
        }
    }
}

/// Control signals posted automatically after a number of units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlSchedule {
    pub force_departure_after: Option<u32>,
    pub close_after: Option<u32>,
}

impl ControlSchedule {
    pub fn is_empty(&self) -> bool {
        self.force_departure_after.is_none() && self.close_after.is_none()
    }
}

/// Full configuration of one simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub operators: u32,
    pub max_occupants: u32,
    pub max_cargo: u32,
    pub wait_units: u32,
    pub total_travelers: u32,
    pub time_unit: Duration,
    pub travel_units: UnitRange,
    pub arrivals: ArrivalMode,
    pub mix: TravelerMix,
    pub schedule: ControlSchedule,
    pub seed: u64,
    /// Capacity of the ticket and control channels.
    pub channel_capacity: usize,
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<u32, ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    // min >= 0 for every parameter, so the value fits
    Ok(value as u32)
}

fn check_chance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("probability {value} is outside 0.0-1.0"),
        });
    }
    Ok(())
}

impl SimConfig {
    /// Validates the five startup parameters and fills every tunable with its
    /// default.
    ///
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] naming the first offending parameter.
    pub fn new(
        operators: i64,
        max_occupants: i64,
        max_cargo: i64,
        wait_units: i64,
        total_travelers: i64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            operators: check_range("operator count", operators, 1, 100)?,
            max_occupants: check_range("occupant capacity", max_occupants, 1, 1000)?,
            max_cargo: check_range("cargo capacity", max_cargo, 0, 100)?,
            wait_units: check_range("wait time", wait_units, 1, 3600)?,
            total_travelers: check_range("traveler target", total_travelers, 1, 10_000)?,
            time_unit: Duration::from_secs(1),
            travel_units: UnitRange::new(3, 9),
            arrivals: ArrivalMode::Random {
                interval: UnitRange::new(1, 3),
            },
            mix: TravelerMix::default(),
            schedule: ControlSchedule::default(),
            seed: DEFAULT_SEED,
            channel_capacity: 64,
        })
    }

    pub fn with_time_unit(mut self, unit: Duration) -> Self {
        self.time_unit = unit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_arrivals(mut self, arrivals: ArrivalMode) -> Self {
        self.arrivals = arrivals;
        self
    }

    pub fn with_travel_units(mut self, travel: UnitRange) -> Self {
        self.travel_units = travel;
        self
    }

    pub fn with_mix(mut self, mix: TravelerMix) -> Self {
        self.mix = mix;
        self
    }

    pub fn with_schedule(mut self, schedule: ControlSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Re-checks the tunables after the builder methods have run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_unit.is_zero() {
            return Err(ConfigError::Invalid {
                name: "time unit",
                reason: "must be longer than zero".into(),
            });
        }
        if self.time_unit > MAX_TIME_UNIT {
            return Err(ConfigError::Invalid {
                name: "time unit",
                reason: format!("{:?} is longer than {:?}", self.time_unit, MAX_TIME_UNIT),
            });
        }
        if self.travel_units.min > self.travel_units.max {
            return Err(ConfigError::Invalid {
                name: "travel time",
                reason: format!("{} > {}", self.travel_units.min, self.travel_units.max),
            });
        }
        if let ArrivalMode::Random { interval } = self.arrivals {
            if interval.min > interval.max {
                return Err(ConfigError::Invalid {
                    name: "arrival interval",
                    reason: format!("{} > {}", interval.min, interval.max),
                });
            }
        }
        check_chance("priority chance", self.mix.priority_chance)?;
        check_chance("cargo chance", self.mix.cargo_chance)?;
        check_chance("dependent chance", self.mix.dependent_chance)?;
        if self.mix.max_age == 0 {
            return Err(ConfigError::Invalid {
                name: "max age",
                reason: "must be at least 1".into(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                name: "channel capacity",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Converts a number of time units to wall-clock time, saturating at
    /// [`Duration::MAX`].
    pub fn units(&self, n: u32) -> Duration {
        self.time_unit.checked_mul(n).unwrap_or(Duration::MAX)
    }

    /// Private random stream for one actor. Same seed and stream, same draws.
    pub fn actor_rng(&self, stream: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream);
        rng
    }

    /// Upper bound on every flag re-check: a tenth of a unit, at least 1ms.
    pub fn poll_interval(&self) -> Duration {
        (self.time_unit / 10).max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        let config = SimConfig::new(1, 1, 0, 1, 1).unwrap();
        assert_eq!(config.max_cargo, 0);
        assert!(config.validate().is_ok());

        let config = SimConfig::new(100, 1000, 100, 3600, 10_000).unwrap();
        assert_eq!(config.total_travelers, 10_000);
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let err = SimConfig::new(0, 10, 2, 5, 20).unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                name: "operator count",
                value: 0,
                min: 1,
                max: 100
            }
        );

        assert!(SimConfig::new(2, -1, 2, 5, 20).is_err());
        assert!(SimConfig::new(2, 10, 101, 5, 20).is_err());
        assert!(SimConfig::new(2, 10, 2, 3601, 20).is_err());
        assert!(SimConfig::new(2, 10, 2, 5, 0).is_err());
    }

    #[test]
    fn rejects_bad_tunables() {
        let config = SimConfig::new(2, 10, 2, 5, 20)
            .unwrap()
            .with_travel_units(UnitRange::new(5, 2));
        assert!(config.validate().is_err());

        let config = SimConfig::new(2, 10, 2, 5, 20).unwrap().with_mix(TravelerMix {
            cargo_chance: 1.5,
            ..TravelerMix::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "cargo chance", .. })
        ));

        let config = SimConfig::new(1, 1, 0, 3600, 1)
            .unwrap()
            .with_time_unit(Duration::from_millis(u64::MAX));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { name: "time unit", .. })
        ));

        let config = SimConfig::new(1, 1, 0, 3600, 1)
            .unwrap()
            .with_time_unit(MAX_TIME_UNIT);
        assert!(config.validate().is_ok());
        assert_eq!(config.units(3600), Duration::from_secs(3600 * 3600));
    }

    #[test]
    fn units_saturate_instead_of_overflowing() {
        let config = SimConfig::new(1, 1, 0, 1, 1)
            .unwrap()
            .with_time_unit(Duration::MAX);
        assert_eq!(config.units(2), Duration::MAX);
    }

    #[test]
    fn poll_interval_never_drops_below_a_millisecond() {
        let config = SimConfig::new(1, 1, 0, 1, 1)
            .unwrap()
            .with_time_unit(Duration::from_millis(5));
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
        assert_eq!(config.units(3), Duration::from_millis(15));
    }

    #[test]
    fn actor_streams_are_reproducible_and_distinct() {
        use rand::Rng;

        let config = SimConfig::new(2, 10, 2, 5, 20).unwrap().with_seed(7);
        let mut first = config.actor_rng(1);
        let a: Vec<u32> = (0..4).map(|_| first.gen()).collect();
        let mut again = config.actor_rng(1);
        let b: Vec<u32> = (0..4).map(|_| again.gen()).collect();
        assert_eq!(a, b);

        let mut other = config.actor_rng(2);
        let c: Vec<u32> = (0..4).map(|_| other.gen()).collect();
        assert_ne!(a, c);
    }
}
