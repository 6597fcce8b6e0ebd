//! # Admission Gates
//!
//! A [`Gate`] is a binary admission point: one holder at a time, everyone else
//! suspends in [`Gate::acquire`]. Possession is a [`GatePass`]; dropping the
//! pass releases the gate, so a holder that bails out early through `?` or a
//! panic never leaves a gate locked.
//!
//! The station has three gates (see [`Gates`]):
//! - `no_cargo` / `cargo` serialize admission attempts of one category, and
//!   are both held by the departing operator to keep admissions out.
//! - `station` is held by an operator for the whole time its vehicle is at
//!   the station.
//!
//! Lock order: `station` before `no_cargo` before `cargo`. Travelers only ever
//! hold a single category gate.

use crate::error::StationError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A binary gate backed by a one-permit semaphore.
#[derive(Debug)]
pub struct Gate {
    name: &'static str,
    permit: Arc<Semaphore>,
}

/// Proof of exclusive possession of a gate. Releases on drop.
#[derive(Debug)]
pub struct GatePass {
    gate: &'static str,
    _permit: OwnedSemaphorePermit,
}

impl GatePass {
    pub fn gate(&self) -> &'static str {
        self.gate
    }

    /// Releases the gate now. Equivalent to dropping the pass.
    pub fn release(self) {}
}

impl Gate {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Suspends until the gate is free and takes it.
    ///
    /// # Errors
    /// [`StationError::GateClosed`] once the station has been torn down.
    pub async fn acquire(&self) -> Result<GatePass, StationError> {
        let permit = self
            .permit
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| StationError::GateClosed(self.name))?;
        Ok(GatePass {
            gate: self.name,
            _permit: permit,
        })
    }

    /// Takes the gate only if nobody holds it.
    pub fn try_acquire(&self) -> Option<GatePass> {
        self.permit
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| GatePass {
                gate: self.name,
                _permit: permit,
            })
    }

    pub fn is_free(&self) -> bool {
        self.permit.available_permits() == 1
    }

    /// Wakes every waiter with [`StationError::GateClosed`]. Used at teardown.
    pub(crate) fn close(&self) {
        self.permit.close();
    }
}

/// The station's three gates.
#[derive(Debug)]
pub struct Gates {
    pub no_cargo: Gate,
    pub cargo: Gate,
    pub station: Gate,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            no_cargo: Gate::new("no_cargo"),
            cargo: Gate::new("cargo"),
            station: Gate::new("station"),
        }
    }
}

impl Gates {
    /// The gate a traveler with or without cargo has to pass.
    pub fn for_cargo(&self, has_cargo: bool) -> &Gate {
        if has_cargo {
            &self.cargo
        } else {
            &self.no_cargo
        }
    }

    /// Takes both category gates in lock order, shutting out every admission.
    pub async fn acquire_categories(&self) -> Result<(GatePass, GatePass), StationError> {
        let no_cargo = self.no_cargo.acquire().await?;
        let cargo = self.cargo.acquire().await?;
        Ok((no_cargo, cargo))
    }

    pub(crate) fn close_all(&self) {
        self.no_cargo.close();
        self.cargo.close();
        self.station.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn second_acquire_waits_for_release() {
        let gate = Arc::new(Gate::new("test"));
        let pass = gate.acquire().await.unwrap();
        assert!(!gate.is_free());
        assert!(gate.try_acquire().is_none());

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.acquire().await.map(|p| p.gate()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        pass.release();
        assert_eq!(waiter.await.unwrap().unwrap(), "test");
        assert!(gate.is_free());
    }

    #[tokio::test]
    async fn closed_gate_fails_waiters() {
        let gates = Gates::default();
        let _held = gates.station.acquire().await.unwrap();
        gates.close_all();
        assert!(matches!(
            gates.station.acquire().await,
            Err(StationError::GateClosed("station"))
        ));
    }

    #[tokio::test]
    async fn category_gates_follow_cargo_status() {
        let gates = Gates::default();
        assert_eq!(gates.for_cargo(true).name(), "cargo");
        assert_eq!(gates.for_cargo(false).name(), "no_cargo");

        let (a, b) = gates.acquire_categories().await.unwrap();
        assert!(!gates.no_cargo.is_free() && !gates.cargo.is_free());
        drop((a, b));
        assert!(gates.no_cargo.is_free() && gates.cargo.is_free());
    }
}
