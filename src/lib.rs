//! # Station Simulation
//!
//! > **A capacity-constrained transit station, simulated with Tokio actors.**
//!
//! Vehicle operators, a ticket office, arriving travelers and a controller run
//! as independent tasks. They coordinate only through a shared [`Station`]
//! (one lock, three gates, a change notification) and through typed channels.
//!
//! ## Core Concepts
//!
//! ### Shared state behind one lock
//! Every read-modify-write of the station record happens inside one
//! [`Station::with_lock`] closure. Changes published through
//! [`Station::update`] wake every actor waiting on a [`StationWatch`], which is
//! how waits stay bounded without busy polling.
//!
//! ### Gates as owned passes
//! A [`Gate`](gate::Gate) hands out a [`GatePass`](gate::GatePass); dropping
//! the pass releases the gate, so no early return leaves a gate locked.
//!
//! ### Request/reply over owned channels
//! A ticket reply travels over a oneshot channel created by the traveler that
//! registered, so it can only reach that traveler.
//!
//! ## Module Tour
//!
//! ### 1. The Record ([`state`], [`gate`], [`admission`])
//! Station state, the three gates and the atomic admission protocol.
//!
//! ### 2. The Actors ([`operator`], [`traveler`], [`ticket_office`], [`arrivals`], [`controller`])
//! Each implements [`Actor`](framework::Actor) and is spawned through an
//! [`ActorSet`](framework::ActorSet).
//!
//! ### 3. The Interface ([`clients`])
//! [`TicketClient`](clients::TicketClient) and
//! [`ControlClient`](clients::ControlClient) hide the message passing.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`StationSystem`](lifecycle::StationSystem) creates the station, spawns
//! every actor, joins them and releases the station exactly once.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- 2 10 2 5 20 --time-unit-ms 100
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```
//!
//! [`Station`]: state::Station
//! [`Station::with_lock`]: state::Station::with_lock
//! [`Station::update`]: state::Station::update
//! [`StationWatch`]: state::StationWatch

pub mod admission;
pub mod arrivals;
pub mod clients;
pub mod config;
pub mod controller;
pub mod error;
pub mod framework;
pub mod gate;
pub mod lifecycle;
pub mod model;
pub mod operator;
pub mod state;
pub mod ticket_office;
pub mod traveler;
