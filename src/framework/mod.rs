//! Actor plumbing shared by every participant of the simulation.
//!
//! # Main Components
//!
//! - [`Actor`] - Trait every simulated participant implements
//! - [`ActorSet`] - Spawns actors inside tracing spans and joins them
//! - [`ActorExit`] - How one actor's run ended
//!
//! # Testing
//!
//! See [`mock`] module for a scripted ticket office to test travelers against.

pub mod actor;
pub mod actor_set;
pub mod mock;

pub use actor::{Actor, ActorExit};
pub use actor_set::ActorSet;
