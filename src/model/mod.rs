//! Plain data passed between actors: identities, traveler profiles, ticket
//! messages and the end-of-run report.

pub mod ids;
pub mod profile;
pub mod report;
pub mod ticket;

pub use ids::*;
pub use profile::*;
pub use report::*;
pub use ticket::*;
