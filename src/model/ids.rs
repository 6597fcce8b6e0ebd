use serde::Serialize;
use std::fmt;

/// Identity of a traveler actor (dependents get their own id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TravelerId(pub u32);

/// Identity of a vehicle operator, `1..=operator_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OperatorId(pub u32);

impl fmt::Display for TravelerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "traveler_{}", self.0)
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operator_{}", self.0)
    }
}

impl From<u32> for TravelerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for OperatorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
