use std::fmt;

/// Where a vehicle operator is in its cycle.
///
/// ```text
/// Arriving -> Waiting -> BoardingClosed -> Traveling -> Arriving
///     |          |                            |
///     +----------+---------> Terminated <-----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorPhase {
    /// Waiting for the station gate, then taking over the platform.
    Arriving,
    /// At the station, accepting travelers.
    Waiting,
    /// Shutting the category gates and leaving.
    BoardingClosed,
    /// Away from the station.
    Traveling,
    Terminated,
}

impl OperatorPhase {
    pub fn is_terminal(self) -> bool {
        self == OperatorPhase::Terminated
    }
}

impl fmt::Display for OperatorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatorPhase::Arriving => "arriving",
            OperatorPhase::Waiting => "waiting",
            OperatorPhase::BoardingClosed => "boarding_closed",
            OperatorPhase::Traveling => "traveling",
            OperatorPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
