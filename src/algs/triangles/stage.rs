//! The four-stage protocol as an explicit state value.

use std::fmt;

/// Where a worker is in the protocol. Each superstep consumes one stage and
/// yields the next; `Reconcile` is the last stage that does work.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Publish local degrees to ghost copies.
    #[default]
    Degrees,
    /// Merge ghost degrees, orient edges, publish kept lists.
    Orient,
    /// Merge kept lists, find triangles, return ghost counts to owners.
    Intersect,
    /// Fold returned counts into owned counters.
    Reconcile,
    /// Past the protocol; any trailing round is discarded.
    Drain,
}

impl Stage {
    /// Superstep number of the stage; `Drain` reports 4.
    pub fn index(self) -> usize {
        match self {
            Stage::Degrees => 0,
            Stage::Orient => 1,
            Stage::Intersect => 2,
            Stage::Reconcile => 3,
            Stage::Drain => 4,
        }
    }

    pub fn from_index(i: usize) -> Self {
        match i {
            0 => Stage::Degrees,
            1 => Stage::Orient,
            2 => Stage::Intersect,
            3 => Stage::Reconcile,
            _ => Stage::Drain,
        }
    }

    /// Strictly advances by one; `Drain` is absorbing.
    pub fn next(self) -> Self {
        Stage::from_index(self.index() + 1)
    }

    pub fn is_terminal(self) -> bool {
        self >= Stage::Reconcile
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Degrees => "degrees",
            Stage::Orient => "orient",
            Stage::Intersect => "intersect",
            Stage::Reconcile => "reconcile",
            Stage::Drain => "drain",
        };
        write!(f, "{}({})", name, self.index())
    }
}
