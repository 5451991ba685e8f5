//! Contact events.

use std::fmt;

use cdfl_core::{AgentId, Tick};

/// Two agents within radio range during one tick.
///
/// Unordered; always stored with `a < b`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactEvent {
    pub tick: Tick,
    pub a:    AgentId,
    pub b:    AgentId,
}

impl ContactEvent {
    pub fn new(tick: Tick, x: AgentId, y: AgentId) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self { tick, a, b }
    }

    /// The other endpoint, or `None` if `agent` is not part of this contact.
    pub fn other(&self, agent: AgentId) -> Option<AgentId> {
        if agent == self.a {
            Some(self.b)
        } else if agent == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn involves(&self, agent: AgentId) -> bool {
        self.a == agent || self.b == agent
    }
}

impl fmt::Display for ContactEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a.0, self.b.0)
    }
}
