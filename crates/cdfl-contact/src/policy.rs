//! Pairing rules.

use cdfl_core::AgentType;

/// Which pairs in range may exchange artifacts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Eligibility {
    /// Every pair in range.
    #[default]
    Any,
    /// Same type, or either agent is type 0.
    CompatibleTypes,
}

impl Eligibility {
    #[inline]
    pub fn allows(self, x: AgentType, y: AgentType) -> bool {
        match self {
            Eligibility::Any             => true,
            Eligibility::CompatibleTypes => x.compatible(y),
        }
    }
}

/// How to pick one partner per agent when several are in range in the same
/// tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConflictPolicy {
    /// Visit candidate pairs in ascending `(a, b)` order; a later pair
    /// dissolves any earlier pairing of either endpoint.
    #[default]
    LastWriteWins,
    /// Match the closest pairs first (ties by ids).
    Nearest,
}
