//! Simulation time model.
//!
//! A `Tick` is one simulated second.  Ticks are grouped into fixed-length
//! `Round`s (`epoch_time` ticks each); round `r` covers the half-open tick
//! range `[r * epoch_time, (r + 1) * epoch_time)`.  Cache freshness is
//! measured in whole rounds.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick (one simulated second).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Second within its round.
    #[inline]
    pub fn second_of_round(self, epoch_time: u32) -> u32 {
        (self.0 % epoch_time as u64) as u32
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Round ────────────────────────────────────────────────────────────────────

/// A training/communication round.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round(pub u32);

impl Round {
    pub const ZERO: Round = Round(0);

    #[inline]
    pub fn next(self) -> Round {
        Round(self.0 + 1)
    }

    /// First tick of this round.
    #[inline]
    pub fn first_tick(self, epoch_time: u32) -> Tick {
        Tick(self.0 as u64 * epoch_time as u64)
    }

    /// Rounds elapsed since `stamp`; zero if `stamp` lies in the future.
    #[inline]
    pub fn age_of(self, stamp: Round) -> u32 {
        self.0.saturating_sub(stamp.0)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}
