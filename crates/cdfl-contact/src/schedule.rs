//! Contacts grouped by round.

use cdfl_core::{AgentId, AgentRngs, Round, Tick};
use cdfl_mobility::MobilityEngine;

use crate::{ContactEvent, ContactResult, ContactScheduler};

/// All contacts of one round, one list per tick.
///
/// `per_tick[s]` holds the contacts of tick `first_tick + s`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RoundContacts {
    pub round:      Round,
    pub first_tick: Tick,
    pub per_tick:   Vec<Vec<ContactEvent>>,
}

impl RoundContacts {
    /// Every event of the round in tick order.
    pub fn events(&self) -> impl Iterator<Item = &ContactEvent> {
        self.per_tick.iter().flatten()
    }

    /// Total number of contacts in the round.
    pub fn len(&self) -> usize {
        self.per_tick.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The partner of each agent in its last contact of the round.
    ///
    /// Later contacts overwrite earlier ones, so the mapping need not be
    /// symmetric (A's last partner may be B while B's last partner is C).
    pub fn last_partners(&self, num_agents: usize) -> Vec<Option<AgentId>> {
        let mut last = vec![None; num_agents];
        for e in self.events() {
            if let Some(slot) = last.get_mut(e.a.index()) {
                *slot = Some(e.b);
            }
            if let Some(slot) = last.get_mut(e.b.index()) {
                *slot = Some(e.a);
            }
        }
        last
    }
}

/// Contacts for a sequence of rounds.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ContactSchedule {
    pub epoch_time: u32,
    pub rounds:     Vec<RoundContacts>,
}

impl ContactSchedule {
    /// Pre-generate contacts for rounds `0..num_rounds`.
    pub fn generate(
        scheduler:  &ContactScheduler,
        epoch_time: u32,
        num_rounds: u32,
        engine:     &mut MobilityEngine,
        rngs:       &mut AgentRngs,
    ) -> ContactResult<Self> {
        let rounds = (0..num_rounds)
            .map(|r| scheduler.run_round(Round(r), epoch_time, engine, rngs))
            .collect::<ContactResult<Vec<_>>>()?;
        Ok(Self { epoch_time, rounds })
    }

    pub fn round(&self, round: Round) -> Option<&RoundContacts> {
        self.rounds.get(round.0 as usize)
    }

    pub fn total_contacts(&self) -> usize {
        self.rounds.iter().map(RoundContacts::len).sum()
    }
}
