//! Contact detection.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::debug;

use cdfl_core::{AgentId, AgentRngs, Round, Tick};
use cdfl_mobility::{Car, MobilityEngine};

use crate::{ConflictPolicy, ContactError, ContactEvent, ContactResult, Eligibility, RoundContacts};

#[cfg(feature = "fx-hash")]
type PartnerMap = rustc_hash::FxHashMap<AgentId, AgentId>;
#[cfg(not(feature = "fx-hash"))]
type PartnerMap = std::collections::HashMap<AgentId, AgentId>;

// ── R-tree car entry ──────────────────────────────────────────────────────────

struct CarEntry {
    point: [f64; 2],
    id:    AgentId,
}

impl RTreeObject for CarEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CarEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

/// A pair in range before conflict resolution.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    a:       AgentId,
    b:       AgentId,
    dist_sq: f64,
}

// ── ContactScheduler ──────────────────────────────────────────────────────────

/// Detects contacts among cars and drives the mobility engine through whole
/// rounds.
#[derive(Clone, Debug)]
pub struct ContactScheduler {
    /// Radio range in coordinate units (inclusive).
    pub radius:      f64,
    pub eligibility: Eligibility,
    pub conflict:    ConflictPolicy,
}

impl ContactScheduler {
    pub fn new(radius: f64) -> ContactResult<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ContactError::InvalidRadius(radius));
        }
        Ok(Self {
            radius,
            eligibility: Eligibility::Any,
            conflict:    ConflictPolicy::LastWriteWins,
        })
    }

    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn with_conflict(mut self, conflict: ConflictPolicy) -> Self {
        self.conflict = conflict;
        self
    }

    /// Contacts among `cars` at `tick`, sorted by `(a, b)`.  Every car
    /// appears in at most one event.
    pub fn detect_contacts(&self, tick: Tick, cars: &[Car]) -> Vec<ContactEvent> {
        let candidates = self.candidates(cars);
        let pairs = match self.conflict {
            ConflictPolicy::LastWriteWins => resolve_last_write_wins(&candidates),
            ConflictPolicy::Nearest       => resolve_nearest(candidates),
        };
        let mut events: Vec<ContactEvent> =
            pairs.into_iter().map(|(a, b)| ContactEvent::new(tick, a, b)).collect();
        events.sort_unstable();
        events
    }

    /// Eligible pairs within range, ascending by `(a, b)`.
    fn candidates(&self, cars: &[Car]) -> Vec<Candidate> {
        let tree = RTree::bulk_load(
            cars.iter()
                .map(|c| CarEntry { point: c.position.to_array(), id: c.id })
                .collect(),
        );
        let r_sq = self.radius * self.radius;

        let mut out = Vec::new();
        for car in cars {
            let here = car.position.to_array();
            for hit in tree.locate_within_distance(here, r_sq) {
                if hit.id <= car.id {
                    continue;
                }
                let other = &cars[hit.id.index()];
                if !self.eligibility.allows(car.agent_type, other.agent_type) {
                    continue;
                }
                out.push(Candidate { a: car.id, b: hit.id, dist_sq: hit.distance_2(&here) });
            }
        }
        out.sort_unstable_by_key(|c| (c.a, c.b));
        out
    }

    /// Run one round: advance every car one second at a time for
    /// `epoch_time` ticks, detecting contacts after each step.
    pub fn run_round(
        &self,
        round:      Round,
        epoch_time: u32,
        engine:     &mut MobilityEngine,
        rngs:       &mut AgentRngs,
    ) -> ContactResult<RoundContacts> {
        if epoch_time == 0 {
            return Err(ContactError::ZeroEpoch);
        }
        let first = round.first_tick(epoch_time);
        let mut per_tick = Vec::with_capacity(epoch_time as usize);
        for s in 0..epoch_time as u64 {
            engine.step(1.0, rngs)?;
            per_tick.push(self.detect_contacts(first + s, &engine.cars));
        }
        let contacts = RoundContacts { round, first_tick: first, per_tick };
        debug!(round = round.0, contacts = contacts.len(), "round contacts detected");
        Ok(contacts)
    }
}

// ── Conflict resolution ───────────────────────────────────────────────────────

fn resolve_last_write_wins(candidates: &[Candidate]) -> Vec<(AgentId, AgentId)> {
    let mut partner = PartnerMap::default();
    for c in candidates {
        for end in [c.a, c.b] {
            if let Some(old) = partner.remove(&end) {
                partner.remove(&old);
            }
        }
        partner.insert(c.a, c.b);
        partner.insert(c.b, c.a);
    }
    partner.into_iter().filter(|(x, y)| x < y).collect()
}

fn resolve_nearest(mut candidates: Vec<Candidate>) -> Vec<(AgentId, AgentId)> {
    candidates.sort_by(|x, y| {
        x.dist_sq
            .total_cmp(&y.dist_sq)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });
    let mut matched = PartnerMap::default();
    let mut pairs = Vec::new();
    for c in candidates {
        if matched.contains_key(&c.a) || matched.contains_key(&c.b) {
            continue;
        }
        matched.insert(c.a, c.b);
        matched.insert(c.b, c.a);
        pairs.push((c.a, c.b));
    }
    pairs
}
