//! Unit tests for cdfl-contact.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use cdfl_core::{AgentId, AgentType, AreaId, NodeId, Point};
    use cdfl_mobility::Car;
    use cdfl_spatial::{RoadNetwork, RoadNetworkBuilder};

    /// A parked car at `(lat, lon)`; only position, id, and type matter for
    /// detection.
    pub fn parked(id: u32, agent_type: u16, lat: f64, lon: f64) -> Car {
        Car {
            id:              AgentId(id),
            agent_type:      AgentType(agent_type),
            area:            AreaId::UNRESTRICTED,
            source:          NodeId(0),
            destination:     NodeId(0),
            previous_source: NodeId(0),
            position:        Point::new(lat, lon),
            unit_speed:      0.0,
            heading:         Point::ORIGIN,
        }
    }

    /// Unit square with side 0.001:
    ///
    /// ```text
    /// 1 ─ 2
    /// │   │
    /// 0 ─ 3
    /// ```
    pub fn square() -> Arc<RoadNetwork> {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(0.001, 0.0));
        let n2 = b.add_node(Point::new(0.001, 0.001));
        let n3 = b.add_node(Point::new(0.0, 0.001));
        for (a, c) in [(n0, n1), (n1, n2), (n2, n3), (n3, n0)] {
            b.add_road(a, c);
        }
        Arc::new(b.build().unwrap())
    }
}

// ── ContactEvent ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod event {
    use cdfl_core::{AgentId, Tick};
    use crate::ContactEvent;

    #[test]
    fn endpoints_are_ordered() {
        let e = ContactEvent::new(Tick(3), AgentId(9), AgentId(2));
        assert_eq!((e.a, e.b), (AgentId(2), AgentId(9)));
        assert_eq!(e.other(AgentId(9)), Some(AgentId(2)));
        assert_eq!(e.other(AgentId(4)), None);
        assert_eq!(e.to_string(), "(2, 9)");
    }
}

// ── detect_contacts ───────────────────────────────────────────────────────────

#[cfg(test)]
mod detect {
    use std::collections::HashSet;

    use cdfl_core::{AgentId, Tick};

    use super::helpers::parked;
    use crate::{ConflictPolicy, ContactError, ContactScheduler, Eligibility};

    #[test]
    fn pairs_within_radius_only() {
        let cars = vec![parked(0, 0, 0.0, 0.0), parked(1, 0, 0.0, 0.3), parked(2, 0, 5.0, 5.0)];
        let s = ContactScheduler::new(0.5).unwrap();
        let events = s.detect_contacts(Tick(7), &cars);
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].a, events[0].b, events[0].tick), (AgentId(0), AgentId(1), Tick(7)));
    }

    #[test]
    fn radius_is_inclusive() {
        let cars = vec![parked(0, 0, 0.0, 0.0), parked(1, 0, 0.0, 0.5)];
        let s = ContactScheduler::new(0.5).unwrap();
        assert_eq!(s.detect_contacts(Tick(0), &cars).len(), 1);
    }

    #[test]
    fn last_write_wins_keeps_later_pair() {
        // 0 ─ 1 ─ 2 evenly spaced: candidates (0,1) then (1,2).
        let cars = vec![parked(0, 0, 0.0, 0.0), parked(1, 0, 0.0, 0.4), parked(2, 0, 0.0, 0.8)];
        let s = ContactScheduler::new(0.5).unwrap();
        let events = s.detect_contacts(Tick(0), &cars);
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].a, events[0].b), (AgentId(1), AgentId(2)));
    }

    #[test]
    fn nearest_matches_closest_first() {
        let cars = vec![parked(0, 0, 0.0, 0.0), parked(1, 0, 0.0, 0.4), parked(2, 0, 0.0, 0.8)];
        let s = ContactScheduler::new(0.5).unwrap().with_conflict(ConflictPolicy::Nearest);
        let events = s.detect_contacts(Tick(0), &cars);
        // Equal distances: ids break the tie.
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].a, events[0].b), (AgentId(0), AgentId(1)));

        let cars = vec![parked(0, 0, 0.0, 0.0), parked(1, 0, 0.0, 0.3), parked(2, 0, 0.0, 0.35)];
        let events = s.detect_contacts(Tick(0), &cars);
        assert_eq!((events[0].a, events[0].b), (AgentId(1), AgentId(2)));
    }

    #[test]
    fn compatible_types_only_when_restricted() {
        let cars = vec![parked(0, 1, 0.0, 0.0), parked(1, 2, 0.0, 0.0)];
        let open = ContactScheduler::new(0.1).unwrap();
        let strict = open.clone().with_eligibility(Eligibility::CompatibleTypes);
        assert_eq!(open.detect_contacts(Tick(0), &cars).len(), 1);
        assert!(strict.detect_contacts(Tick(0), &cars).is_empty());

        let cars = vec![parked(0, 0, 0.0, 0.0), parked(1, 2, 0.0, 0.0)];
        assert_eq!(strict.detect_contacts(Tick(0), &cars).len(), 1);
    }

    #[test]
    fn each_agent_at_most_once_per_tick() {
        // A dense 5x5 cluster: everyone is in range of everyone.
        let cars: Vec<_> = (0..25)
            .map(|i| parked(i, 0, (i / 5) as f64 * 0.01, (i % 5) as f64 * 0.01))
            .collect();
        for policy in [ConflictPolicy::LastWriteWins, ConflictPolicy::Nearest] {
            let s = ContactScheduler::new(1.0).unwrap().with_conflict(policy);
            let events = s.detect_contacts(Tick(0), &cars);
            let mut seen = HashSet::new();
            for e in &events {
                assert!(seen.insert(e.a), "{:?} paired twice", e.a);
                assert!(seen.insert(e.b), "{:?} paired twice", e.b);
            }
            assert!(!events.is_empty());
        }
    }

    #[test]
    fn negative_radius_rejected() {
        assert!(matches!(ContactScheduler::new(-1.0), Err(ContactError::InvalidRadius(_))));
        assert!(ContactScheduler::new(f64::NAN).is_err());
    }
}

// ── Rounds & schedules ────────────────────────────────────────────────────────

#[cfg(test)]
mod rounds {
    use cdfl_core::{AgentId, AgentRngs, AgentType, AreaId, NodeId, Round, Tick};
    use cdfl_mobility::{Car, MobilityEngine};

    use crate::{ContactError, ContactEvent, ContactSchedule, ContactScheduler, RoundContacts};

    #[test]
    fn square_graph_cars_meet_within_two_ticks() {
        let net = super::helpers::square();
        let unit_speed = 0.001;
        let car = |id: u32, from: u32, to: u32| Car {
            id:              AgentId(id),
            agent_type:      AgentType::UNRESTRICTED,
            area:            AreaId::UNRESTRICTED,
            source:          NodeId(from),
            destination:     NodeId(to),
            previous_source: NodeId(from),
            position:        net.pos(NodeId(from)),
            unit_speed,
            heading:         Car::heading_between(net.pos(NodeId(from)), net.pos(NodeId(to)), unit_speed),
        };

        // Opposite corners 0 and 2, both driving toward corner 1.
        let mut engine = MobilityEngine::new(net.clone());
        engine.cars = vec![car(0, 0, 1), car(1, 2, 1)];
        let mut rngs = AgentRngs::new(2, 42);

        let scheduler = ContactScheduler::new(0.0005).unwrap();
        let contacts = scheduler.run_round(Round(0), 2, &mut engine, &mut rngs).unwrap();
        let first = contacts.events().next().expect("cars should meet");
        assert!(first.tick <= Tick(1));
        assert_eq!((first.a, first.b), (AgentId(0), AgentId(1)));
    }

    #[test]
    fn round_ticks_are_contiguous() {
        let net = super::helpers::square();
        let mut engine = MobilityEngine::new(net);
        let mut rngs = AgentRngs::new(4, 1);
        engine
            .populate(&[(AgentType::UNRESTRICTED, AreaId::UNRESTRICTED); 4], 0.0002, &mut rngs)
            .unwrap();
        let s = ContactScheduler::new(0.0003).unwrap();
        let rc = s.run_round(Round(3), 10, &mut engine, &mut rngs).unwrap();
        assert_eq!(rc.first_tick, Tick(30));
        assert_eq!(rc.per_tick.len(), 10);
        for (i, tick) in rc.per_tick.iter().enumerate() {
            for e in tick {
                assert_eq!(e.tick, Tick(30 + i as u64));
            }
        }
    }

    #[test]
    fn zero_epoch_rejected() {
        let net = super::helpers::square();
        let mut engine = MobilityEngine::new(net);
        let mut rngs = AgentRngs::new(0, 1);
        let s = ContactScheduler::new(0.1).unwrap();
        assert!(matches!(
            s.run_round(Round(0), 0, &mut engine, &mut rngs),
            Err(ContactError::ZeroEpoch)
        ));
    }

    #[test]
    fn same_seed_same_schedule() {
        let generate = || {
            let net = super::helpers::square();
            let mut engine = MobilityEngine::new(net);
            let mut rngs = AgentRngs::new(6, 2024);
            engine
                .populate(&[(AgentType::UNRESTRICTED, AreaId::UNRESTRICTED); 6], 0.0002, &mut rngs)
                .unwrap();
            let s = ContactScheduler::new(0.0004).unwrap();
            ContactSchedule::generate(&s, 20, 5, &mut engine, &mut rngs).unwrap()
        };
        let first = generate();
        assert_eq!(first, generate());
        assert_eq!(first.rounds.len(), 5);
        assert_eq!(first.round(Round(4)).unwrap().first_tick, Tick(80));
    }

    #[test]
    fn last_partners_overwrite() {
        let rc = RoundContacts {
            round:      Round(0),
            first_tick: Tick(0),
            per_tick:   vec![
                vec![ContactEvent::new(Tick(0), AgentId(0), AgentId(1))],
                vec![ContactEvent::new(Tick(1), AgentId(1), AgentId(2))],
            ],
        };
        let last = rc.last_partners(4);
        assert_eq!(last, vec![Some(AgentId(1)), Some(AgentId(2)), Some(AgentId(1)), None]);
        assert_eq!(rc.len(), 2);
    }
}
