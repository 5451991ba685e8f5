//! Unit tests for cdfl-sim.

#[cfg(test)]
mod helpers {
    use cdfl_cache::Artifact;
    use cdfl_core::{AgentId, AgentType, AreaId, NodeId, Point, SimConfig};
    use cdfl_mobility::Car;
    use cdfl_spatial::{RoadNetwork, RoadNetworkBuilder};

    use crate::RunConfig;

    /// Square with side 0.001:
    ///
    /// ```text
    /// 1 ─ 2
    /// │   │
    /// 0 ─ 3
    /// ```
    pub fn square() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0));
        let n1 = b.add_node(Point::new(0.001, 0.0));
        let n2 = b.add_node(Point::new(0.001, 0.001));
        let n3 = b.add_node(Point::new(0.0, 0.001));
        for (a, c) in [(n0, n1), (n1, n2), (n2, n3), (n3, n0)] {
            b.add_road(a, c);
        }
        b.build().unwrap()
    }

    /// `side × side` lattice with spacing 0.001.
    pub fn grid(side: u32) -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        for r in 0..side {
            for c in 0..side {
                b.add_node(Point::new(r as f64 * 0.001, c as f64 * 0.001));
            }
        }
        let id = |r: u32, c: u32| NodeId(r * side + c);
        for r in 0..side {
            for c in 0..side {
                if c + 1 < side {
                    b.add_road(id(r, c), id(r, c + 1));
                }
                if r + 1 < side {
                    b.add_road(id(r, c), id(r + 1, c));
                }
            }
        }
        b.build().unwrap()
    }

    /// One unit of speed covers one square side per tick; the contact
    /// radius is half a side.
    pub fn config(num_agents: usize, num_rounds: u32, epoch_time: u32) -> RunConfig {
        RunConfig {
            sim: SimConfig {
                seed: 42,
                num_agents,
                num_rounds,
                epoch_time,
                speed: 100.0,
                communication_distance: 50.0,
                coord_scale: 1e-5,
                ..SimConfig::default()
            },
            ..RunConfig::default()
        }
    }

    pub fn scalars(values: &[f32]) -> Vec<Artifact> {
        values.iter().map(|&v| Artifact::new(vec![v])).collect()
    }

    /// Car `id` standing on node `from` and driving toward `to`.
    pub fn car_on(net: &RoadNetwork, id: u32, from: u32, to: u32, unit_speed: f64) -> Car {
        let (p, q) = (net.pos(NodeId(from)), net.pos(NodeId(to)));
        Car {
            id:              AgentId(id),
            agent_type:      AgentType::UNRESTRICTED,
            area:            AreaId::UNRESTRICTED,
            source:          NodeId(from),
            destination:     NodeId(to),
            previous_source: NodeId(from),
            position:        p,
            unit_speed,
            heading:         Car::heading_between(p, q, unit_speed),
        }
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use cdfl_cache::Artifact;
    use cdfl_core::{AgentType, AreaId, Round};

    use super::helpers::{config, grid, scalars, square};
    use crate::{SimBuilder, SimError, TypeBlock};

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = SimBuilder::new(config(4, 1, 5), square(), scalars(&[0.0; 4])).build().unwrap();
        assert_eq!(sim.mobility.len(), 4);
        assert_eq!(sim.tables.len(), 4);
        assert_eq!(sim.round, Round::ZERO);
        assert!(sim.weights.iter().all(|&w| w == 1.0));
        assert!(sim.tables.iter().all(|t| t.is_empty() && t.capacity == 3));
    }

    #[test]
    fn artifact_count_mismatch_errors() {
        let err = SimBuilder::new(config(4, 1, 5), square(), scalars(&[0.0; 3])).build().err().expect("build should fail");
        assert!(matches!(
            err,
            SimError::AgentCountMismatch { expected: 4, got: 3, what: "initial artifacts" }
        ));
    }

    #[test]
    fn weight_count_mismatch_errors() {
        let err = SimBuilder::new(config(4, 1, 5), square(), scalars(&[0.0; 4]))
            .weights(vec![1.0; 5])
            .build()
            .err()
            .expect("build should fail");
        assert!(matches!(err, SimError::AgentCountMismatch { what: "weights", .. }));
    }

    #[test]
    fn weights_ignored_when_unweighted() {
        let mut cfg = config(2, 1, 5);
        cfg.cache.weighted_aggregation = false;
        let sim = SimBuilder::new(cfg, square(), scalars(&[0.0; 2]))
            .weights(vec![10.0, 20.0])
            .build()
            .unwrap();
        assert_eq!(sim.weights, vec![1.0, 1.0]);
    }

    #[test]
    fn ragged_artifacts_rejected() {
        let models = vec![Artifact::zeros(3), Artifact::zeros(2)];
        let err = SimBuilder::new(config(2, 1, 5), square(), models).build().err().expect("build should fail");
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn distribution_policy_requires_labels() {
        let mut cfg = config(2, 1, 5);
        cfg.cache.policy = cdfl_cache::PolicyConfig::Distribution { decay: 0.9 };
        let err = SimBuilder::new(cfg, square(), scalars(&[0.0; 2])).build().err().expect("build should fail");
        assert!(matches!(err, SimError::Cache(_)));
    }

    #[test]
    fn area_restriction_confines_typed_cars() {
        let mut cfg = config(9, 1, 5);
        cfg.sim.area_restricted = true;
        cfg.sim.num_areas = 3;
        cfg.type_blocks = vec![
            TypeBlock { agent_type: AgentType(1), count: 3 },
            TypeBlock { agent_type: AgentType(2), count: 3 },
            TypeBlock { agent_type: AgentType(3), count: 2 },
        ];
        let sim = SimBuilder::new(cfg, grid(6), scalars(&[0.0; 9])).build().unwrap();

        let net = &sim.mobility.network;
        assert_eq!(net.area_count(), 3);
        for car in &sim.mobility.cars {
            assert_eq!(car.area, car.agent_type.home_area());
            if car.area != AreaId::UNRESTRICTED {
                assert!(net.view(car.area).unwrap().neighbors(car.source).contains(&car.destination));
            }
        }
        // The last agent is not covered by a block.
        assert_eq!(sim.types[8], AgentType::UNRESTRICTED);
    }
}

// ── Round loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use cdfl_cache::{Artifact, CacheDiagnostics};
    use cdfl_contact::{ContactEvent, RoundContacts};
    use cdfl_core::{AgentId, Round, Tick};
    use cdfl_mobility::Car;

    use super::helpers::{car_on, config, grid, scalars, square};
    use crate::{ExchangeMode, IdentityTrainer, NoopObserver, Sim, SimBuilder, SimObserver};

    /// Two cars at opposite corners of the square, both driving toward
    /// corner 1, so they meet on the first tick.
    fn converging(exchange: ExchangeMode, weights: Vec<f64>) -> Sim {
        let mut cfg = config(2, 1, 2);
        cfg.exchange = exchange;
        let mut sim = SimBuilder::new(cfg, square(), scalars(&[0.0, 2.0]))
            .weights(weights)
            .build()
            .unwrap();
        let speed = sim.config.sim.unit_speed();
        let net = sim.mobility.network.clone();
        sim.mobility.cars = vec![car_on(&net, 0, 0, 1, speed), car_on(&net, 1, 2, 1, speed)];
        sim
    }

    #[test]
    fn meeting_cars_cache_each_other() {
        let mut sim = converging(ExchangeMode::Cache, vec![1.0, 1.0]);
        let contacts = sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();

        let first = contacts.events().next().expect("cars should meet");
        assert_eq!(first.tick, Tick(0));
        assert_eq!(sim.tables[0].len(), 1);
        assert_eq!(sim.tables[1].len(), 1);
        assert!(sim.tables[0].contains(AgentId(1)));
        assert!(sim.tables[1].contains(AgentId(0)));
        assert_eq!(sim.tables[0].get(AgentId(1)).unwrap().round_stamp, Round(0));
    }

    #[test]
    fn cached_aggregation_averages_with_peer() {
        let mut sim = converging(ExchangeMode::Cache, vec![1.0, 1.0]);
        sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();
        assert_eq!(sim.artifacts[0].as_slice(), &[1.0]);
        assert_eq!(sim.artifacts[1].as_slice(), &[1.0]);
    }

    #[test]
    fn weighted_aggregation_uses_sample_counts() {
        let mut sim = converging(ExchangeMode::Cache, vec![1.0, 3.0]);
        sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();
        assert_eq!(sim.artifacts[0].as_slice(), &[1.5]);
        assert_eq!(sim.artifacts[1].as_slice(), &[1.5]);
    }

    #[test]
    fn direct_exchange_skips_caches() {
        let mut sim = converging(ExchangeMode::Direct, vec![1.0, 1.0]);
        sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();
        assert!(sim.tables.iter().all(|t| t.is_empty()));
        assert_eq!(sim.artifacts[0].as_slice(), &[1.0]);
        assert_eq!(sim.artifacts[1].as_slice(), &[1.0]);
    }

    #[test]
    fn caches_store_post_training_artifacts() {
        let mut sim = converging(ExchangeMode::Cache, vec![1.0, 1.0]);
        let mut trainer = |_a: AgentId, _r: Round, cur: &Artifact| {
            Artifact::new(cur.as_slice().iter().map(|x| x + 10.0).collect())
        };
        sim.step_round(&mut trainer, &mut NoopObserver).unwrap();
        let cached = &sim.tables[0].get(AgentId(1)).unwrap().artifact;
        assert_eq!(cached.as_slice(), &[12.0]);
        assert_eq!(sim.artifacts[0].as_slice(), &[11.0]);
    }

    #[test]
    fn zero_capacity_never_caches() {
        let mut sim = converging(ExchangeMode::Cache, vec![1.0, 1.0]);
        for t in &mut sim.tables {
            t.capacity = 0;
        }
        sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();
        assert!(sim.tables.iter().all(|t| t.is_empty()));
        assert_eq!(sim.artifacts[0].as_slice(), &[0.0]);
        assert_eq!(sim.artifacts[1].as_slice(), &[2.0]);
    }

    #[test]
    fn run_stops_at_num_rounds() {
        let mut sim = SimBuilder::new(config(5, 4, 3), grid(4), scalars(&[0.0; 5])).build().unwrap();
        sim.run(&mut IdentityTrainer, &mut NoopObserver).unwrap();
        assert_eq!(sim.round, Round(4));
    }

    #[test]
    fn run_rounds_ignores_limit() {
        let mut sim = SimBuilder::new(config(3, 1, 3), grid(4), scalars(&[0.0; 3])).build().unwrap();
        sim.run_rounds(3, &mut IdentityTrainer, &mut NoopObserver).unwrap();
        assert_eq!(sim.round, Round(3));
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        #[derive(Default)]
        struct Counter {
            starts:     usize,
            ticks:      Vec<Tick>,
            round_ends: usize,
            sim_start:  usize,
            sim_end:    Option<Round>,
        }
        impl SimObserver for Counter {
            fn on_sim_start(&mut self, cars: &[Car]) {
                assert_eq!(cars.len(), 3);
                self.sim_start += 1;
            }
            fn on_round_start(&mut self, _r: Round) { self.starts += 1; }
            fn on_tick_contacts(&mut self, t: Tick, _c: &[ContactEvent]) { self.ticks.push(t); }
            fn on_round_end(&mut self, r: Round, c: &RoundContacts, d: &CacheDiagnostics) {
                assert_eq!(c.round, r);
                assert_eq!(d.round, r);
                self.round_ends += 1;
            }
            fn on_sim_end(&mut self, r: Round) { self.sim_end = Some(r); }
        }

        let mut sim = SimBuilder::new(config(3, 2, 4), grid(3), scalars(&[0.0; 3])).build().unwrap();
        let mut obs = Counter::default();
        sim.run(&mut IdentityTrainer, &mut obs).unwrap();

        assert_eq!(obs.sim_start, 1);
        assert_eq!(obs.starts, 2);
        assert_eq!(obs.round_ends, 2);
        assert_eq!(obs.ticks, (0..8).map(Tick).collect::<Vec<_>>());
        assert_eq!(obs.sim_end, Some(Round(2)));
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = || {
            let models = (0..8).map(|i| Artifact::new(vec![i as f32, -(i as f32)])).collect();
            let mut sim = SimBuilder::new(config(8, 5, 10), grid(3), models).build().unwrap();
            let mut contacts = Vec::new();
            for _ in 0..5 {
                let rc = sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();
                contacts.push(rc);
            }
            let positions = sim.mobility.positions();
            (contacts, positions, sim.artifacts)
        };
        let (c1, p1, a1) = run();
        let (c2, p2, a2) = run();
        assert_eq!(c1, c2);
        assert_eq!(p1, p2);
        let flat = |a: &[Artifact]| a.iter().flat_map(|x| x.as_slice().to_vec()).collect::<Vec<_>>();
        assert_eq!(flat(&a1), flat(&a2));
    }

    #[test]
    fn cache_never_exceeds_capacity() {
        let mut cfg = config(12, 6, 10);
        cfg.cache.capacity = 2;
        let mut sim = SimBuilder::new(cfg, grid(3), scalars(&[0.0; 12])).build().unwrap();
        for _ in 0..6 {
            sim.step_round(&mut IdentityTrainer, &mut NoopObserver).unwrap();
            for t in &sim.tables {
                assert!(t.len() <= 2);
                assert!(!t.contains(t.owner));
            }
        }
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use cdfl_cache::PolicyConfig;
    use cdfl_contact::ConflictPolicy;
    use cdfl_core::AgentType;

    use crate::{ExchangeMode, RunConfig, SimError};

    const SAMPLE: &str = r#"
exchange = "direct"
conflict = "nearest"
type_blocks = [
    { agent_type = 1, count = 2 },
    { agent_type = 2, count = 1 },
]

[sim]
seed = 7
num_agents = 4
epoch_time = 30
area_restricted = true
num_areas = 2

[cache]
capacity = 5
kick_out_window = 0
policy = { kind = "distribution", decay = 0.5 }
"#;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(RunConfig::from_toml_str("").unwrap(), RunConfig::default());
    }

    #[test]
    fn parses_full_config() {
        let cfg = RunConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.exchange, ExchangeMode::Direct);
        assert_eq!(cfg.conflict, ConflictPolicy::Nearest);
        assert_eq!(cfg.sim.seed, 7);
        assert_eq!(cfg.sim.epoch_time, 30);
        assert_eq!(cfg.sim.num_rounds, 100);
        assert_eq!(cfg.cache.capacity, 5);
        assert_eq!(cfg.cache.kick_out_window, 0);
        assert_eq!(cfg.cache.policy, PolicyConfig::Distribution { decay: 0.5 });
        assert_eq!(
            cfg.agent_types(),
            vec![AgentType(1), AgentType(1), AgentType(2), AgentType::UNRESTRICTED]
        );
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();
        let cfg = RunConfig::load(f.path()).unwrap();
        assert_eq!(cfg.sim.num_agents, 4);
    }

    #[test]
    fn serialised_config_reloads() {
        let cfg = RunConfig::from_toml_str(SAMPLE).unwrap();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(RunConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn too_many_typed_agents_rejected() {
        let toml = r#"
type_blocks = [{ agent_type = 1, count = 5 }]
[sim]
num_agents = 4
"#;
        assert!(matches!(RunConfig::from_toml_str(toml), Err(SimError::Config(_))));
    }

    #[test]
    fn type_without_area_rejected() {
        let toml = r#"
type_blocks = [{ agent_type = 4, count = 1 }]
[sim]
area_restricted = true
num_areas = 3
"#;
        assert!(matches!(RunConfig::from_toml_str(toml), Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_sim_values_rejected() {
        let toml = "[sim]\nepoch_time = 0\n";
        assert!(matches!(RunConfig::from_toml_str(toml), Err(SimError::Core(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(matches!(RunConfig::from_toml_str("exchange = 3"), Err(SimError::Toml(_))));
    }
}
