//! cdfl-run — run the cached model-exchange overlay end to end.
//!
//! Loads a [`RunConfig`] (TOML) and a road network (edge CSV, or a synthetic
//! grid), drives every agent with a toy drift trainer, and writes the
//! contact transcripts, cache diagnostics and a JSON summary.
//!
//! ```bash
//! cdfl-run --config run.toml --edges roads.csv --out output/run1
//! RUST_LOG=debug cdfl-run --rounds 20 --seed 7
//! ```

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cdfl_cache::{Artifact, CacheDiagnostics, EvictionPolicy};
use cdfl_contact::{ContactEvent, RoundContacts};
use cdfl_core::{AgentId, AgentType, Point, Round, SimRng, Tick};
use cdfl_mobility::Car;
use cdfl_output::{CsvWriter, OutputWriter, SimOutputObserver, TranscriptWriter, write_configuration};
use cdfl_sim::{RunConfig, SimBuilder, SimObserver, Trainer};
use cdfl_spatial::{DEFAULT_SNAP_TOLERANCE, load_edges_csv};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SPACING: f64 = 0.002;
const GRID_ORIGIN:  Point = Point { lat: 30.69, lon: -88.05 };
const NUM_CLASSES:  usize = 10;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cdfl-run")]
#[command(version, about, long_about = None)]
struct Args {
    /// Run configuration (TOML).  Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Road network edge CSV (`StartLat,StartLong,EndLat,EndLong`).
    /// A synthetic grid is used when omitted.
    #[arg(short, long)]
    edges: Option<PathBuf>,

    /// Intersections per side of the synthetic grid.
    #[arg(long, default_value = "12")]
    grid: u32,

    /// Output directory.
    #[arg(short, long, default_value = "output/cdfl-run")]
    out: PathBuf,

    /// Override `sim.seed`.
    #[arg(long)]
    seed: Option<u64>,

    /// Override `sim.num_rounds`.
    #[arg(long)]
    rounds: Option<u32>,

    /// Parameters per artifact.
    #[arg(long, default_value = "16")]
    params: usize,

    /// Fraction of the distance to its local optimum an agent covers per round.
    #[arg(long, default_value = "0.3")]
    learning_rate: f32,
}

// ── Demo trainer ──────────────────────────────────────────────────────────────

/// Pulls each agent's parameters toward a private target, standing in for
/// local SGD on non-IID data.
struct DriftTrainer {
    targets:     Vec<Vec<f32>>,
    rate:        f32,
    /// Artifacts trained in round 0, before any exchange.
    first_round: Vec<Artifact>,
}

impl DriftTrainer {
    /// Agents of the same type share a target centre; each agent adds its
    /// own noise.
    fn new(types: &[AgentType], params: usize, rate: f32, rng: &mut SimRng) -> Self {
        let max_type = types.iter().map(|t| t.0).max().unwrap_or(0) as usize;
        let centres: Vec<Vec<f32>> = (0..=max_type)
            .map(|_| (0..params).map(|_| rng.gen_range::<f32, _>(-1.0..1.0)).collect())
            .collect();
        let targets = types
            .iter()
            .map(|t| {
                centres[t.0 as usize]
                    .iter()
                    .map(|c| c + rng.gen_range::<f32, _>(-0.1..0.1))
                    .collect()
            })
            .collect();
        Self { targets, rate, first_round: Vec::new() }
    }
}

impl Trainer for DriftTrainer {
    fn train(&mut self, agent: AgentId, round: Round, current: &Artifact) -> Artifact {
        let target = &self.targets[agent.index()];
        let trained: Artifact = current
            .as_slice()
            .iter()
            .zip(target)
            .map(|(&c, &t)| c + self.rate * (t - c))
            .collect::<Vec<f32>>()
            .into();
        if round == Round::ZERO {
            self.first_round.push(trained.clone());
        }
        trained
    }
}

/// Synthetic label histograms: each type favours a few classes.
fn label_counts(types: &[AgentType], rng: &mut SimRng) -> Vec<Vec<f64>> {
    types
        .iter()
        .map(|t| {
            (0..NUM_CLASSES)
                .map(|c| {
                    let favoured = c % 3 == t.0 as usize % 3;
                    let base = if favoured { 200.0 } else { 20.0 };
                    base + rng.gen_range::<f64, _>(0.0..10.0).floor()
                })
                .collect()
        })
        .collect()
}

// ── Observer wrapper for run statistics ──────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    contacts:      usize,
    busiest_round: (Round, usize),
    final_entries: usize,
    final_age:     f64,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self {
            inner,
            contacts:      0,
            busiest_round: (Round::ZERO, 0),
            final_entries: 0,
            final_age:     0.0,
        }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_sim_start(&mut self, cars: &[Car]) {
        self.inner.on_sim_start(cars);
    }

    fn on_round_start(&mut self, round: Round) {
        self.inner.on_round_start(round);
    }

    fn on_tick_contacts(&mut self, tick: Tick, contacts: &[ContactEvent]) {
        self.contacts += contacts.len();
        self.inner.on_tick_contacts(tick, contacts);
    }

    fn on_round_end(&mut self, round: Round, contacts: &RoundContacts, diag: &CacheDiagnostics) {
        if contacts.len() > self.busiest_round.1 {
            self.busiest_round = (round, contacts.len());
        }
        self.final_entries = diag.total_entries;
        self.final_age = diag.mean_age;
        self.inner.on_round_end(round, contacts, diag);
    }

    fn on_sim_end(&mut self, rounds_run: Round) {
        self.inner.on_sim_end(rounds_run);
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RunSummary {
    seed:                 u64,
    agents:               usize,
    rounds:               u32,
    nodes:                usize,
    roads:                usize,
    policy:               &'static str,
    total_contacts:       usize,
    busiest_round:        u32,
    busiest_round_pairs:  usize,
    final_cache_entries:  usize,
    final_mean_age:       f64,
    initial_spread:       f64,
    final_spread:         f64,
    elapsed_secs:         f64,
}

/// Mean Euclidean distance of every artifact from the population mean.
fn spread(artifacts: &[Artifact]) -> f64 {
    let Some(dim) = artifacts.first().map(Artifact::len) else {
        return 0.0;
    };
    let n = artifacts.len() as f64;
    let mut mean = vec![0.0f64; dim];
    for a in artifacts {
        for (m, &x) in mean.iter_mut().zip(a.as_slice()) {
            *m += x as f64 / n;
        }
    }
    artifacts
        .iter()
        .map(|a| {
            a.as_slice()
                .iter()
                .zip(&mean)
                .map(|(&x, m)| (x as f64 - m).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .sum::<f64>()
        / n
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 1. Configuration.
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.sim.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.sim.num_rounds = rounds;
    }
    config.validate()?;
    let n = config.sim.num_agents;

    // 2. Road network.
    let network = match &args.edges {
        Some(path) => load_edges_csv(path, DEFAULT_SNAP_TOLERANCE)
            .with_context(|| format!("loading road network {}", path.display()))?,
        None => {
            warn!(side = args.grid, "no edge file given, using a synthetic grid");
            network::build_grid(args.grid, GRID_SPACING, GRID_ORIGIN)?
        }
    };
    let (nodes, roads) = (network.node_count(), network.road_count());
    info!(nodes, roads, "road network loaded");

    // 3. Agents: initial models, weights, label histograms, trainer.
    let types = config.agent_types();
    let mut rng = SimRng::new(config.sim.seed);
    let mut trainer = DriftTrainer::new(&types, args.params, args.learning_rate, &mut rng.child(1));
    let labels = label_counts(&types, &mut rng.child(2));
    let weights: Vec<f64> = labels.iter().map(|c| c.iter().sum()).collect();
    let initial = vec![Artifact::zeros(args.params); n];

    let mut builder = SimBuilder::new(config.clone(), network, initial).weights(weights);
    if config.cache.policy.needs_labels() {
        builder = builder.label_counts(labels);
    }
    let mut sim = builder.build()?;

    // 4. Outputs.
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    write_configuration(&args.out, &config)?;
    let inner = SimOutputObserver::new(CsvWriter::new(&args.out)?, &config)
        .with_transcript(TranscriptWriter::new(&args.out)?);
    let mut obs = CountingObserver::new(inner);

    // 5. Run.  Initial spread is taken over the round-0 training output,
    // since every agent starts from zeros.
    let t0 = Instant::now();
    sim.run(&mut trainer, &mut obs)?;
    let elapsed = t0.elapsed();
    let initial_spread = spread(&trainer.first_round);

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "output error");
    }

    // 6. Summary.
    let summary = RunSummary {
        seed:                config.sim.seed,
        agents:              n,
        rounds:              sim.round.0,
        nodes,
        roads,
        policy:              sim.policy.name(),
        total_contacts:      obs.contacts,
        busiest_round:       obs.busiest_round.0.0,
        busiest_round_pairs: obs.busiest_round.1,
        final_cache_entries: obs.final_entries,
        final_mean_age:      obs.final_age,
        initial_spread,
        final_spread:        spread(&sim.artifacts),
        elapsed_secs:        elapsed.as_secs_f64(),
    };
    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(args.out.join("summary.json"), &json)?;
    println!("{json}");

    Ok(())
}
