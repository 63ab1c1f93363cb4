//! `tg generate`: deterministic synthetic datasets.
//!
//! Three size tiers, each with a DAG, a cyclic and a mixed graph, written as
//! `<dir>/<tier>/<tier>_<kind>_1.json` in the format `tg analyze` reads.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use taskgraph_core::WeightModel;
use tracing::info;

use crate::config::Config;
use crate::input::{EdgeRecord, GraphDocument};
use crate::output::{OutputMode, emit, heading};

/// Arguments for `tg generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// RNG seed. Overrides `[generate] seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output directory. Overrides `[generate] output_dir`.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only generate one tier.
    #[arg(long, value_enum)]
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl Tier {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Dag,
    Cyclic,
    Mixed,
}

impl Kind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Dag => "dag",
            Self::Cyclic => "cyclic",
            Self::Mixed => "mixed",
        }
    }
}

/// Shape of one generated dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetShape {
    pub tier: Tier,
    pub kind: Kind,
    pub nodes: usize,
    pub edges: usize,
    /// Chance that a sampled back edge is kept. Zero for DAGs.
    pub back_edge_probability: f64,
}

/// The nine datasets, in generation order.
pub const DATASETS: [DatasetShape; 9] = [
    shape(Tier::Small, Kind::Dag, 8, 12, 0.0),
    shape(Tier::Small, Kind::Cyclic, 7, 10, 0.3),
    shape(Tier::Small, Kind::Mixed, 9, 14, 0.2),
    shape(Tier::Medium, Kind::Dag, 15, 25, 0.0),
    shape(Tier::Medium, Kind::Cyclic, 18, 30, 0.4),
    shape(Tier::Medium, Kind::Mixed, 20, 35, 0.3),
    shape(Tier::Large, Kind::Dag, 35, 60, 0.0),
    shape(Tier::Large, Kind::Cyclic, 40, 75, 0.5),
    shape(Tier::Large, Kind::Mixed, 50, 90, 0.4),
];

const fn shape(
    tier: Tier,
    kind: Kind,
    nodes: usize,
    edges: usize,
    back_edge_probability: f64,
) -> DatasetShape {
    DatasetShape {
        tier,
        kind,
        nodes,
        edges,
        back_edge_probability,
    }
}

impl DatasetShape {
    /// Path relative to the output directory.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let tier = self.tier.as_str();
        PathBuf::from(tier).join(format!("{tier}_{}_1.json", self.kind.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

struct EdgeSink {
    edges: Vec<EdgeRecord>,
    seen: HashSet<(usize, usize)>,
}

impl EdgeSink {
    fn new() -> Self {
        Self {
            edges: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Add `u -> v` with a weight in `1..=10` unless the pair already exists.
    fn add(&mut self, rng: &mut StdRng, u: usize, v: usize) {
        if self.seen.insert((u, v)) {
            self.edges.push(EdgeRecord {
                u,
                v,
                w: rng.gen_range(1..=10),
            });
        }
    }

    fn contains(&self, u: usize, v: usize) -> bool {
        self.seen.contains(&(u, v))
    }
}

/// Build one dataset document, drawing from `rng`.
#[must_use]
pub fn generate_document(shape: &DatasetShape, rng: &mut StdRng) -> GraphDocument {
    let mut sink = EdgeSink::new();
    if shape.nodes >= 2 {
        match shape.kind {
            Kind::Dag => fill_dag(&mut sink, rng, shape.nodes, shape.edges),
            Kind::Cyclic | Kind::Mixed => fill_with_back_edges(&mut sink, rng, shape),
        }
    }

    GraphDocument {
        directed: true,
        n: shape.nodes,
        edges: sink.edges,
        source: Some(0),
        weight_model: WeightModel::Edge,
        durations: None,
    }
}

/// Forward edges only (`u < v`), so the result is acyclic.
fn fill_dag(sink: &mut EdgeSink, rng: &mut StdRng, n: usize, target: usize) {
    let capacity = n * (n - 1) / 2;
    let target = target.min(capacity);
    while sink.edges.len() < target {
        let u = rng.gen_range(0..n - 1);
        let v = rng.gen_range(u + 1..n);
        sink.add(rng, u, v);
    }
}

/// A random spanning tree from node 0, then extra edges where back edges
/// (`u > v`) survive with `back_edge_probability`.
fn fill_with_back_edges(sink: &mut EdgeSink, rng: &mut StdRng, shape: &DatasetShape) {
    let n = shape.nodes;
    for child in 1..n {
        let parent = rng.gen_range(0..child);
        sink.add(rng, parent, child);
    }

    let forward_capacity = n * (n - 1) / 2;
    let capacity = if shape.back_edge_probability > 0.0 {
        n * (n - 1)
    } else {
        forward_capacity
    };
    let target = shape.edges.min(capacity);

    while sink.edges.len() < target {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v || sink.contains(u, v) {
            continue;
        }
        if u < v || rng.gen_bool(shape.back_edge_probability) {
            sink.add(rng, u, v);
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GeneratedDataset {
    path: PathBuf,
    tier: Tier,
    kind: Kind,
    nodes: usize,
    edges: usize,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    seed: u64,
    datasets: Vec<GeneratedDataset>,
}

/// Execute `tg generate`.
///
/// # Errors
///
/// Returns an error if a directory or dataset file cannot be written.
pub fn run_generate(
    args: &GenerateArgs,
    config: &Config,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or(config.generate.seed);
    let out_dir = project_root.join(
        args.output_dir
            .as_deref()
            .unwrap_or(&config.generate.output_dir),
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut datasets = Vec::new();

    for shape in DATASETS
        .iter()
        .filter(|shape| args.tier.is_none_or(|tier| tier == shape.tier))
    {
        let doc = generate_document(shape, &mut rng);
        let path = out_dir.join(shape.relative_path());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), nodes = doc.n, edges = doc.edges.len(), "generated dataset");
        datasets.push(GeneratedDataset {
            path,
            tier: shape.tier,
            kind: shape.kind,
            nodes: doc.n,
            edges: doc.edges.len(),
        });
    }

    let payload = GenerateOutput { seed, datasets };
    let pretty = output.is_pretty();
    emit(output, &payload, |p, w| render_generate_human(p, pretty, w))
}

fn render_generate_human(
    payload: &GenerateOutput,
    pretty: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if pretty {
        heading(
            w,
            &format!(
                "Generated {} datasets (seed {})",
                payload.datasets.len(),
                payload.seed
            ),
        )?;
    }
    for d in &payload.datasets {
        writeln!(
            w,
            "{} nodes={} edges={} kind={}",
            d.path.display(),
            d.nodes,
            d.edges,
            d.kind.as_str()
        )?;
    }
    Ok(())
}
