//! `tg analyze`: run the full pipeline over one graph document.
//!
//! 1. Collapse cyclic clusters into strongly connected components.
//! 2. Order the condensation topologically and expand it into a task order.
//! 3. Shortest distances from the source's component across the condensation.
//! 4. Critical path of the condensation.
//! 5. Optional CSV reports.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use taskgraph_core::{
    CriticalPathResult, Graph, GraphError, GraphStats, Metrics, PathResult, SccResult, TopoResult,
    WeightModel, critical_path, find_sccs, shortest_path, topological_sort,
};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::input::load_document;
use crate::output::{ErrorReport, OutputMode, emit, emit_error, field, heading, rule};
use crate::report::{PerformanceInput, ReportPaths, report_basename, write_reports};

/// Arguments for `tg analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Graph document (JSON).
    pub input: PathBuf,

    /// Source node for shortest paths. Overrides the document and config.
    #[arg(short, long)]
    pub source: Option<usize>,

    /// Skip writing CSV reports.
    #[arg(long)]
    pub no_reports: bool,

    /// Directory for CSV reports. Overrides `[reports] directory`.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Results of every stage for one graph.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scc: SccResult,
    pub topo: TopoResult,
    pub task_order: Vec<usize>,
    pub source_component: usize,
    pub shortest: PathResult,
    pub critical: CriticalPathResult,
    pub stats: GraphStats,
}

/// Run the pipeline over `graph`, with shortest paths from `source`.
///
/// Path queries run on the condensation, so cyclic inputs are analyzed
/// rather than rejected.
///
/// # Errors
///
/// Returns [`GraphError::Index`] if `source` is not a node of `graph`, and
/// propagates [`GraphError::Overflow`] from the path engine.
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, source: usize) -> taskgraph_core::Result<Analysis> {
    let scc = find_sccs(graph);
    let source_component = scc.component_of(source)?;
    let condensation = scc.condensation();

    let topo = topological_sort(condensation);
    if topo.has_cycle() {
        return Err(GraphError::Cycle {
            processed: topo.order().len(),
            node_count: condensation.node_count(),
        });
    }
    let task_order = scc.expand_order(topo.order())?;

    let shortest = shortest_path(condensation, source_component)?;
    let critical = critical_path(condensation)?;
    let stats = GraphStats::compute(graph, &scc);

    debug!(
        components = scc.component_count(),
        cycles = scc.cycle_count(),
        critical_length = critical.length(),
        "analysis complete"
    );

    Ok(Analysis {
        scc,
        topo,
        task_order,
        source_component,
        shortest,
        critical,
        stats,
    })
}

// ---------------------------------------------------------------------------
// Output payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    input: String,
    directed: bool,
    weight_model: WeightModel,
    source: usize,
    source_component: usize,
    stats: GraphStats,
    components: Vec<Vec<usize>>,
    component_order: Vec<usize>,
    task_order: Vec<usize>,
    shortest_paths: Vec<ComponentDistance>,
    critical_path: CriticalSummary,
    metrics: AlgorithmMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    reports: Option<ReportPaths>,
}

#[derive(Debug, Serialize)]
struct ComponentDistance {
    component: usize,
    distance: Option<i64>,
    component_path: Vec<usize>,
    node_path: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct CriticalSummary {
    length: i64,
    components: Vec<usize>,
    nodes: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct AlgorithmMetrics {
    scc: Metrics,
    topological_sort: Metrics,
    shortest_path: Metrics,
    critical_path: Metrics,
}

fn build_output(
    input: &Path,
    graph: &Graph,
    source: usize,
    analysis: &Analysis,
) -> taskgraph_core::Result<AnalyzeOutput> {
    let scc = &analysis.scc;

    let mut shortest_paths = Vec::with_capacity(scc.component_count());
    for component in 0..scc.component_count() {
        let component_path = analysis.shortest.reconstruct_path(component)?;
        let node_path = scc.representatives(&component_path)?;
        shortest_paths.push(ComponentDistance {
            component,
            distance: analysis.shortest.distance(component)?,
            component_path,
            node_path,
        });
    }

    let critical_components = analysis.critical.path().to_vec();
    let critical_nodes = scc.representatives(&critical_components)?;

    Ok(AnalyzeOutput {
        input: input.display().to_string(),
        directed: graph.is_directed(),
        weight_model: graph.weight_model(),
        source,
        source_component: analysis.source_component,
        stats: analysis.stats.clone(),
        components: scc.components().to_vec(),
        component_order: analysis.topo.order().to_vec(),
        task_order: analysis.task_order.clone(),
        shortest_paths,
        critical_path: CriticalSummary {
            length: analysis.critical.length(),
            components: critical_components,
            nodes: critical_nodes,
        },
        metrics: AlgorithmMetrics {
            scc: *scc.metrics(),
            topological_sort: *analysis.topo.metrics(),
            shortest_path: *analysis.shortest.metrics(),
            critical_path: *analysis.critical.metrics(),
        },
        reports: None,
    })
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Execute `tg analyze`.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, the graph is invalid,
/// or reports cannot be written.
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &Config,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let doc = load_document(&args.input)?;
    let graph = doc.to_graph()?;
    let source = args
        .source
        .or(doc.source)
        .unwrap_or(config.analysis.default_source);

    let computed = analyze(&graph, source).and_then(|analysis| {
        build_output(&args.input, &graph, source, &analysis).map(|out| (analysis, out))
    });
    let (analysis, mut payload) = match computed {
        Ok(pair) => pair,
        Err(err) => {
            emit_error(output, &ErrorReport::from(&err))?;
            anyhow::bail!("analysis of {} failed: {err}", args.input.display());
        }
    };

    if config.reports.enabled && !args.no_reports {
        let dir = args
            .report_dir
            .clone()
            .unwrap_or_else(|| config.reports.directory.clone());
        let dataset = args.input.display().to_string();
        let performance = PerformanceInput {
            dataset: &dataset,
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            scc: analysis.scc.metrics(),
            topological_sort: analysis.topo.metrics(),
            critical_path: analysis.critical.metrics(),
        };
        payload.reports = Some(write_reports(
            &project_root.join(dir),
            &report_basename(&args.input),
            &performance,
            &analysis.scc,
        )?);
    }

    info!(
        input = %args.input.display(),
        components = analysis.scc.component_count(),
        "analyzed graph"
    );

    let pretty = output.is_pretty();
    emit(output, &payload, |p, w| render_analysis_human(p, pretty, w))
}

// ---------------------------------------------------------------------------
// Human rendering
// ---------------------------------------------------------------------------

fn join(ids: &[usize]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_analysis_human(
    payload: &AnalyzeOutput,
    pretty: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    if pretty {
        render_pretty(payload, w)
    } else {
        render_text(payload, w)
    }
}

fn render_pretty(p: &AnalyzeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    heading(w, &format!("Task graph: {}", p.input))?;
    field(w, "Nodes", p.stats.node_count.to_string())?;
    field(w, "Edges", p.stats.edge_count.to_string())?;
    field(w, "Directed", p.directed.to_string())?;
    field(w, "Weight model", p.weight_model.as_str())?;
    field(
        w,
        "Source",
        format!("{} (component {})", p.source, p.source_component),
    )?;
    writeln!(w)?;

    heading(
        w,
        &format!(
            "Strongly connected components ({}, {} cyclic)",
            p.stats.scc_count, p.stats.cycle_count
        ),
    )?;
    for (id, members) in p.components.iter().enumerate() {
        writeln!(w, "  C{id:<4} size {:<4} [{}]", members.len(), join(members))?;
    }
    writeln!(w)?;

    heading(w, "Order")?;
    field(w, "Components", join(&p.component_order))?;
    field(w, "Tasks", join(&p.task_order))?;
    writeln!(w)?;

    heading(
        w,
        &format!("Shortest paths from component {}", p.source_component),
    )?;
    for entry in &p.shortest_paths {
        match entry.distance {
            Some(distance) => writeln!(
                w,
                "  C{:<4} {:>8}   via [{}]  nodes [{}]",
                entry.component,
                distance,
                join(&entry.component_path),
                join(&entry.node_path)
            )?,
            None => writeln!(w, "  C{:<4} {:>8}", entry.component, "-")?,
        }
    }
    writeln!(w)?;

    heading(w, "Critical path")?;
    field(w, "Length", p.critical_path.length.to_string())?;
    field(w, "Components", join(&p.critical_path.components))?;
    field(w, "Nodes", join(&p.critical_path.nodes))?;

    if let Some(reports) = &p.reports {
        writeln!(w)?;
        heading(w, "Reports")?;
        writeln!(w, "  {}", reports.performance.display())?;
        writeln!(w, "  {}", reports.scc.display())?;
    }
    rule(w)
}

fn render_text(p: &AnalyzeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "graph nodes={} edges={} components={} cyclic={}",
        p.stats.node_count, p.stats.edge_count, p.stats.scc_count, p.stats.cycle_count
    )?;
    for (id, members) in p.components.iter().enumerate() {
        writeln!(w, "component {id} size={} nodes={}", members.len(), join(members))?;
    }
    writeln!(w, "component_order {}", join(&p.component_order))?;
    writeln!(w, "task_order {}", join(&p.task_order))?;
    for entry in &p.shortest_paths {
        match entry.distance {
            Some(distance) => writeln!(
                w,
                "shortest {} distance={distance} path={}",
                entry.component,
                join(&entry.component_path)
            )?,
            None => writeln!(w, "shortest {} unreachable", entry.component)?,
        }
    }
    writeln!(
        w,
        "critical length={} components={} nodes={}",
        p.critical_path.length,
        join(&p.critical_path.components),
        join(&p.critical_path.nodes)
    )?;
    if let Some(reports) = &p.reports {
        writeln!(w, "report {}", reports.performance.display())?;
        writeln!(w, "report {}", reports.scc.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-node cycle {1,2} between a source and a sink.
    fn cyclic_pipeline() -> Graph {
        let mut graph = Graph::new(4, true, WeightModel::Edge);
        for (u, v, w) in [(0, 1, 2), (1, 2, 1), (2, 1, 1), (2, 3, 5)] {
            graph.add_edge(u, v, w).expect("in range");
        }
        graph
    }

    #[test]
    fn analyze_collapses_cycles_before_path_queries() {
        let analysis = analyze(&cyclic_pipeline(), 0).expect("analysis");

        assert_eq!(analysis.scc.components(), &[vec![0], vec![1, 2], vec![3]]);
        assert_eq!(analysis.topo.order(), &[0, 1, 2]);
        assert_eq!(analysis.task_order, vec![0, 1, 2, 3]);
        assert_eq!(analysis.source_component, 0);
        assert_eq!(analysis.shortest.distances(), &[Some(0), Some(2), Some(7)]);
        assert_eq!(analysis.critical.path(), &[0, 1, 2]);
        assert_eq!(analysis.critical.length(), 7);
        assert_eq!(analysis.stats.cycle_count, 1);
    }

    #[test]
    fn analyze_rejects_out_of_range_source() {
        let err = analyze(&cyclic_pipeline(), 9).expect_err("bad source");
        assert!(matches!(err, GraphError::Index { index: 9, .. }));
    }

    #[test]
    fn output_maps_component_paths_to_representatives() {
        let graph = cyclic_pipeline();
        let analysis = analyze(&graph, 0).expect("analysis");
        let out = build_output(Path::new("g.json"), &graph, 0, &analysis).expect("output");

        let last = &out.shortest_paths[2];
        assert_eq!(last.component_path, vec![0, 1, 2]);
        assert_eq!(last.node_path, vec![0, 1, 3]);
        assert_eq!(out.critical_path.nodes, vec![0, 1, 3]);
        assert!(out.reports.is_none());
    }

    #[test]
    fn unreachable_components_have_no_path() {
        let mut graph = Graph::new(3, true, WeightModel::Edge);
        graph.add_edge(1, 2, 4).expect("in range");
        let analysis = analyze(&graph, 1).expect("analysis");
        let out = build_output(Path::new("g.json"), &graph, 1, &analysis).expect("output");

        assert_eq!(out.shortest_paths[0].distance, None);
        assert!(out.shortest_paths[0].component_path.is_empty());
        assert_eq!(out.shortest_paths[1].distance, Some(0));
        assert_eq!(out.shortest_paths[1].component_path, vec![1]);
    }

    #[test]
    fn text_rendering_is_line_oriented() {
        let graph = cyclic_pipeline();
        let analysis = analyze(&graph, 0).expect("analysis");
        let out = build_output(Path::new("g.json"), &graph, 0, &analysis).expect("output");

        let mut buf = Vec::new();
        render_analysis_human(&out, false, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.contains("component 1 size=2 nodes=1 2"));
        assert!(text.contains("task_order 0 1 2 3"));
        assert!(text.contains("critical length=7 components=0 1 2 nodes=0 1 3"));
    }
}
