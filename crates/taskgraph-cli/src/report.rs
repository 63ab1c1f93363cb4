//! CSV reports written by `tg analyze`.
//!
//! Two files per input, named after the input's file stem:
//!
//! - `<stem>_performance.csv`: one row per algorithm with its counters.
//! - `<stem>_scc.csv`: one row per component with its sorted members.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use taskgraph_core::{Metrics, SccResult};
use tracing::info;

pub const PERFORMANCE_HEADER: &str = "Dataset,Nodes,Edges,Algorithm,Time(ns),Operations,DFS_Visits,Edge_Relaxations,Queue_Operations";
pub const SCC_HEADER: &str = "Component_ID,Size,Nodes";

/// Everything the performance table needs, borrowed from one analysis run.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceInput<'a> {
    pub dataset: &'a str,
    pub nodes: usize,
    pub edges: usize,
    pub scc: &'a Metrics,
    pub topological_sort: &'a Metrics,
    pub critical_path: &'a Metrics,
}

/// Paths of the files written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub performance: PathBuf,
    pub scc: PathBuf,
}

/// Report base name for an input file. `tasks.json` maps to `analysis`.
#[must_use]
pub fn report_basename(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map_or_else(|| "analysis".to_string(), |s| s.to_string_lossy().into_owned());
    if stem == "tasks" {
        "analysis".to_string()
    } else {
        stem
    }
}

/// Write the performance table.
///
/// # Errors
///
/// Returns any I/O error from `w`.
pub fn write_performance(w: &mut dyn Write, input: &PerformanceInput<'_>) -> io::Result<()> {
    writeln!(w, "{PERFORMANCE_HEADER}")?;
    let dataset = csv_field(input.dataset);
    for (algorithm, metrics) in [
        ("SCC", input.scc),
        ("TopologicalSort", input.topological_sort),
        ("CriticalPath", input.critical_path),
    ] {
        writeln!(
            w,
            "{dataset},{},{},{algorithm},{},{},{},{},{}",
            input.nodes,
            input.edges,
            metrics.elapsed_nanos(),
            metrics.operations,
            metrics.dfs_visits,
            metrics.edge_relaxations,
            metrics.queue_operations,
        )?;
    }
    Ok(())
}

/// Write the component table. The member list is quoted since it contains
/// commas.
///
/// # Errors
///
/// Returns any I/O error from `w`.
pub fn write_scc(w: &mut dyn Write, scc: &SccResult) -> io::Result<()> {
    writeln!(w, "{SCC_HEADER}")?;
    for (id, members) in scc.components().iter().enumerate() {
        let list = members
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(w, "{id},{},\"[{list}]\"", members.len())?;
    }
    Ok(())
}

/// Write both reports into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory or either file cannot be written.
pub fn write_reports(
    dir: &Path,
    basename: &str,
    performance: &PerformanceInput<'_>,
    scc: &SccResult,
) -> Result<ReportPaths> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

    let paths = ReportPaths {
        performance: dir.join(format!("{basename}_performance.csv")),
        scc: dir.join(format!("{basename}_scc.csv")),
    };

    write_file(&paths.performance, |w| write_performance(w, performance))?;
    write_file(&paths.scc, |w| write_scc(w, scc))?;

    info!(
        performance = %paths.performance.display(),
        scc = %paths.scc.display(),
        "wrote CSV reports"
    );
    Ok(paths)
}

fn write_file(path: &Path, body: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    body(&mut w)
        .and_then(|()| w.flush())
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
