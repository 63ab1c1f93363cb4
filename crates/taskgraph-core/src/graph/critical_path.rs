//! Critical path analysis for the dependency graph.
//!
//! # Overview
//!
//! The critical path is the *longest* weighted dependency chain in the
//! graph. Its length bounds the earliest possible completion of the whole
//! project: any delay on a critical edge delays everything.
//!
//! # Algorithm
//!
//! 1. Order the graph topologically. A cycle aborts with [`GraphError::Cycle`];
//!    run on the condensation graph when the raw graph may be cyclic.
//! 2. **Forward pass** over *all* nodes at once: every node starts with an
//!    accumulated distance of 0 (any node may begin a chain), and each edge
//!    `(u, v, w)` lifts `dist[v]` to `dist[u] + w` when that is strictly larger.
//! 3. The chain ends at the node with the largest accumulated distance; ties go
//!    to the smallest node id.
//! 4. **Path reconstruction**: follow predecessor links back until a node that
//!    was never lifted.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::build::Graph;
use crate::graph::paths::acyclic_order;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of critical path analysis on a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPathResult {
    /// Nodes on the critical path, in dependency order (start first).
    ///
    /// Empty only when the graph has no nodes.
    path: Vec<usize>,
    /// Sum of edge weights along `path`.
    length: i64,
    metrics: Metrics,
}

impl CriticalPathResult {
    /// Return an empty result for a graph with no nodes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            path: Vec::new(),
            length: 0,
            metrics: Metrics::default(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    #[must_use]
    pub const fn length(&self) -> i64 {
        self.length
    }

    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Return `true` if the critical path is empty (no nodes in the graph).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute the critical path of an acyclic `graph`.
///
/// A graph with no nodes yields [`CriticalPathResult::empty`]. A graph with no
/// edges yields the single node `0` with length 0.
///
/// # Errors
///
/// - [`GraphError::Cycle`] if `graph` is not acyclic.
/// - [`GraphError::Overflow`] if a path weight leaves the `i64` range.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn critical_path(graph: &Graph) -> Result<CriticalPathResult> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(CriticalPathResult::empty());
    }

    let mut metrics = Metrics::default();
    let order = acyclic_order(graph, &mut metrics)?;

    let (path, length) = metrics.timed(|metrics| -> Result<(Vec<usize>, i64)> {
        // --- Forward pass ---
        let mut accumulated = vec![0_i64; n];
        let mut predecessors: Vec<Option<usize>> = vec![None; n];

        for &u in &order {
            metrics.record_operation();
            for edge in graph.out_edges(u) {
                metrics.record_relaxation();
                let candidate = accumulated[u]
                    .checked_add(edge.weight)
                    .ok_or(GraphError::Overflow { node: u })?;
                if candidate > accumulated[edge.to] {
                    accumulated[edge.to] = candidate;
                    predecessors[edge.to] = Some(u);
                }
            }
        }

        // --- End of the chain: global max, smallest id on ties ---
        let mut end = 0;
        for v in 1..n {
            if accumulated[v] > accumulated[end] {
                end = v;
            }
        }

        Ok((reconstruct_chain(&predecessors, end), accumulated[end]))
    })?;

    debug!(length, nodes_on_path = path.len(), "critical path complete");

    Ok(CriticalPathResult {
        path,
        length,
        metrics,
    })
}

// ---------------------------------------------------------------------------
// Path reconstruction helper
// ---------------------------------------------------------------------------

/// Walk predecessor links back from `end` to a node that has none.
fn reconstruct_chain(predecessors: &[Option<usize>], end: usize) -> Vec<usize> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = predecessors[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
