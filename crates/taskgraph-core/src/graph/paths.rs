//! Single-source shortest and longest paths on a DAG.
//!
//! # Algorithm
//!
//! 1. Order the graph topologically (Kahn). A cycle aborts with
//!    [`GraphError::Cycle`]; there is no partial answer.
//! 2. Seed the source at distance 0 and every other node as unreachable.
//! 3. Walk the order once. For each reachable node `u`, relax every outgoing
//!    edge `(u, v, w)`: keep `dist[u] + w` if it beats `dist[v]` under the
//!    query's polarity (`<` for shortest, `>` for longest) and record `u` as
//!    the predecessor of `v`.
//!
//! Every predecessor of a node precedes it in topological order, so each node
//! is final by the time it is relaxed from.
//!
//! # Unreachable Nodes
//!
//! Unreachable distances are `None` rather than a sentinel integer, so no
//! arithmetic ever touches an "infinity". Longest paths relax with their own
//! comparison instead of negating weights. Sums that leave the `i64` range
//! fail with [`GraphError::Overflow`].

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::build::Graph;
use crate::graph::topo::topological_sort;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which extremal path a [`PathResult`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathMode {
    Shortest,
    Longest,
}

impl PathMode {
    /// Return `true` if `candidate` should replace `current`.
    ///
    /// An unreachable `current` is beaten by any candidate.
    const fn improves(self, candidate: i64, current: Option<i64>) -> bool {
        match (self, current) {
            (_, None) => true,
            (Self::Shortest, Some(current)) => candidate < current,
            (Self::Longest, Some(current)) => candidate > current,
        }
    }
}

/// Per-node distances and predecessors from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    distances: Vec<Option<i64>>,
    predecessors: Vec<Option<usize>>,
    source: usize,
    mode: PathMode,
    metrics: Metrics,
}

impl PathResult {
    /// Distance to every node; `None` marks an unreachable node.
    #[must_use]
    pub fn distances(&self) -> &[Option<i64>] {
        &self.distances
    }

    /// Predecessor of every node on its best path; `None` for the source and
    /// unreachable nodes.
    #[must_use]
    pub fn predecessors(&self) -> &[Option<usize>] {
        &self.predecessors
    }

    /// Distance to `node`, `None` if unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `node` is out of range.
    pub fn distance(&self, node: usize) -> Result<Option<i64>> {
        self.check_index(node)?;
        Ok(self.distances[node])
    }

    /// Predecessor of `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `node` is out of range.
    pub fn predecessor(&self, node: usize) -> Result<Option<usize>> {
        self.check_index(node)?;
        Ok(self.predecessors[node])
    }

    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `node` is out of range.
    pub fn is_reachable(&self, node: usize) -> Result<bool> {
        self.distance(node).map(|d| d.is_some())
    }

    #[must_use]
    pub const fn source(&self) -> usize {
        self.source
    }

    #[must_use]
    pub const fn mode(&self) -> PathMode {
        self.mode
    }

    #[must_use]
    pub const fn is_shortest(&self) -> bool {
        matches!(self.mode, PathMode::Shortest)
    }

    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Rebuild the best path from the source to `target`, inclusive.
    ///
    /// Returns an empty path when `target` is unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `target` is out of range.
    pub fn reconstruct_path(&self, target: usize) -> Result<Vec<usize>> {
        self.check_index(target)?;

        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.predecessors[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();

        if path.first() == Some(&self.source) {
            Ok(path)
        } else {
            Ok(Vec::new())
        }
    }

    fn check_index(&self, node: usize) -> Result<()> {
        if node < self.distances.len() {
            Ok(())
        } else {
            Err(GraphError::Index {
                index: node,
                node_count: self.distances.len(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Minimum-weight distances from `source` over a DAG.
///
/// # Errors
///
/// - [`GraphError::Index`] if `source` is out of range.
/// - [`GraphError::Cycle`] if `graph` is not acyclic.
/// - [`GraphError::Overflow`] if a path weight leaves the `i64` range.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn shortest_path(graph: &Graph, source: usize) -> Result<PathResult> {
    single_source(graph, source, PathMode::Shortest)
}

/// Maximum-weight distances from `source` over a DAG.
///
/// # Errors
///
/// - [`GraphError::Index`] if `source` is out of range.
/// - [`GraphError::Cycle`] if `graph` is not acyclic.
/// - [`GraphError::Overflow`] if a path weight leaves the `i64` range.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn longest_path(graph: &Graph, source: usize) -> Result<PathResult> {
    single_source(graph, source, PathMode::Longest)
}

/// Topological order of `graph`, with the sort's work merged into `metrics`.
pub(crate) fn acyclic_order(graph: &Graph, metrics: &mut Metrics) -> Result<Vec<usize>> {
    let topo = topological_sort(graph);
    metrics.merge(topo.metrics());

    if topo.has_cycle() {
        return Err(GraphError::Cycle {
            processed: topo.order().len(),
            node_count: graph.node_count(),
        });
    }
    Ok(topo.order().to_vec())
}

fn single_source(graph: &Graph, source: usize, mode: PathMode) -> Result<PathResult> {
    graph.check_index(source)?;

    let mut metrics = Metrics::default();
    let order = acyclic_order(graph, &mut metrics)?;

    let n = graph.node_count();
    let mut distances: Vec<Option<i64>> = vec![None; n];
    let mut predecessors: Vec<Option<usize>> = vec![None; n];
    distances[source] = Some(0);

    metrics.timed(|metrics| -> Result<()> {
        for &u in &order {
            metrics.record_operation();
            let Some(dist_u) = distances[u] else {
                continue;
            };

            for edge in graph.out_edges(u) {
                metrics.record_relaxation();
                let candidate = dist_u
                    .checked_add(edge.weight)
                    .ok_or(GraphError::Overflow { node: u })?;
                if mode.improves(candidate, distances[edge.to]) {
                    distances[edge.to] = Some(candidate);
                    predecessors[edge.to] = Some(u);
                }
            }
        }
        Ok(())
    })?;

    debug!(
        ?mode,
        reachable = distances.iter().filter(|d| d.is_some()).count(),
        relaxations = metrics.edge_relaxations,
        "single-source paths complete"
    );

    Ok(PathResult {
        distances,
        predecessors,
        source,
        mode,
        metrics,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
