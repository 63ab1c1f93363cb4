//! Size, degree and cycle summary of a dependency graph.
//!
//! # Fields
//!
//! - **node_count** / **edge_count**: size of the original graph (undirected
//!   edges counted once).
//! - **density**: `edge_count / (node_count * (node_count - 1))`. An empty or
//!   single-node graph has density 0.0. Parallel edges can push it above 1.0.
//! - **scc_count**: number of strongly connected components. In an acyclic
//!   graph this equals `node_count`.
//! - **cycle_count**: SCCs with more than one member.
//! - **largest_component**: member count of the biggest SCC.
//! - **isolated_node_count**: nodes with no incoming and no outgoing edges.
//! - **max_in_degree** / **max_out_degree**: over stored edges of the original
//!   graph.
//! - **condensed_edge_count**: edges kept in the condensation graph.

use serde::Serialize;

use crate::graph::build::Graph;
use crate::graph::scc::SccResult;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a dependency graph and its SCC decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub scc_count: usize,
    pub cycle_count: usize,
    pub largest_component: usize,
    pub isolated_node_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub condensed_edge_count: usize,
}

impl GraphStats {
    /// Compute statistics for `graph` given its SCC decomposition `scc`.
    #[must_use]
    pub fn compute(graph: &Graph, scc: &SccResult) -> Self {
        let node_count = graph.node_count();
        let edge_count = graph.edge_count();

        let mut in_degree = vec![0_usize; node_count];
        for edge in graph.all_edges() {
            in_degree[edge.to] += 1;
        }
        let out_degree: Vec<usize> = (0..node_count)
            .map(|u| graph.out_edges(u).len())
            .collect();

        let isolated_node_count = (0..node_count)
            .filter(|&v| in_degree[v] == 0 && out_degree[v] == 0)
            .count();

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            scc_count: scc.component_count(),
            cycle_count: scc.cycle_count(),
            largest_component: scc.component_sizes().into_iter().max().unwrap_or(0),
            isolated_node_count,
            max_in_degree: in_degree.into_iter().max().unwrap_or(0),
            max_out_degree: out_degree.into_iter().max().unwrap_or(0),
            condensed_edge_count: scc.condensation().edge_count(),
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }

    /// Whether any component has more than one member.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cycle_count > 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
