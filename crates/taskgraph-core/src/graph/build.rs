//! Weighted adjacency structure for dependency graphs.
//!
//! # Overview
//!
//! Nodes are dense integer ids in `[0, n)`. Each node owns an ordered list of
//! outgoing [`Edge`]s; insertion order is preserved and drives every
//! deterministic tie-break downstream (DFS order in Tarjan, first-observed
//! condensation weights, relaxation order).
//!
//! ## Edge Direction
//!
//! An edge `u → v` means "u must be completed before v can start".
//!
//! ## Undirected Graphs
//!
//! For undirected graphs [`Graph::add_edge`] stores the logical edge in both
//! endpoints' lists, so callers add each undirected edge exactly once.
//!
//! ## Multigraph Semantics
//!
//! Parallel edges and self-loops are kept as given. Nothing is deduplicated.

#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How weights are attached to the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightModel {
    /// Weights live on edges.
    #[default]
    Edge,
    /// Weights live on nodes as per-node durations.
    Node,
}

impl WeightModel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Node => "node",
        }
    }
}

impl std::fmt::Display for WeightModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A weighted directed edge `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: i64,
}

/// Immutable-after-construction weighted adjacency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    directed: bool,
    weight_model: WeightModel,
    adjacency: Vec<Vec<Edge>>,
    durations: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Graph {
    /// Create a graph with `n` isolated nodes and all durations zero.
    #[must_use]
    pub fn new(n: usize, directed: bool, weight_model: WeightModel) -> Self {
        Self {
            directed,
            weight_model,
            adjacency: vec![Vec::new(); n],
            durations: vec![0; n],
        }
    }

    /// Create a graph with `n` isolated nodes and explicit per-node durations.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Construction`] if `durations.len() != n`.
    pub fn with_durations(
        n: usize,
        directed: bool,
        weight_model: WeightModel,
        durations: Vec<i64>,
    ) -> Result<Self> {
        let mut graph = Self::new(n, directed, weight_model);
        graph.set_durations(durations)?;
        Ok(graph)
    }

    /// Add the edge `u → v` with weight `w`.
    ///
    /// Undirected graphs also receive the mirror edge `v → u`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if either endpoint is out of range. The
    /// graph is left unchanged in that case.
    pub fn add_edge(&mut self, u: usize, v: usize, w: i64) -> Result<()> {
        self.check_index(u)?;
        self.check_index(v)?;

        self.adjacency[u].push(Edge {
            from: u,
            to: v,
            weight: w,
        });
        if !self.directed {
            self.adjacency[v].push(Edge {
                from: v,
                to: u,
                weight: w,
            });
        }
        Ok(())
    }

    /// Replace the per-node durations.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Construction`] if `durations.len()` differs from
    /// the node count.
    pub fn set_durations(&mut self, durations: Vec<i64>) -> Result<()> {
        if durations.len() != self.node_count() {
            return Err(GraphError::construction(format!(
                "expected {} durations, got {}",
                self.node_count(),
                durations.len()
            )));
        }
        self.durations = durations;
        Ok(())
    }

    /// Return a graph with every edge reversed.
    ///
    /// Undirected graphs are symmetric already, so they are returned as an
    /// equivalent copy.
    #[must_use]
    pub fn transpose(&self) -> Self {
        if !self.directed {
            return self.clone();
        }

        let mut reversed = Self {
            directed: true,
            weight_model: self.weight_model,
            adjacency: vec![Vec::new(); self.node_count()],
            durations: self.durations.clone(),
        };
        for edge in self.all_edges() {
            reversed.adjacency[edge.to].push(Edge {
                from: edge.to,
                to: edge.from,
                weight: edge.weight,
            });
        }
        reversed
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Graph {
    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Return the number of logical edges.
    ///
    /// Undirected edges are stored twice but counted once. An undirected
    /// self-loop therefore also counts once.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let stored: usize = self.adjacency.iter().map(Vec::len).sum();
        if self.directed { stored } else { stored / 2 }
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub const fn weight_model(&self) -> WeightModel {
        self.weight_model
    }

    /// Outgoing edges of `u`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `u` is out of range.
    pub fn edges(&self, u: usize) -> Result<&[Edge]> {
        self.check_index(u)?;
        Ok(&self.adjacency[u])
    }

    /// Number of stored outgoing edges of `u`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `u` is out of range.
    pub fn out_degree(&self, u: usize) -> Result<usize> {
        self.edges(u).map(<[Edge]>::len)
    }

    /// Duration of node `i`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `i` is out of range.
    pub fn node_duration(&self, i: usize) -> Result<i64> {
        self.check_index(i)?;
        Ok(self.durations[i])
    }

    #[must_use]
    pub fn durations(&self) -> &[i64] {
        &self.durations
    }

    /// Iterate every stored edge, by source node ascending then insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.iter().flatten()
    }

    /// Outgoing edges of a node known to be in range.
    pub(crate) fn out_edges(&self, u: usize) -> &[Edge] {
        &self.adjacency[u]
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.node_count() {
            Ok(())
        } else {
            Err(GraphError::Index {
                index,
                node_count: self.node_count(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
