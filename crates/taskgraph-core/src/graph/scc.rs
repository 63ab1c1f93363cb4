//! Strongly connected components (Tarjan) and condensation.
//!
//! # Overview
//!
//! A dependency graph may contain cycles: tasks that (transitively) wait on
//! each other. This module finds every maximal cycle cluster with Tarjan's
//! algorithm and collapses each one into a single node of the
//! **condensation graph**, which is always a DAG and can be ordered and
//! path-analysed.
//!
//! # Algorithm
//!
//! One depth-first traversal assigns each node a discovery index and a
//! lowlink (smallest discovery index reachable through the DFS subtree plus
//! edges back onto the pending stack). A node whose lowlink equals its own
//! index roots a component: the pending stack is popped down through it.
//!
//! Traversal depth can equal the node count, so the DFS runs on an explicit
//! work stack of `(node, edge cursor)` frames instead of the call stack. The
//! frame loop performs exactly the steps of the recursive formulation.
//!
//! # Determinism
//!
//! - Members of each component are sorted ascending.
//! - Components are ordered by their smallest member; component id = position.
//! - Each ordered pair of components keeps the weight of the **first** original
//!   edge observed between them (source node ascending, then insertion order).
//!
//! # Limitations
//!
//! Undirected input is accepted but every edge is mirrored, so connected nodes
//! collapse into one component. Use directed graphs for meaningful results.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{GraphError, Result};
use crate::graph::build::Graph;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// SccResult
// ---------------------------------------------------------------------------

/// Components, their condensation DAG, and the work it took to find them.
#[derive(Debug, Clone, Serialize)]
pub struct SccResult {
    components: Vec<Vec<usize>>,
    node_component: Vec<usize>,
    condensation: Graph,
    metrics: Metrics,
}

impl SccResult {
    /// Component member lists. Component id = index into this slice.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Condensation graph: node `c` stands for component `c`.
    #[must_use]
    pub const fn condensation(&self) -> &Graph {
        &self.condensation
    }

    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Size of every component, by component id.
    #[must_use]
    pub fn component_sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Component id of each original node.
    #[must_use]
    pub fn node_components(&self) -> &[usize] {
        &self.node_component
    }

    /// Component id containing original node `node`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `node` is not a node of the input graph.
    pub fn component_of(&self, node: usize) -> Result<usize> {
        self.node_component
            .get(node)
            .copied()
            .ok_or(GraphError::Index {
                index: node,
                node_count: self.node_component.len(),
            })
    }

    /// Number of components with more than one member (dependency cycles).
    #[must_use]
    pub fn cycle_count(&self) -> usize {
        self.components.iter().filter(|c| c.len() > 1).count()
    }

    /// Return `true` if component `component` has more than one member.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if `component` is not a component id.
    pub fn is_cycle(&self, component: usize) -> Result<bool> {
        self.members(component).map(|m| m.len() > 1)
    }

    /// Expand an order of component ids into an order of original nodes.
    ///
    /// Each component contributes its members in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if an entry is not a component id.
    pub fn expand_order(&self, component_order: &[usize]) -> Result<Vec<usize>> {
        let mut nodes = Vec::with_capacity(self.node_component.len());
        for &component in component_order {
            nodes.extend_from_slice(self.members(component)?);
        }
        Ok(nodes)
    }

    /// Map a path of component ids to the smallest original node of each.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Index`] if an entry is not a component id.
    pub fn representatives(&self, component_path: &[usize]) -> Result<Vec<usize>> {
        component_path
            .iter()
            .map(|&component| {
                self.members(component)
                    .map(|members| members.first().copied().unwrap_or_default())
            })
            .collect()
    }

    fn members(&self, component: usize) -> Result<&[usize]> {
        self.components
            .get(component)
            .map(Vec::as_slice)
            .ok_or(GraphError::Index {
                index: component,
                node_count: self.components.len(),
            })
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Find the strongly connected components of `graph` and build its
/// condensation.
///
/// Total over every graph: there is no failure mode.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn find_sccs(graph: &Graph) -> SccResult {
    if !graph.is_directed() {
        warn!("running SCC detection on an undirected graph; connected nodes will merge");
    }

    let mut metrics = Metrics::default();
    let (components, node_component, condensation) = metrics.timed(|metrics| {
        let mut state = TarjanState::new(graph.node_count());
        for root in 0..graph.node_count() {
            if state.index[root].is_none() {
                state.strong_connect(graph, root, metrics);
            }
        }

        let components = order_components(state.components);
        let node_component = map_nodes_to_components(graph.node_count(), &components);
        let condensation = build_condensation(graph, components.len(), &node_component);
        (components, node_component, condensation)
    });

    debug!(
        components = components.len(),
        condensed_edges = condensation.edge_count(),
        dfs_visits = metrics.dfs_visits,
        "scc detection complete"
    );

    SccResult {
        components,
        node_component,
        condensation,
        metrics,
    }
}

// ---------------------------------------------------------------------------
// Tarjan
// ---------------------------------------------------------------------------

/// One suspended DFS call: the node and the next outgoing edge to examine.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    cursor: usize,
}

/// Scratch state for one invocation; discarded afterwards.
struct TarjanState {
    /// Discovery index for each node (None if not yet visited).
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    /// Nodes visited but not yet assigned to a component.
    pending: Vec<usize>,
    next_index: usize,
    components: Vec<Vec<usize>>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            pending: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn discover(&mut self, v: usize, metrics: &mut Metrics) {
        metrics.record_dfs_visit();
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.pending.push(v);
        self.on_stack[v] = true;
    }

    fn strong_connect(&mut self, graph: &Graph, root: usize, metrics: &mut Metrics) {
        self.discover(root, metrics);
        let mut work = vec![Frame {
            node: root,
            cursor: 0,
        }];

        while let Some(&Frame { node: v, cursor }) = work.last() {
            if let Some(edge) = graph.out_edges(v).get(cursor) {
                if let Some(top) = work.last_mut() {
                    top.cursor += 1;
                }
                metrics.record_operation();

                let w = edge.to;
                match self.index[w] {
                    None => {
                        // Descend: equivalent to the recursive call.
                        self.discover(w, metrics);
                        work.push(Frame { node: w, cursor: 0 });
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    // Already assigned to a closed component.
                    Some(_) => {}
                }
                continue;
            }

            // All edges of v examined: the recursive call returns.
            work.pop();
            if self.index[v] == Some(self.lowlink[v]) {
                self.close_component(v);
            }
            if let Some(parent) = work.last() {
                self.lowlink[parent.node] = self.lowlink[parent.node].min(self.lowlink[v]);
            }
        }
    }

    fn close_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(w) = self.pending.pop() {
            self.on_stack[w] = false;
            component.push(w);
            if w == root {
                break;
            }
        }
        component.sort_unstable();
        self.components.push(component);
    }
}

// ---------------------------------------------------------------------------
// Condensation helpers
// ---------------------------------------------------------------------------

/// Tarjan emits components in reverse topological order; reorder them by
/// smallest member so ids are stable across traversal details.
fn order_components(mut components: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    components.sort_unstable_by_key(|c| c.first().copied());
    components
}

fn map_nodes_to_components(n: usize, components: &[Vec<usize>]) -> Vec<usize> {
    let mut node_component = vec![0; n];
    for (id, members) in components.iter().enumerate() {
        for &node in members {
            node_component[node] = id;
        }
    }
    node_component
}

/// Keep exactly one edge per ordered component pair: the first one observed.
fn build_condensation(graph: &Graph, component_count: usize, node_component: &[usize]) -> Graph {
    let mut condensation = Graph::new(component_count, true, graph.weight_model());
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for edge in graph.all_edges() {
        let from = node_component[edge.from];
        let to = node_component[edge.to];
        if from != to && seen.insert((from, to)) {
            // Both ids come from `node_component`, so they are in range.
            if let Err(err) = condensation.add_edge(from, to, edge.weight) {
                warn!(%err, "skipping condensation edge");
            }
        }
    }

    condensation
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::WeightModel;

    fn directed(n: usize, edges: &[(usize, usize, i64)]) -> Graph {
        let mut graph = Graph::new(n, true, WeightModel::Edge);
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w).expect("valid edge");
        }
        graph
    }

    fn condensed_edges(result: &SccResult) -> Vec<(usize, usize, i64)> {
        result
            .condensation()
            .all_edges()
            .map(|e| (e.from, e.to, e.weight))
            .collect()
    }

    #[test]
    fn empty_graph_has_no_components() {
        let result = find_sccs(&directed(0, &[]));

        assert!(result.components().is_empty());
        assert_eq!(result.condensation().node_count(), 0);
        assert_eq!(result.cycle_count(), 0);
    }

    #[test]
    fn acyclic_graph_yields_singletons() {
        let result = find_sccs(&directed(4, &[(0, 1, 1), (1, 2, 1), (0, 3, 1)]));

        assert_eq!(result.components(), &[vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(result.cycle_count(), 0);
        assert_eq!(condensed_edges(&result), vec![(0, 1, 1), (0, 3, 1), (1, 2, 1)]);
    }

    #[test]
    fn cycle_with_tail_collapses_to_two_components() {
        let result = find_sccs(&directed(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 1, 1)]));

        assert_eq!(result.components(), &[vec![0], vec![1, 2, 3]]);
        assert_eq!(result.component_sizes(), vec![1, 3]);
        assert_eq!(result.node_components(), &[0, 1, 1, 1]);
        assert_eq!(result.cycle_count(), 1);
        assert_eq!(result.is_cycle(1), Ok(true));
        assert_eq!(condensed_edges(&result), vec![(0, 1, 1)]);
    }

    #[test]
    fn components_ordered_by_smallest_member() {
        // 3 ↔ 4 is discovered first from root 0 via 0 → 3, but {1, 2} has the
        // smaller minimum among the remaining clusters.
        let result = find_sccs(&directed(
            5,
            &[(0, 3, 1), (3, 4, 1), (4, 3, 1), (2, 1, 1), (1, 2, 1), (1, 0, 1)],
        ));

        assert_eq!(result.components(), &[vec![0], vec![1, 2], vec![3, 4]]);
        assert_eq!(result.component_of(4), Ok(2));
        assert_eq!(condensed_edges(&result), vec![(0, 2, 1), (1, 0, 1)]);
    }

    #[test]
    fn self_loop_is_a_singleton_without_condensation_edge() {
        let result = find_sccs(&directed(2, &[(0, 0, 3), (0, 1, 2)]));

        assert_eq!(result.components(), &[vec![0], vec![1]]);
        assert_eq!(result.cycle_count(), 0);
        assert_eq!(condensed_edges(&result), vec![(0, 1, 2)]);
    }

    #[test]
    fn first_observed_cross_edge_weight_wins() {
        // {0,1} → {2} via two edges; node 0's edge is scanned first.
        let result = find_sccs(&directed(
            3,
            &[(0, 1, 1), (1, 0, 1), (1, 2, 9), (0, 2, 4), (0, 2, 1)],
        ));

        assert_eq!(result.components(), &[vec![0, 1], vec![2]]);
        assert_eq!(condensed_edges(&result), vec![(0, 1, 4)]);
    }

    #[test]
    fn condensation_inherits_weight_model_without_durations() {
        let mut graph =
            Graph::with_durations(3, true, WeightModel::Node, vec![5, 6, 7]).expect("durations");
        graph.add_edge(0, 1, 1).expect("edge");
        graph.add_edge(1, 0, 1).expect("edge");
        graph.add_edge(1, 2, 1).expect("edge");

        let result = find_sccs(&graph);
        let condensation = result.condensation();

        assert!(condensation.is_directed());
        assert_eq!(condensation.weight_model(), WeightModel::Node);
        assert_eq!(condensation.durations(), &[0, 0]);
    }

    #[test]
    fn deep_chain_does_not_overflow_the_stack() {
        let n = 200_000;
        let edges: Vec<(usize, usize, i64)> = (0..n - 1).map(|i| (i, i + 1, 1)).collect();
        let mut graph = directed(n, &edges);
        graph.add_edge(n - 1, 0, 1).expect("closing edge");

        let result = find_sccs(&graph);

        assert_eq!(result.component_count(), 1);
        assert_eq!(result.components()[0].len(), n);
        assert_eq!(result.metrics().dfs_visits, n as u64);
    }

    #[test]
    fn metrics_count_visits_and_scanned_edges() {
        let result = find_sccs(&directed(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (0, 2, 1)]));

        assert_eq!(result.metrics().dfs_visits, 3);
        assert_eq!(result.metrics().operations, 4);
    }

    #[test]
    fn expand_order_and_representatives() {
        let result = find_sccs(&directed(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 1, 1)]));

        assert_eq!(result.expand_order(&[0, 1]), Ok(vec![0, 1, 2, 3]));
        assert_eq!(result.representatives(&[1, 0]), Ok(vec![1, 0]));
        assert!(matches!(
            result.expand_order(&[2]),
            Err(GraphError::Index { index: 2, .. })
        ));
        assert!(result.component_of(4).is_err());
    }
}
