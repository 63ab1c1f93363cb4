//! Topological ordering by in-degree reduction (Kahn's algorithm).
//!
//! Zero in-degree nodes are seeded in ascending id order and consumed FIFO,
//! so the order is fully determined by the graph. When the graph has a cycle
//! the queue drains early: the returned order is only the prefix reachable
//! through the acyclic part and must not be used as a linearization.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::build::Graph;
use crate::metrics::Metrics;

/// Processing order, cycle flag, and work counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopoResult {
    order: Vec<usize>,
    has_cycle: bool,
    metrics: Metrics,
}

impl TopoResult {
    /// Nodes in the order they were dequeued.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// `true` iff fewer nodes were ordered than the graph has.
    #[must_use]
    pub const fn has_cycle(&self) -> bool {
        self.has_cycle
    }

    /// `true` when [`TopoResult::order`] is a complete linearization.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        !self.has_cycle
    }

    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Order the nodes of `graph` so every edge points forward.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn topological_sort(graph: &Graph) -> TopoResult {
    let n = graph.node_count();
    let mut metrics = Metrics::default();

    let order = metrics.timed(|metrics| {
        let mut in_degree = vec![0_usize; n];
        for edge in graph.all_edges() {
            in_degree[edge.to] += 1;
            metrics.record_queue_op();
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(u) = queue.pop_front() {
            order.push(u);
            metrics.record_queue_op();

            for edge in graph.out_edges(u) {
                in_degree[edge.to] -= 1;
                metrics.record_queue_op();
                if in_degree[edge.to] == 0 {
                    queue.push_back(edge.to);
                }
            }
        }
        order
    });

    let has_cycle = order.len() < n;
    debug!(ordered = order.len(), has_cycle, "topological sort complete");

    TopoResult {
        order,
        has_cycle,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::WeightModel;

    fn directed(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut graph = Graph::new(n, true, WeightModel::Edge);
        for &(u, v) in edges {
            graph.add_edge(u, v, 1).expect("valid edge");
        }
        graph
    }

    #[test]
    fn empty_graph_orders_nothing() {
        let result = topological_sort(&directed(0, &[]));

        assert!(result.order().is_empty());
        assert!(!result.has_cycle());
    }

    #[test]
    fn isolated_nodes_come_out_ascending() {
        let result = topological_sort(&directed(4, &[]));

        assert_eq!(result.order(), &[0, 1, 2, 3]);
        assert!(result.is_complete());
    }

    #[test]
    fn queue_is_seeded_ascending_and_consumed_fifo() {
        // 2 → 0, 3 → 1, 1 → 0
        let result = topological_sort(&directed(4, &[(2, 0), (3, 1), (1, 0)]));

        assert_eq!(result.order(), &[2, 3, 1, 0]);
        assert!(!result.has_cycle());
    }

    #[test]
    fn diamond_respects_every_edge() {
        let graph = directed(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let result = topological_sort(&graph);

        assert_eq!(result.order(), &[0, 1, 2, 3]);
        let position: Vec<usize> = {
            let mut pos = vec![0; 4];
            for (i, &v) in result.order().iter().enumerate() {
                pos[v] = i;
            }
            pos
        };
        for edge in graph.all_edges() {
            assert!(position[edge.from] < position[edge.to]);
        }
    }

    #[test]
    fn cycle_is_flagged_with_partial_prefix() {
        // 0 → 1 → 2 → 1, plus isolated 3
        let result = topological_sort(&directed(4, &[(0, 1), (1, 2), (2, 1)]));

        assert!(result.has_cycle());
        assert_eq!(result.order(), &[0, 3]);
    }

    #[test]
    fn pure_cycle_orders_nothing() {
        let result = topological_sort(&directed(3, &[(0, 1), (1, 2), (2, 0)]));

        assert!(result.has_cycle());
        assert!(result.order().is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let result = topological_sort(&directed(2, &[(0, 1), (1, 1)]));

        assert!(result.has_cycle());
        assert_eq!(result.order(), &[0]);
    }

    #[test]
    fn parallel_edges_are_counted_per_edge() {
        let result = topological_sort(&directed(2, &[(0, 1), (0, 1)]));

        assert_eq!(result.order(), &[0, 1]);
        // 2 in-degree increments + 2 dequeues + 2 decrements
        assert_eq!(result.metrics().queue_operations, 6);
    }
}
