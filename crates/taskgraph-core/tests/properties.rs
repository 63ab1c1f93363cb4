//! Property tests for SCC detection, topological ordering and path
//! reconstruction, with petgraph as an independent oracle.

use std::collections::VecDeque;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use proptest::prelude::*;
use taskgraph_core::{Graph, WeightModel, find_sccs, longest_path, shortest_path, topological_sort};

type EdgeList = Vec<(usize, usize, i64)>;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_graph() -> impl Strategy<Value = (usize, EdgeList)> {
    (1_usize..14).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n, -5_i64..20), 0..40);
        (Just(n), edges)
    })
}

/// Edges only point from lower to higher ids, so the graph is a DAG.
fn arb_dag() -> impl Strategy<Value = (usize, EdgeList)> {
    arb_graph().prop_map(|(n, edges)| {
        let edges = edges
            .into_iter()
            .filter(|(u, v, _)| u != v)
            .map(|(u, v, w)| (u.min(v), u.max(v), w))
            .collect();
        (n, edges)
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build(n: usize, edges: &EdgeList) -> Graph {
    let mut graph = Graph::new(n, true, WeightModel::Edge);
    for &(u, v, w) in edges {
        graph.add_edge(u, v, w).expect("generated in range");
    }
    graph
}

fn oracle(n: usize, edges: &EdgeList) -> DiGraph<(), i64> {
    let mut graph = DiGraph::new();
    for _ in 0..n {
        graph.add_node(());
    }
    for &(u, v, w) in edges {
        graph.add_edge(NodeIndex::new(u), NodeIndex::new(v), w);
    }
    graph
}

fn reachability(graph: &Graph) -> Vec<Vec<bool>> {
    let n = graph.node_count();
    (0..n)
        .map(|start| {
            let mut seen = vec![false; n];
            seen[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for edge in graph.edges(u).expect("in range") {
                    if !seen[edge.to] {
                        seen[edge.to] = true;
                        queue.push_back(edge.to);
                    }
                }
            }
            seen
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn components_partition_the_node_set((n, edges) in arb_graph()) {
        let scc = find_sccs(&build(n, &edges));

        let mut seen = vec![0_u32; n];
        for component in scc.components() {
            prop_assert!(component.windows(2).all(|w| w[0] < w[1]), "members sorted");
            for &node in component {
                seen[node] += 1;
            }
        }
        prop_assert!(seen.iter().all(|&count| count == 1));

        let minimums: Vec<usize> = scc.components().iter().map(|c| c[0]).collect();
        prop_assert!(minimums.windows(2).all(|w| w[0] < w[1]), "ordered by minimum");
    }

    #[test]
    fn shared_component_iff_mutually_reachable((n, edges) in arb_graph()) {
        let graph = build(n, &edges);
        let scc = find_sccs(&graph);
        let reach = reachability(&graph);

        for u in 0..n {
            for v in 0..n {
                let same = scc.component_of(u).ok() == scc.component_of(v).ok();
                prop_assert_eq!(same, reach[u][v] && reach[v][u], "nodes {} and {}", u, v);
            }
        }
    }

    #[test]
    fn component_count_matches_petgraph((n, edges) in arb_graph()) {
        let scc = find_sccs(&build(n, &edges));
        prop_assert_eq!(scc.component_count(), tarjan_scc(&oracle(n, &edges)).len());
    }

    #[test]
    fn condensation_is_acyclic((n, edges) in arb_graph()) {
        let scc = find_sccs(&build(n, &edges));
        let topo = topological_sort(scc.condensation());

        prop_assert!(!topo.has_cycle());
        prop_assert_eq!(topo.order().len(), scc.component_count());
    }

    #[test]
    fn dag_yields_singleton_components((n, edges) in arb_dag()) {
        let scc = find_sccs(&build(n, &edges));

        prop_assert_eq!(scc.component_count(), n);
        prop_assert!(scc.components().iter().all(|c| c.len() == 1));
    }

    #[test]
    fn cycle_flag_matches_petgraph_and_order_length((n, edges) in arb_graph()) {
        let topo = topological_sort(&build(n, &edges));

        prop_assert_eq!(topo.has_cycle(), topo.order().len() < n);
        prop_assert_eq!(topo.has_cycle(), toposort(&oracle(n, &edges), None).is_err());
    }

    #[test]
    fn order_respects_every_edge((n, edges) in arb_dag()) {
        let topo = topological_sort(&build(n, &edges));
        prop_assert!(!topo.has_cycle());

        let mut position = vec![usize::MAX; n];
        for (i, &v) in topo.order().iter().enumerate() {
            position[v] = i;
        }
        for &(u, v, _) in &edges {
            prop_assert!(position[u] < position[v], "edge {} -> {}", u, v);
        }
    }

    #[test]
    fn reconstructed_paths_run_from_source_to_target(
        (n, edges) in arb_dag(),
        source_seed in any::<usize>(),
    ) {
        let graph = build(n, &edges);
        let source = source_seed % n;
        let reach = reachability(&graph);

        for result in [
            shortest_path(&graph, source).expect("dag"),
            longest_path(&graph, source).expect("dag"),
        ] {
            for target in 0..n {
                let path = result.reconstruct_path(target).expect("in range");
                if reach[source][target] {
                    prop_assert_eq!(path.first().copied(), Some(source));
                    prop_assert_eq!(path.last().copied(), Some(target));
                    prop_assert!(result.distance(target).expect("in range").is_some());
                } else {
                    prop_assert!(path.is_empty());
                    prop_assert!(result.distance(target).expect("in range").is_none());
                }
            }
        }
    }

    #[test]
    fn shortest_never_exceeds_longest(
        (n, edges) in arb_dag(),
        source_seed in any::<usize>(),
    ) {
        let graph = build(n, &edges);
        let source = source_seed % n;
        let shortest = shortest_path(&graph, source).expect("dag");
        let longest = longest_path(&graph, source).expect("dag");

        for (s, l) in shortest.distances().iter().zip(longest.distances()) {
            match (s, l) {
                (Some(s), Some(l)) => prop_assert!(s <= l),
                (None, None) => {}
                _ => prop_assert!(false, "reachability must agree"),
            }
        }
    }
}
