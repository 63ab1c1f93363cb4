//! Dependency graph module: structure and analysis algorithms.
//!
//! # Overview
//!
//! A [`Graph`] is built once by a loader and never mutated while algorithms
//! run over it. Every algorithm is a pure function of its input graph: it
//! allocates its own scratch state, returns an immutable result, and carries
//! its own [`crate::Metrics`].
//!
//! ## Pipeline
//!
//! ```text
//! Graph (may contain cycles)
//!        ↓  scc::find_sccs()
//! SccResult
//!   ├─ components:   SCC member lists, ordered by smallest member
//!   └─ condensation: one node per SCC (always a DAG)
//!        ↓  topo::topological_sort()
//! TopoResult (order + cycle flag)
//!        ↓  paths::shortest_path() / paths::longest_path() / critical_path::critical_path()
//! PathResult / CriticalPathResult
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use taskgraph_core::{Graph, WeightModel, critical_path, find_sccs, topological_sort};
//!
//! let mut graph = Graph::new(4, true, WeightModel::Edge);
//! graph.add_edge(0, 1, 2)?;
//! graph.add_edge(1, 2, 3)?;
//! graph.add_edge(2, 1, 1)?;
//! graph.add_edge(2, 3, 4)?;
//!
//! let scc = find_sccs(&graph);
//! assert_eq!(scc.components(), &[vec![0], vec![1, 2], vec![3]]);
//!
//! let topo = topological_sort(scc.condensation());
//! assert!(!topo.has_cycle());
//!
//! let critical = critical_path(scc.condensation())?;
//! assert_eq!(critical.length(), 6);
//! # Ok::<(), taskgraph_core::GraphError>(())
//! ```

pub mod build;
pub mod critical_path;
pub mod paths;
pub mod scc;
pub mod stats;
pub mod topo;

// Re-export primary types at module level for convenience.
pub use build::{Edge, Graph, WeightModel};
pub use critical_path::{CriticalPathResult, critical_path};
pub use paths::{PathMode, PathResult, longest_path, shortest_path};
pub use scc::{SccResult, find_sccs};
pub use stats::GraphStats;
pub use topo::{TopoResult, topological_sort};
