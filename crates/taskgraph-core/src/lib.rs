#![forbid(unsafe_code)]
//! taskgraph-core library.
//!
//! Analysis engine for weighted dependency graphs: cyclic-dependency clusters
//! (Tarjan SCC + condensation), a feasible processing order (Kahn), and
//! shortest / longest / critical paths over the resulting DAG.
//!
//! # Conventions
//!
//! - **Errors**: Fallible operations return [`error::Result`] with a
//!   [`GraphError`]; unreachability is a value, never an error.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Metrics**: Every algorithm owns a fresh [`Metrics`] and returns it in
//!   its result; nested work is merged explicitly, never through globals.

pub mod error;
pub mod graph;
pub mod metrics;

pub use error::{ErrorCode, GraphError, Result};
pub use graph::{
    CriticalPathResult, Edge, Graph, GraphStats, PathMode, PathResult, SccResult, TopoResult,
    WeightModel, critical_path, find_sccs, longest_path, shortest_path, topological_sort,
};
pub use metrics::Metrics;
