//! Per-invocation operation counters and wall-clock timing.
//!
//! Each algorithm entry point creates its own [`Metrics`], fills it while it
//! runs, and hands it back inside its result. When one algorithm runs another
//! (the path engine sorts topologically first), the child's metrics are
//! folded into the parent's with [`Metrics::merge`].

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

/// Elapsed time plus four operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Wall-clock time spent inside the instrumented computation.
    #[serde(rename = "elapsed_ns", serialize_with = "serialize_nanos")]
    pub elapsed: Duration,
    /// Generic work units (edges scanned by Tarjan, nodes processed by relaxation).
    pub operations: u64,
    /// Nodes discovered by depth-first search.
    pub dfs_visits: u64,
    /// Edges examined during distance relaxation.
    pub edge_relaxations: u64,
    /// In-degree updates, enqueues and dequeues performed by Kahn's algorithm.
    pub queue_operations: u64,
}

impl Metrics {
    /// Run `f` and add its wall-clock duration to [`Metrics::elapsed`].
    pub fn timed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let started = Instant::now();
        let result = f(self);
        self.elapsed += started.elapsed();
        result
    }

    pub fn record_operation(&mut self) {
        self.operations += 1;
    }

    pub fn record_dfs_visit(&mut self) {
        self.dfs_visits += 1;
    }

    pub fn record_relaxation(&mut self) {
        self.edge_relaxations += 1;
    }

    pub fn record_queue_op(&mut self) {
        self.queue_operations += 1;
    }

    /// Accumulate another computation's work into this one.
    pub fn merge(&mut self, other: &Self) {
        self.elapsed += other.elapsed;
        self.operations += other.operations;
        self.dfs_visits += other.dfs_visits;
        self.edge_relaxations += other.edge_relaxations;
        self.queue_operations += other.queue_operations;
    }

    /// Elapsed time in nanoseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.elapsed.as_nanos()).unwrap_or(u64::MAX)
    }

    /// Sum of all four counters.
    #[must_use]
    pub const fn total_counted(&self) -> u64 {
        self.operations + self.dfs_visits + self.edge_relaxations + self.queue_operations
    }
}

fn serialize_nanos<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_every_counter() {
        let mut parent = Metrics {
            elapsed: Duration::from_nanos(10),
            operations: 1,
            dfs_visits: 2,
            edge_relaxations: 3,
            queue_operations: 4,
        };
        let child = Metrics {
            elapsed: Duration::from_nanos(5),
            operations: 10,
            dfs_visits: 20,
            edge_relaxations: 30,
            queue_operations: 40,
        };

        parent.merge(&child);

        assert_eq!(parent.elapsed_nanos(), 15);
        assert_eq!(parent.operations, 11);
        assert_eq!(parent.dfs_visits, 22);
        assert_eq!(parent.edge_relaxations, 33);
        assert_eq!(parent.queue_operations, 44);
        assert_eq!(parent.total_counted(), 110);
    }

    #[test]
    fn timed_records_counters_from_closure() {
        let mut metrics = Metrics::default();
        let value = metrics.timed(|m| {
            m.record_operation();
            m.record_dfs_visit();
            m.record_relaxation();
            m.record_queue_op();
            42
        });

        assert_eq!(value, 42);
        assert_eq!(metrics.total_counted(), 4);
    }

    #[test]
    fn serializes_elapsed_as_nanoseconds() {
        let metrics = Metrics {
            elapsed: Duration::from_micros(2),
            operations: 7,
            ..Metrics::default()
        };

        let json = serde_json::to_value(metrics).expect("serialize");
        assert_eq!(json["elapsed_ns"], 2000);
        assert_eq!(json["operations"], 7);
        assert_eq!(json["queue_operations"], 0);
    }
}
