//! JSON graph documents.
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 3,
//!   "edges": [{ "u": 0, "v": 1, "w": 5 }, { "u": 1, "v": 2, "w": 3 }],
//!   "source": 0,
//!   "weight_model": "edge",
//!   "durations": [1, 2, 3]
//! }
//! ```
//!
//! `source`, `weight_model` and `durations` are optional. The same format is
//! written by `tg generate`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taskgraph_core::{Graph, WeightModel};
use tracing::debug;

/// One edge as it appears on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    pub w: i64,
}

/// On-disk graph description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub directed: bool,
    pub n: usize,
    pub edges: Vec<EdgeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    #[serde(default)]
    pub weight_model: WeightModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations: Option<Vec<i64>>,
}

impl GraphDocument {
    /// Build the in-memory [`Graph`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending edge if an endpoint is out of
    /// range, or if `durations` does not have exactly `n` entries.
    pub fn to_graph(&self) -> Result<Graph> {
        let mut graph = match &self.durations {
            Some(durations) => {
                Graph::with_durations(self.n, self.directed, self.weight_model, durations.clone())?
            }
            None => Graph::new(self.n, self.directed, self.weight_model),
        };

        for (i, edge) in self.edges.iter().enumerate() {
            graph
                .add_edge(edge.u, edge.v, edge.w)
                .with_context(|| format!("edge #{i} ({} -> {})", edge.u, edge.v))?;
        }
        Ok(graph)
    }
}

/// Read and parse a graph document from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid document.
pub fn load_document(path: &Path) -> Result<GraphDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc: GraphDocument = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    debug!(
        path = %path.display(),
        nodes = doc.n,
        edges = doc.edges.len(),
        "loaded graph document"
    );
    Ok(doc)
}
