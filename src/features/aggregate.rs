//! Node statistics aggregation.

use crate::model::{Edge, NodeStatsTable};
use crate::Result;

/// Build per-node positive/negative counts from labeled edges.
///
/// Both endpoints of every edge are visited, so a self-loop counts twice for
/// its node. The table reflects `edges` and nothing else.
///
/// Fails with `MissingLabel` on the first unlabeled edge.
pub fn aggregate_node_stats(edges: &[Edge]) -> Result<NodeStatsTable> {
    let mut table = NodeStatsTable::new();
    for edge in edges {
        let label = edge.require_label()?;
        table.record(edge.source, label);
        table.record(edge.target, label);
    }
    tracing::debug!(edges = edges.len(), nodes = table.len(), "aggregated node statistics");
    Ok(table)
}
