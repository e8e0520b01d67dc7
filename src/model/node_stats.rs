//! Per-node interaction statistics.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{Label, NodeId};

/// How often a node appears in positive vs. negative labeled edges.
///
/// `total` and both ratios are derived; `record` keeps them in step with the
/// counts after every update. Ratios are 0.0 while `total` is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
}

impl NodeStats {
    /// The implicit entry of a node never seen in the aggregation source.
    pub const ZERO: NodeStats = NodeStats {
        positive: 0,
        negative: 0,
        total: 0,
        positive_ratio: 0.0,
        negative_ratio: 0.0,
    };

    /// Count one endpoint visit and recompute the derived fields.
    pub fn record(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Negative => self.negative += 1,
        }
        self.total = self.positive + self.negative;
        let total = self.total as f64;
        self.positive_ratio = if self.total > 0 { self.positive as f64 / total } else { 0.0 };
        self.negative_ratio = if self.total > 0 { self.negative as f64 / total } else { 0.0 };
    }
}

/// Node id → statistics. Lookups of unknown nodes yield [`NodeStats::ZERO`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStatsTable {
    entries: HashMap<NodeId, NodeStats>,
}

impl NodeStatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for `node`, or the zero entry. Never fails.
    pub fn get(&self, node: NodeId) -> NodeStats {
        self.entries.get(&node).copied().unwrap_or(NodeStats::ZERO)
    }

    /// Whether `node` was seen by the aggregation source.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn record(&mut self, node: NodeId, label: Label) {
        self.entries.entry(node).or_default().record(label);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeStats)> {
        self.entries.iter().map(|(id, stats)| (*id, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_ratios_in_step() {
        let mut s = NodeStats::default();
        s.record(Label::Positive);
        assert_eq!(s.total, 1);
        assert_eq!(s.positive_ratio, 1.0);
        assert_eq!(s.negative_ratio, 0.0);

        s.record(Label::Negative);
        s.record(Label::Negative);
        s.record(Label::Negative);
        assert_eq!(s.total, 4);
        assert_eq!(s.positive_ratio, 0.25);
        assert_eq!(s.negative_ratio, 0.75);
    }

    #[test]
    fn missing_node_is_zero_entry() {
        let mut table = NodeStatsTable::new();
        table.record(NodeId(1), Label::Positive);
        assert_eq!(table.get(NodeId(42)), NodeStats::ZERO);
        assert!(!table.contains(NodeId(42)));
        assert_eq!(table.get(NodeId(1)).positive, 1);
    }
}
