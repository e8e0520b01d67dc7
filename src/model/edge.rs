//! Edge records: the input and output unit of the pipeline.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Opaque node identifier. Arbitrary non-negative integer, no density assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Binary interaction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum Label {
    /// `0`: no interaction.
    Negative,
    /// `1`: interaction.
    Positive,
}

impl Label {
    /// Threshold a probability: `p >= threshold` is positive.
    pub fn from_probability(p: f64, threshold: f64) -> Self {
        if p >= threshold { Label::Positive } else { Label::Negative }
    }

    pub fn is_positive(self) -> bool {
        self == Label::Positive
    }

    /// The label as a regression target (0.0 or 1.0).
    pub fn as_f64(self) -> f64 {
        match self {
            Label::Negative => 0.0,
            Label::Positive => 1.0,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.as_u8()
    }
}

impl TryFrom<i64> for Label {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(Label::Negative),
            1 => Ok(Label::Positive),
            other => Err(Error::InvalidLabel(other)),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Ordered (source, target) pair. Also the join key at the scoring boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeKey {
    pub fn new(source: u64, target: u64) -> Self {
        Self { source: NodeId(source), target: NodeId(target) }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

/// An edge, optionally labeled.
///
/// Edges are never deduplicated: a repeated (source, target) pair with a
/// different label is a separate record and is counted separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: Option<Label>,
}

impl Edge {
    pub fn labeled(source: u64, target: u64, label: Label) -> Self {
        Self { source: NodeId(source), target: NodeId(target), label: Some(label) }
    }

    pub fn unlabeled(source: u64, target: u64) -> Self {
        Self { source: NodeId(source), target: NodeId(target), label: None }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey { source: self.source, target: self.target }
    }

    /// The label, or `MissingLabel` when a stage needs supervision.
    pub fn require_label(&self) -> Result<Label> {
        self.label.ok_or(Error::MissingLabel(self.key()))
    }
}

impl From<EdgeKey> for Edge {
    fn from(key: EdgeKey) -> Self {
        Self { source: key.source, target: key.target, label: None }
    }
}

/// Collect the labels of a supervised split, failing on the first unlabeled edge.
pub fn labels_of(edges: &[Edge]) -> Result<Vec<Label>> {
    edges.iter().map(Edge::require_label).collect()
}
