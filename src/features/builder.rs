//! Edge feature vectors.
//!
//! The component order is a contract: standardization parameters and trained
//! weights are only interchangeable between builders that agree index by index.
//!
//! ```text
//!  idx  feature                 idx  feature
//!   0   src.total                9   src.pos_ratio - tgt.pos_ratio
//!   1   tgt.total               10   src.pos_ratio * tgt.pos_ratio
//!   2   src.positive            11   src.total + tgt.total
//!   3   tgt.positive            12   src.total - tgt.total
//!   4   src.negative            13   src.total * tgt.total
//!   5   tgt.negative            14   min(src.total, tgt.total)
//!   6   src.pos_ratio           15   max(src.total, tgt.total)
//!   7   tgt.pos_ratio           16   1.0 if self-loop else 0.0
//!   8   mean(pos_ratios)
//! ```

use crate::model::{Edge, EdgeKey, NodeStatsTable};

/// Number of components in an edge feature vector.
pub const FEATURE_WIDTH: usize = 17;

/// Fixed-width edge feature vector.
pub type FeatureVector = [f64; FEATURE_WIDTH];

/// Component names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_WIDTH] = [
    "src_total",
    "tgt_total",
    "src_positive",
    "tgt_positive",
    "src_negative",
    "tgt_negative",
    "src_pos_ratio",
    "tgt_pos_ratio",
    "mean_pos_ratio",
    "diff_pos_ratio",
    "prod_pos_ratio",
    "sum_total",
    "diff_total",
    "prod_total",
    "min_total",
    "max_total",
    "self_loop",
];

/// Feature vector for one (source, target) pair.
///
/// Nodes missing from `stats` contribute the zero entry; the width never
/// changes.
pub fn edge_features(key: EdgeKey, stats: &NodeStatsTable) -> FeatureVector {
    let src = stats.get(key.source);
    let tgt = stats.get(key.target);

    let src_total = src.total as f64;
    let tgt_total = tgt.total as f64;
    let src_ratio = src.positive_ratio;
    let tgt_ratio = tgt.positive_ratio;

    [
        src_total,
        tgt_total,
        src.positive as f64,
        tgt.positive as f64,
        src.negative as f64,
        tgt.negative as f64,
        src_ratio,
        tgt_ratio,
        (src_ratio + tgt_ratio) / 2.0,
        src_ratio - tgt_ratio,
        src_ratio * tgt_ratio,
        src_total + tgt_total,
        src_total - tgt_total,
        src_total * tgt_total,
        src_total.min(tgt_total),
        src_total.max(tgt_total),
        if key.is_self_loop() { 1.0 } else { 0.0 },
    ]
}

/// Feature matrix for a split, one row per edge in input order. Labels are ignored.
pub fn build_feature_matrix(edges: &[Edge], stats: &NodeStatsTable) -> Vec<FeatureVector> {
    edges.iter().map(|edge| edge_features(edge.key(), stats)).collect()
}
