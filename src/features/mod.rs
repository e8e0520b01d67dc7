//! # Edge Features
//!
//! Node statistics → fixed-width edge vectors → standardized matrices.
//! Pure functions over their inputs; no state survives a call.

pub mod aggregate;
pub mod builder;
pub mod standardize;

pub use aggregate::aggregate_node_stats;
pub use builder::{FEATURE_NAMES, FEATURE_WIDTH, FeatureVector, build_feature_matrix, edge_features};
pub use standardize::{STD_FLOOR, Standardizer};
