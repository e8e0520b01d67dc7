//! # Data Model
//!
//! Plain DTOs shared by every stage: edges, labels, node statistics.
//!
//! Design rule: this module is pure data. No I/O, no training state.

pub mod edge;
pub mod node_stats;

pub use edge::{Edge, EdgeKey, Label, NodeId, labels_of};
pub use node_stats::{NodeStats, NodeStatsTable};
