//! # cci-baseline: Link-Prediction Reference Baseline
//!
//! Predicts whether an unlabeled (source, target) edge is an interaction,
//! using only per-node statistics derived from labeled training edges.
//! This is the reference solution competition submissions are scored against.
//!
//! ## Design Principles
//!
//! 1. **Pure stages**: every stage is a value-returning function; no
//!    process-wide state
//! 2. **Leakage-safe**: statistics only ever come from the edges a phase is
//!    allowed to see
//! 3. **Fit once, replay everywhere**: a phase's scaler and model are fitted
//!    on one split and applied verbatim to the others
//! 4. **Deterministic**: zero-initialized parameters, fixed epoch budget, no
//!    randomness
//!
//! ## Quick Start
//!
//! ```rust
//! use cci_baseline::{Baseline, Edge, Label};
//!
//! # fn quick_start() -> cci_baseline::Result<()> {
//! let train = [
//!     Edge::labeled(1, 2, Label::Positive),
//!     Edge::labeled(2, 3, Label::Negative),
//!     Edge::labeled(1, 3, Label::Positive),
//! ];
//! let val = [Edge::labeled(1, 2, Label::Positive)];
//! let test = [Edge::unlabeled(2, 3)];
//!
//! let outcome = Baseline::default().run(&train, &val, &test)?;
//! assert_eq!(outcome.predictions.len(), 1);
//! # Ok(())
//! # }
//! # quick_start().unwrap();
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Aggregate | `features::aggregate` | `NodeStatsTable` |
//! | Featurize | `features::builder` | 17-wide `FeatureVector` per edge |
//! | Standardize | `features::standardize` | `Standardizer` + scaled rows |
//! | Train | `classifier::trainer` | `LogisticModel` + loss trajectory |
//! | Predict | `classifier::predictor` | probabilities, labels |
//! | Orchestrate | `pipeline` | `BaselineOutcome` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod features;
pub mod classifier;
pub mod metrics;
pub mod pipeline;
pub mod scoring;
pub mod config;
pub mod io;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Edge, EdgeKey, Label, NodeId, NodeStats, NodeStatsTable};

// ============================================================================
// Re-exports: Features + Classifier
// ============================================================================

pub use features::{FEATURE_WIDTH, FeatureVector, Standardizer};
pub use classifier::{LogisticModel, TrainConfig, Training};

// ============================================================================
// Re-exports: Pipeline, Scoring, Config
// ============================================================================

pub use pipeline::{Baseline, BaselineOutcome, FittedPhase, Prediction, ValidationSummary};
pub use metrics::{ConfusionMatrix, ScoreWeights};
pub use scoring::{Rejection, ScoreOutcome, ScoreReport, Scorer, SubmissionSchema};
pub use config::{BaselineConfig, DatasetPaths};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Shape mismatch in {stage}: expected width {expected}, got {got}")]
    ShapeMismatch { stage: &'static str, expected: usize, got: usize },

    #[error("Length mismatch in {stage}: {rows} rows vs {labels} labels")]
    LengthMismatch { stage: &'static str, rows: usize, labels: usize },

    #[error("Missing label on edge {0}")]
    MissingLabel(EdgeKey),

    #[error("Invalid label {0}: expected 0 or 1")]
    InvalidLabel(i64),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
