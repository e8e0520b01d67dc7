//! Run configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration:
//!
//! ```json
//! {
//!   "train": { "learning_rate": 0.05, "epochs": 300, "l2": 0.0001, "log_every": 50 },
//!   "threshold": 0.5,
//!   "paths": {
//!     "train": "dataset/train_edges.csv",
//!     "val": "dataset/val_edges.csv",
//!     "test": "dataset/test_edges.csv",
//!     "output": "submissions/cci_ml_baseline.csv"
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::TrainConfig;
use crate::{Error, Result};

/// Where the three splits are read from and the submission is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    pub train: PathBuf,
    pub val: PathBuf,
    pub test: PathBuf,
    pub output: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            train: PathBuf::from("dataset/train_edges.csv"),
            val: PathBuf::from("dataset/val_edges.csv"),
            test: PathBuf::from("dataset/test_edges.csv"),
            output: PathBuf::from("submissions/cci_ml_baseline.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    pub train: TrainConfig,
    /// Probabilities at or above this are labeled 1.
    pub threshold: f64,
    pub paths: DatasetPaths,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            train: TrainConfig::default(),
            threshold: 0.5,
            paths: DatasetPaths::default(),
        }
    }
}

impl BaselineConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject hyperparameters the trainer cannot use.
    pub fn validate(&self) -> Result<()> {
        let t = &self.train;
        if !t.learning_rate.is_finite() || t.learning_rate <= 0.0 {
            return Err(Error::Config(format!("learning_rate must be a positive number, got {}", t.learning_rate)));
        }
        if !t.l2.is_finite() || t.l2 < 0.0 {
            return Err(Error::Config(format!("l2 must be non-negative, got {}", t.l2)));
        }
        if t.log_every == 0 {
            return Err(Error::Config("log_every must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::Config(format!("threshold must lie in [0, 1], got {}", self.threshold)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = BaselineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BaselineConfig::default());
        assert_eq!(config.train.epochs, 300);
        assert_eq!(config.train.learning_rate, 0.05);
        assert_eq!(config.train.l2, 1e-4);
        assert_eq!(config.threshold, 0.5);
    }

    #[test]
    fn partial_override() {
        let config =
            BaselineConfig::from_json_str(r#"{"train": {"epochs": 10}, "paths": {"output": "out.csv"}}"#).unwrap();
        assert_eq!(config.train.epochs, 10);
        assert_eq!(config.train.learning_rate, 0.05);
        assert_eq!(config.paths.output, PathBuf::from("out.csv"));
        assert_eq!(config.paths.train, PathBuf::from("dataset/train_edges.csv"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for text in [
            r#"{"train": {"learning_rate": 0}}"#,
            r#"{"train": {"l2": -1}}"#,
            r#"{"train": {"log_every": 0}}"#,
            r#"{"threshold": 1.5}"#,
        ] {
            assert!(matches!(BaselineConfig::from_json_str(text), Err(Error::Config(_))), "{text}");
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(BaselineConfig::from_json_str("{"), Err(Error::Json(_))));
    }
}
