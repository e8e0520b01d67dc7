//! # Logistic Classifier
//!
//! Binary logistic regression over standardized edge features:
//! a deterministic batch gradient-descent trainer and a predictor that
//! replays the fitted parameters on any split.

pub mod predictor;
pub mod trainer;

use serde::{Deserialize, Serialize};

pub use predictor::{Probabilities, classify};
pub use trainer::{TrainConfig, Training, train};

/// Fitted linear classifier: one weight per feature index plus a bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticModel {
    /// All-zero parameters of the given width.
    pub fn zeros(width: usize) -> Self {
        Self { weights: vec![0.0; width], bias: 0.0 }
    }

    pub fn width(&self) -> usize {
        self.weights.len()
    }

    /// Linear score `w·x + b`.
    pub fn decision(&self, x: &[f64]) -> f64 {
        dot(&self.weights, x) + self.bias
    }

    /// `P(label = 1 | x)`.
    pub fn probability(&self, x: &[f64]) -> f64 {
        sigmoid(self.decision(x))
    }
}

/// Numerically stable logistic function.
///
/// Branches on the sign of `z` so the exponential never overflows.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Sequential dot product over the shorter of the two slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
