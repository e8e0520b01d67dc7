//! Binary classification metrics.

use serde::{Deserialize, Serialize};

use crate::model::Label;
use crate::{Error, Result};

/// Counts of true/false positives/negatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    #[serde(rename = "tp")]
    pub true_positives: u64,
    #[serde(rename = "tn")]
    pub true_negatives: u64,
    #[serde(rename = "fp")]
    pub false_positives: u64,
    #[serde(rename = "fn")]
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    /// Tally parallel truth/prediction sequences.
    pub fn from_labels(truth: &[Label], predicted: &[Label]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::LengthMismatch {
                stage: "confusion matrix",
                rows: predicted.len(),
                labels: truth.len(),
            });
        }
        let mut cm = Self::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            cm.record(t, p);
        }
        Ok(cm)
    }

    pub fn record(&mut self, truth: Label, predicted: Label) {
        match (truth, predicted) {
            (Label::Positive, Label::Positive) => self.true_positives += 1,
            (Label::Negative, Label::Negative) => self.true_negatives += 1,
            (Label::Negative, Label::Positive) => self.false_positives += 1,
            (Label::Positive, Label::Negative) => self.false_negatives += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Weights of the leaderboard score. The defaults sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { accuracy: 0.3, precision: 0.2, recall: 0.2, f1: 0.3 }
    }
}

impl ScoreWeights {
    pub fn score(&self, cm: &ConfusionMatrix) -> f64 {
        cm.accuracy() * self.accuracy
            + cm.precision() * self.precision
            + cm.recall() * self.recall
            + cm.f1() * self.f1
    }
}
