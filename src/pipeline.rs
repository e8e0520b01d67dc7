//! # Baseline Pipeline
//!
//! Two independent fit/apply cycles:
//!
//! ```text
//! Phase A (model selection)            Phase B (final fit)
//!   stats    ← train                     stats    ← train + val
//!   scaler   ← fit(train features)       scaler   ← fit(train+val features)
//!   model    ← train(scaled train)       model    ← train(scaled train+val)
//!   val      → accuracy / F1 (logged)    test     → submission labels
//! ```
//!
//! The phases share no statistics, scaler or model. Phase A's metrics come
//! from a model that never saw validation edges; Phase B's predictions use
//! every labeled edge available.

use serde::{Deserialize, Serialize};

use crate::classifier::{LogisticModel, TrainConfig, Training, train};
use crate::config::BaselineConfig;
use crate::features::{FEATURE_NAMES, Standardizer, aggregate_node_stats, build_feature_matrix};
use crate::io;
use crate::metrics::ConfusionMatrix;
use crate::model::{Edge, EdgeKey, Label, NodeStatsTable, labels_of};
use crate::Result;

/// One scored edge of the output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub key: EdgeKey,
    pub probability: f64,
    pub label: Label,
}

/// Everything fitted in one phase: statistics, scaler and classifier.
#[derive(Debug, Clone)]
pub struct FittedPhase {
    pub stats: NodeStatsTable,
    pub standardizer: Standardizer,
    pub training: Training,
}

impl FittedPhase {
    /// Fit a phase from scratch on labeled `edges`.
    pub fn fit(edges: &[Edge], config: &TrainConfig) -> Result<Self> {
        let labels = labels_of(edges)?;
        let stats = aggregate_node_stats(edges)?;
        let features = build_feature_matrix(edges, &stats);
        let (standardizer, scaled) = Standardizer::fit_transform(&features)?;
        let training = train(&scaled, &labels, config)?;
        for (feature, weight) in FEATURE_NAMES.iter().zip(&training.model.weights) {
            tracing::debug!(feature = *feature, weight = *weight, "learned weight");
        }
        Ok(Self { stats, standardizer, training })
    }

    pub fn model(&self) -> &LogisticModel {
        &self.training.model
    }

    /// Features of `edges` against this phase's statistics, scaled with this
    /// phase's fitted parameters.
    pub fn standardized(&self, edges: &[Edge]) -> Result<Vec<Vec<f64>>> {
        let features = build_feature_matrix(edges, &self.stats);
        self.standardizer.transform(&features)
    }

    /// One prediction per edge, in input order. Labels on `edges` are ignored.
    pub fn predict(&self, edges: &[Edge], threshold: f64) -> Result<Vec<Prediction>> {
        let scaled = self.standardized(edges)?;
        Ok(edges
            .iter()
            .zip(self.model().predict_proba(&scaled))
            .map(|(edge, probability)| Prediction {
                key: edge.key(),
                probability,
                label: Label::from_probability(probability, threshold),
            })
            .collect())
    }
}

/// Phase A's informational report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub f1: f64,
    /// Loss of Phase A's last training epoch.
    pub final_loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineOutcome {
    /// `None` when the validation split is empty.
    pub validation: Option<ValidationSummary>,
    pub predictions: Vec<Prediction>,
}

impl BaselineOutcome {
    /// `(key, label)` rows for the submission writer.
    pub fn rows(&self) -> impl Iterator<Item = (EdgeKey, Label)> + '_ {
        self.predictions.iter().map(|p| (p.key, p.label))
    }
}

/// The node-statistics + logistic-regression baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    train: TrainConfig,
    threshold: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self { train: TrainConfig::default(), threshold: 0.5 }
    }
}

impl Baseline {
    pub fn new(train: TrainConfig, threshold: f64) -> Self {
        Self { train, threshold }
    }

    pub fn from_config(config: &BaselineConfig) -> Self {
        Self::new(config.train.clone(), config.threshold)
    }

    /// Phase A: fit on `train_edges` only and measure on `val_edges`.
    pub fn validate(&self, train_edges: &[Edge], val_edges: &[Edge]) -> Result<Option<ValidationSummary>> {
        if val_edges.is_empty() {
            tracing::warn!("validation split is empty, skipping phase A");
            return Ok(None);
        }
        let truth = labels_of(val_edges)?;

        tracing::info!(train = train_edges.len(), val = val_edges.len(), "phase A: fit on train");
        let phase = FittedPhase::fit(train_edges, &self.train)?;
        let predicted: Vec<Label> = phase
            .predict(val_edges, self.threshold)?
            .into_iter()
            .map(|p| p.label)
            .collect();

        let confusion = ConfusionMatrix::from_labels(&truth, &predicted)?;
        let summary = ValidationSummary {
            accuracy: confusion.accuracy(),
            f1: confusion.f1(),
            confusion,
            final_loss: phase.training.final_loss(),
        };
        tracing::info!(accuracy = summary.accuracy, f1 = summary.f1, "validation");
        Ok(Some(summary))
    }

    /// Phase B: refit from scratch on train + val combined.
    pub fn fit_final(&self, train_edges: &[Edge], val_edges: &[Edge]) -> Result<FittedPhase> {
        let combined: Vec<Edge> = train_edges.iter().chain(val_edges).copied().collect();
        tracing::info!(edges = combined.len(), "phase B: refit on train + val");
        FittedPhase::fit(&combined, &self.train)
    }

    /// Both phases; predictions for `test_edges` in input order.
    pub fn run(&self, train_edges: &[Edge], val_edges: &[Edge], test_edges: &[Edge]) -> Result<BaselineOutcome> {
        let validation = self.validate(train_edges, val_edges)?;
        let phase = self.fit_final(train_edges, val_edges)?;
        let predictions = phase.predict(test_edges, self.threshold)?;
        tracing::info!(
            test = predictions.len(),
            positive = predictions.iter().filter(|p| p.label.is_positive()).count(),
            "phase B: predicted test edges"
        );
        Ok(BaselineOutcome { validation, predictions })
    }
}

/// The trivial baseline: every test edge labeled 0.
pub fn zero_baseline(test_edges: &[Edge]) -> Vec<Prediction> {
    test_edges
        .iter()
        .map(|edge| Prediction { key: edge.key(), probability: 0.0, label: Label::Negative })
        .collect()
}

/// Read the three splits named in `config`, run both phases and write the
/// submission file.
pub fn run_from_config(config: &BaselineConfig) -> Result<BaselineOutcome> {
    let paths = &config.paths;
    let train_edges = io::read_labeled_edges(&paths.train)?;
    let val_edges = io::read_labeled_edges(&paths.val)?;
    let test_edges = io::read_unlabeled_edges(&paths.test)?;

    let outcome = Baseline::from_config(config).run(&train_edges, &val_edges, &test_edges)?;

    io::write_predictions_file(&paths.output, outcome.rows())?;
    tracing::info!(path = %paths.output.display(), rows = outcome.predictions.len(), "wrote submission");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::model::NodeId;

    fn e(s: u64, t: u64, l: u8) -> Edge {
        Edge::labeled(s, t, if l == 1 { Label::Positive } else { Label::Negative })
    }

    #[test]
    fn phases_do_not_share_statistics() {
        let train = [e(1, 2, 1), e(2, 3, 0)];
        let val = [e(3, 4, 1)];
        let baseline = Baseline::default();

        let phase_a = FittedPhase::fit(&train, &baseline.train).unwrap();
        assert!(!phase_a.stats.contains(NodeId(4)));
        assert_eq!(phase_a.stats.get(NodeId(3)).total, 1);

        let phase_b = baseline.fit_final(&train, &val).unwrap();
        assert!(phase_b.stats.contains(NodeId(4)));
        assert_eq!(phase_b.stats.get(NodeId(3)).total, 2);
        assert_ne!(phase_a.standardizer, phase_b.standardizer);
    }

    #[test]
    fn predictions_follow_input_order() {
        let train = [e(1, 2, 1), e(2, 3, 0), e(1, 3, 1), e(4, 4, 0)];
        let test = [Edge::unlabeled(4, 4), Edge::unlabeled(1, 2), Edge::unlabeled(9, 9)];
        let out = Baseline::default().run(&train, &[], &test).unwrap();
        assert!(out.validation.is_none());
        let keys: Vec<EdgeKey> = out.predictions.iter().map(|p| p.key).collect();
        assert_eq!(keys, vec![EdgeKey::new(4, 4), EdgeKey::new(1, 2), EdgeKey::new(9, 9)]);
        for p in &out.predictions {
            assert!((0.0..=1.0).contains(&p.probability));
        }
    }

    #[test]
    fn empty_test_split_yields_no_rows() {
        let out = Baseline::default().run(&[e(1, 2, 1)], &[e(1, 2, 1)], &[]).unwrap();
        assert!(out.predictions.is_empty());
        assert!(out.validation.is_some());
    }

    #[test]
    fn empty_train_split_is_an_error() {
        let err = Baseline::default().run(&[], &[], &[Edge::unlabeled(1, 2)]).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn zero_baseline_labels_everything_negative() {
        let rows = zero_baseline(&[Edge::unlabeled(1, 2), Edge::unlabeled(3, 4)]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|p| p.label == Label::Negative));
        assert_eq!(rows[1].key, EdgeKey::new(3, 4));
    }
}
