//! Applying a fitted model.

use super::LogisticModel;
use crate::model::Label;

/// Lazy per-row probabilities. Cloning restarts from the current position.
#[derive(Debug)]
pub struct Probabilities<'a, R> {
    model: &'a LogisticModel,
    rows: std::slice::Iter<'a, R>,
}

impl<R> Clone for Probabilities<'_, R> {
    fn clone(&self) -> Self {
        Self { model: self.model, rows: self.rows.clone() }
    }
}

impl<'a, R: AsRef<[f64]>> Iterator for Probabilities<'a, R> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.rows.next().map(|row| self.model.probability(row.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<R: AsRef<[f64]>> ExactSizeIterator for Probabilities<'_, R> {}

impl LogisticModel {
    /// Probabilities of a positive label for standardized `rows`, in order.
    pub fn predict_proba<'a, R: AsRef<[f64]>>(&'a self, rows: &'a [R]) -> Probabilities<'a, R> {
        Probabilities { model: self, rows: rows.iter() }
    }

    /// Thresholded labels for standardized `rows`.
    pub fn predict<R: AsRef<[f64]>>(&self, rows: &[R], threshold: f64) -> Vec<Label> {
        classify(self.predict_proba(rows), threshold)
    }
}

/// Map each probability to `Positive` when `p >= threshold`.
pub fn classify(probs: impl IntoIterator<Item = f64>, threshold: f64) -> Vec<Label> {
    probs.into_iter().map(|p| Label::from_probability(p, threshold)).collect()
}
