//! L2-regularized batch gradient descent.

use serde::{Deserialize, Serialize};

use super::{LogisticModel, sigmoid};
use crate::features::standardize::check_widths;
use crate::model::Label;
use crate::{Error, Result};

/// Epsilon inside every logarithm of the log-loss.
const LOG_EPS: f64 = 1e-9;

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
    /// Emit the loss every `log_every` epochs (and on the last one).
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            epochs: 300,
            l2: 1e-4,
            log_every: 50,
        }
    }
}

impl TrainConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }
}

/// A fitted model and its per-epoch loss trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub model: LogisticModel,
    /// Regularized log-loss of each epoch, measured before that epoch's update.
    pub losses: Vec<f64>,
}

impl Training {
    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

/// Fit a logistic model on standardized `rows` and parallel `labels`.
///
/// Weights and bias start at zero and every epoch is a full pass, so the
/// result is a pure function of the inputs and `config`. There is no early
/// stopping: exactly `config.epochs` updates are applied.
pub fn train<R: AsRef<[f64]>>(rows: &[R], labels: &[Label], config: &TrainConfig) -> Result<Training> {
    let first = rows
        .first()
        .ok_or_else(|| Error::EmptyInput("trainer: zero training samples".into()))?;
    let width = first.as_ref().len();
    check_widths("trainer", rows, width)?;
    if rows.len() != labels.len() {
        return Err(Error::LengthMismatch {
            stage: "trainer",
            rows: rows.len(),
            labels: labels.len(),
        });
    }

    let n = rows.len() as f64;
    let mut model = LogisticModel::zeros(width);
    let mut losses = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        let mut grad_w = vec![0.0; width];
        let mut grad_b = 0.0;
        let mut loss = 0.0;

        for (x, label) in rows.iter().zip(labels) {
            let x = x.as_ref();
            let y = label.as_f64();
            let pred = sigmoid(model.decision(x));
            let error = pred - y;
            for (g, xj) in grad_w.iter_mut().zip(x) {
                *g += error * xj;
            }
            grad_b += error;

            loss += -(y * (pred + LOG_EPS).ln() + (1.0 - y) * (1.0 - pred + LOG_EPS).ln());
        }

        for (g, w) in grad_w.iter_mut().zip(&model.weights) {
            *g = *g / n + config.l2 * w;
        }
        grad_b /= n;
        let penalty: f64 = model.weights.iter().map(|w| w * w).sum();
        loss = loss / n + (config.l2 / 2.0) * penalty;

        for (w, g) in model.weights.iter_mut().zip(&grad_w) {
            *w -= config.learning_rate * g;
        }
        model.bias -= config.learning_rate * grad_b;

        if config.log_every > 0 && (epoch % config.log_every == 0 || epoch + 1 == config.epochs) {
            tracing::info!(epoch, loss, "training");
        }
        losses.push(loss);
    }

    Ok(Training { model, losses })
}
