//! # Submission Scoring
//!
//! One scorer for every competition format. A [`SubmissionSchema`] says which
//! two columns form the join key and which column carries the prediction;
//! everything else (validation, confusion matrix, weighted score) is shared.
//!
//! A submission is either scored as a whole or rejected as a whole: a
//! missing key or a prediction outside {0, 1} is a [`Rejection`], never a
//! wrong answer.

use std::path::Path;

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::io::{self, Table, TableRow};
use crate::metrics::{ConfusionMatrix, ScoreWeights};
use crate::model::Label;

// ============================================================================
// Schema
// ============================================================================

/// How to read a submission and its ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSchema {
    /// The two columns that identify a sample in both files.
    pub key_columns: [String; 2],
    /// Prediction column in the submission.
    pub prediction_column: String,
    /// Label column in the ground truth.
    pub truth_label_column: String,
    /// Reject when the submission and the truth differ in sample count.
    pub require_matching_count: bool,
}

impl SubmissionSchema {
    /// Cell-cell interaction edges: `source,target,label`.
    pub fn cci() -> Self {
        Self {
            key_columns: ["source".into(), "target".into()],
            prediction_column: "label".into(),
            truth_label_column: "label".into(),
            require_matching_count: true,
        }
    }

    /// Protein-protein interaction pairs: `protein_A,protein_B,prediction`.
    pub fn ppi() -> Self {
        Self {
            key_columns: ["protein_A".into(), "protein_B".into()],
            prediction_column: "prediction".into(),
            truth_label_column: "label".into(),
            require_matching_count: false,
        }
    }

    /// Columns a submission must carry.
    pub fn required_columns(&self) -> Vec<String> {
        let [a, b] = &self.key_columns;
        vec![a.clone(), b.clone(), self.prediction_column.clone()]
    }
}

// ============================================================================
// Verdicts
// ============================================================================

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("cannot read {what} file {path}: {message}")]
    Unreadable { what: &'static str, path: String, message: String },

    #[error("submission file is empty")]
    EmptySubmission,

    #[error("missing required column \"{column}\"; required columns: {required:?}")]
    MissingColumn { column: String, required: Vec<String> },

    #[error("submission has {submitted} samples but the test set has {expected}")]
    CountMismatch { submitted: usize, expected: usize },

    #[error("{count} samples missing from submission, e.g. {example}")]
    MissingSamples { count: usize, example: String },

    #[error("{count} invalid predictions (must be 0 or 1), e.g. {example} -> \"{value}\"")]
    InvalidPredictions { count: usize, example: String, value: String },

    #[error("no valid predictions to score")]
    NoValidSamples,

    #[error("malformed ground truth at line {line}: {message}")]
    MalformedTruth { line: usize, message: String },
}

/// Metrics of an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub final_score: f64,
    #[serde(flatten)]
    pub confusion: ConfusionMatrix,
    pub total: u64,
    pub scored_at: DateTime<Utc>,
}

/// JSON shape of a scoring verdict: `{"status": "success", ...metrics}` or
/// `{"status": "error", "error_message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Success(ScoreReport),
    Error { error_message: String },
}

impl From<Result<ScoreReport, Rejection>> for ScoreOutcome {
    fn from(result: Result<ScoreReport, Rejection>) -> Self {
        match result {
            Ok(report) => ScoreOutcome::Success(report),
            Err(rejection) => ScoreOutcome::Error { error_message: rejection.to_string() },
        }
    }
}

// ============================================================================
// Scorer
// ============================================================================

type SampleKey = (String, String);

/// Rows indexed by join key. Iteration follows first appearance; a repeated
/// key keeps its first position but takes the later row.
struct KeyedRows<'t> {
    order: Vec<SampleKey>,
    rows: HashMap<SampleKey, &'t TableRow>,
}

impl<'t> KeyedRows<'t> {
    fn index(table: &'t Table, key_idx: (usize, usize)) -> Self {
        let mut order = Vec::new();
        let mut rows = HashMap::new();
        for row in &table.rows {
            let key = (row.cell(key_idx.0).to_string(), row.cell(key_idx.1).to_string());
            if rows.insert(key.clone(), row).is_none() {
                order.push(key);
            }
        }
        Self { order, rows }
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

fn format_key(key: &SampleKey) -> String {
    format!("({}, {})", key.0, key.1)
}

/// Scores submissions for one schema.
#[derive(Debug, Clone)]
pub struct Scorer {
    schema: SubmissionSchema,
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(schema: SubmissionSchema) -> Self {
        Self { schema, weights: ScoreWeights::default() }
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn schema(&self) -> &SubmissionSchema {
        &self.schema
    }

    /// Load both files and score. Unreadable files are rejections.
    pub fn score_files(&self, submission: &Path, truth: &Path) -> Result<ScoreReport, Rejection> {
        let truth_table = load("label", truth)?;
        let submission_table = load("submission", submission)?;
        self.score_tables(&submission_table, &truth_table)
    }

    pub fn score_tables(&self, submission: &Table, truth: &Table) -> Result<ScoreReport, Rejection> {
        let [key_a, key_b] = &self.schema.key_columns;

        let truth_key = (
            truth_column(truth, key_a)?,
            truth_column(truth, key_b)?,
        );
        let truth_label = truth_column(truth, &self.schema.truth_label_column)?;
        let truth_rows = KeyedRows::index(truth, truth_key);

        if submission.is_empty() {
            return Err(Rejection::EmptySubmission);
        }
        let required = self.schema.required_columns();
        let column = |name: &str| {
            submission.column(name).map_err(|_| Rejection::MissingColumn {
                column: name.to_string(),
                required: required.clone(),
            })
        };
        let sub_key = (column(key_a)?, column(key_b)?);
        let prediction = column(&self.schema.prediction_column)?;
        let sub_rows = KeyedRows::index(submission, sub_key);

        if sub_rows.len() != truth_rows.len() {
            if self.schema.require_matching_count {
                return Err(Rejection::CountMismatch {
                    submitted: sub_rows.len(),
                    expected: truth_rows.len(),
                });
            }
            tracing::warn!(
                submitted = sub_rows.len(),
                expected = truth_rows.len(),
                "submission sample count differs from ground truth"
            );
        }

        let mut cm = ConfusionMatrix::default();
        let mut missing: Vec<&SampleKey> = Vec::new();
        let mut invalid: Vec<(&SampleKey, &str)> = Vec::new();

        for key in &truth_rows.order {
            let truth_row = truth_rows.rows[key];
            let truth_cell = truth_row.cell(truth_label);
            let actual = truth_cell
                .parse::<i64>()
                .ok()
                .and_then(|raw| Label::try_from(raw).ok())
                .ok_or_else(|| Rejection::MalformedTruth {
                    line: truth_row.line,
                    message: format!("label must be 0 or 1, got '{truth_cell}'"),
                })?;

            let Some(sub_row) = sub_rows.rows.get(key) else {
                missing.push(key);
                continue;
            };
            let cell = sub_row.cell(prediction);
            match cell.parse::<i64>().ok().and_then(|raw| Label::try_from(raw).ok()) {
                Some(predicted) => cm.record(actual, predicted),
                None => invalid.push((key, cell)),
            }
        }

        if let Some(first) = missing.first() {
            return Err(Rejection::MissingSamples { count: missing.len(), example: format_key(first) });
        }
        if let Some((key, value)) = invalid.first() {
            return Err(Rejection::InvalidPredictions {
                count: invalid.len(),
                example: format_key(key),
                value: value.to_string(),
            });
        }
        if cm.total() == 0 {
            return Err(Rejection::NoValidSamples);
        }

        let report = ScoreReport {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1(),
            final_score: self.weights.score(&cm),
            confusion: cm,
            total: cm.total(),
            scored_at: Utc::now(),
        };
        tracing::info!(
            accuracy = report.accuracy,
            f1 = report.f1,
            final_score = report.final_score,
            "submission scored"
        );
        Ok(report)
    }
}

fn load(what: &'static str, path: &Path) -> Result<Table, Rejection> {
    io::read_table(path).map_err(|e| Rejection::Unreadable {
        what,
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn truth_column(truth: &Table, name: &str) -> Result<usize, Rejection> {
    truth.column(name).map_err(|_| Rejection::MalformedTruth {
        line: 1,
        message: format!("missing column \"{name}\""),
    })
}
