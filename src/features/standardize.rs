//! Per-feature standardization (zero mean, unit variance).
//!
//! Parameters are fitted on exactly one reference dataset and replayed
//! verbatim on every other dataset of the same phase.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Standard deviations below this are treated as a constant feature.
pub const STD_FLOOR: f64 = 1e-6;

/// Fitted per-index mean and population standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl Standardizer {
    /// Fit on a non-empty set of equal-width rows.
    ///
    /// Any index whose population std is below [`STD_FLOOR`] gets std 1.0, so
    /// near-constant features are centered but not amplified.
    pub fn fit<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::EmptyInput("standardizer fit: no feature vectors".into()))?;
        let width = first.as_ref().len();
        check_widths("standardizer fit", rows, width)?;

        let n = rows.len() as f64;

        let mut mean = vec![0.0; width];
        for (j, m) in mean.iter_mut().enumerate() {
            let sum: f64 = rows.iter().map(|row| row.as_ref()[j]).sum();
            *m = sum / n;
        }

        let mut std = vec![0.0; width];
        for (j, s) in std.iter_mut().enumerate() {
            let sq: f64 = rows.iter().map(|row| (row.as_ref()[j] - mean[j]).powi(2)).sum();
            *s = (sq / n).sqrt();
            if *s < STD_FLOOR {
                *s = 1.0;
            }
        }

        Ok(Self { mean, std })
    }

    /// Rebuild from previously fitted parameters.
    pub fn from_parts(mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        if mean.len() != std.len() {
            return Err(Error::ShapeMismatch {
                stage: "standardizer parameters",
                expected: mean.len(),
                got: std.len(),
            });
        }
        Ok(Self { mean, std })
    }

    /// Apply the fitted transform. Never re-derives mean or std.
    ///
    /// An empty `rows` yields an empty result.
    pub fn transform<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<Vec<f64>>> {
        check_widths("standardizer transform", rows, self.width())?;
        Ok(rows.iter().map(|row| self.transform_row(row.as_ref())).collect())
    }

    /// Fit on `rows` and transform them in one step.
    pub fn fit_transform<R: AsRef<[f64]>>(rows: &[R]) -> Result<(Self, Vec<Vec<f64>>)> {
        let fitted = Self::fit(rows)?;
        let transformed = fitted.transform(rows)?;
        Ok((fitted, transformed))
    }

    fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (m, s))| (x - m) / s)
            .collect()
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }
}

pub(crate) fn check_widths<R: AsRef<[f64]>>(stage: &'static str, rows: &[R], width: usize) -> Result<()> {
    match rows.iter().map(|row| row.as_ref().len()).find(|&w| w != width) {
        Some(got) => Err(Error::ShapeMismatch { stage, expected: width, got }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_computes_population_statistics() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
        let s = Standardizer::fit(&rows).unwrap();
        assert_eq!(s.mean(), &[2.0, 10.0]);
        // population std of {1, 3} is 1.0; constant column is clamped to 1.0
        assert_eq!(s.std(), &[1.0, 1.0]);
    }

    #[test]
    fn transform_round_trip() {
        let rows = vec![vec![1.0, 5.0], vec![2.0, 7.0], vec![6.0, 9.0], vec![3.0, 3.0]];
        let (_, z) = Standardizer::fit_transform(&rows).unwrap();
        for j in 0..2 {
            let n = z.len() as f64;
            let mean: f64 = z.iter().map(|r| r[j]).sum::<f64>() / n;
            let var: f64 = z.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n;
            assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
            assert_relative_eq!(var.sqrt(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn near_constant_feature_is_clamped() {
        let rows = vec![vec![4.0], vec![4.0 + 1e-9], vec![4.0]];
        let s = Standardizer::fit(&rows).unwrap();
        assert_eq!(s.std(), &[1.0]);
        let z = s.transform(&[vec![5.0]]).unwrap();
        assert_relative_eq!(z[0][0], 5.0 - s.mean()[0], epsilon = 1e-12);
    }

    #[test]
    fn transform_reuses_fitted_parameters() {
        let s = Standardizer::fit(&[vec![0.0], vec![2.0]]).unwrap();
        let z = s.transform(&[vec![10.0], vec![10.0], vec![10.0]]).unwrap();
        // not refit: a constant column maps to (10 - 1) / 1
        assert_eq!(z, vec![vec![9.0], vec![9.0], vec![9.0]]);
        assert_eq!(s.mean(), &[1.0]);
    }

    #[test]
    fn empty_fit_is_rejected() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(Standardizer::fit(&rows), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            Standardizer::fit(&rows),
            Err(Error::ShapeMismatch { expected: 2, got: 1, .. })
        ));

        let s = Standardizer::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            s.transform(&[vec![1.0, 2.0, 3.0]]),
            Err(Error::ShapeMismatch { expected: 2, got: 3, .. })
        ));
    }

    #[test]
    fn empty_transform_is_empty() {
        let s = Standardizer::fit(&[vec![1.0]]).unwrap();
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(s.transform(&rows).unwrap().is_empty());
    }

    #[test]
    fn from_parts_checks_lengths() {
        assert!(Standardizer::from_parts(vec![0.0; 3], vec![1.0; 3]).is_ok());
        assert!(Standardizer::from_parts(vec![0.0; 3], vec![1.0; 2]).is_err());
    }
}
