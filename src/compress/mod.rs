//! Sufficient-statistics compression for Gaussian-likelihood regression.
//!
//! A dataset whose predictor matrix contains repeated rows carries redundant
//! information for a Gaussian likelihood: observations sharing the same
//! predictor vector contribute to the likelihood only through their count,
//! outcome sum, and squared-outcome sum. [`compress`] deduplicates the rows
//! and accumulates exactly those three statistics per unique row, so the
//! downstream sampler sees N' <= N rows with no loss of inferential
//! information.
//!
//! Row equality is exact value equality, not tolerance-based. Callers feeding
//! floating-point features with representation noise will see little or no
//! compression; that is the documented behavior, not something this module
//! papers over.

use crate::error::{CondensarError, Result};
use crate::primitives::{Matrix, Vector};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Deduplicated predictor rows with per-row sufficient statistics.
///
/// Produced by [`compress`]; immutable afterward. Rows appear in order of
/// first occurrence in the input, and the three statistic arrays are aligned
/// with the rows of [`unique_x`](Self::unique_x).
///
/// # Invariants
///
/// - `sum(weights) == N` (the original observation count), exactly.
/// - For every position `p`, `y_sum[p] / weights[p]` is the arithmetic mean
///   of the outcomes whose predictor row maps to `p` (up to floating-point
///   accumulation error).
///
/// # Examples
///
/// ```
/// use condensar::compress::compress;
/// use condensar::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(3, 2, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 10.0]);
///
/// let bundle = compress(&y, &x).unwrap();
/// assert_eq!(bundle.n_unique(), 2);
/// assert_eq!(bundle.weights(), &[2, 1]);
/// assert_eq!(bundle.y_sum().as_slice(), &[6.0, 10.0]);
/// assert_eq!(bundle.y_squared_sum().as_slice(), &[20.0, 100.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedBundle {
    unique_x: Matrix<f64>,
    y_sum: Vector<f64>,
    y_squared_sum: Vector<f64>,
    weights: Vec<u64>,
    assignments: Vec<usize>,
}

impl CompressedBundle {
    /// Number of unique predictor rows (N').
    #[must_use]
    pub fn n_unique(&self) -> usize {
        self.weights.len()
    }

    /// Number of predictor columns (K), unchanged from the input.
    #[must_use]
    pub fn n_predictors(&self) -> usize {
        self.unique_x.n_cols()
    }

    /// Number of original observations (N), recovered from the weights.
    #[must_use]
    pub fn n_observations(&self) -> usize {
        self.assignments.len()
    }

    /// The N'xK matrix of unique predictor rows, in first-occurrence order.
    #[must_use]
    pub fn unique_x(&self) -> &Matrix<f64> {
        &self.unique_x
    }

    /// Sum of outcomes per unique row.
    #[must_use]
    pub fn y_sum(&self) -> &Vector<f64> {
        &self.y_sum
    }

    /// Sum of squared outcomes per unique row.
    #[must_use]
    pub fn y_squared_sum(&self) -> &Vector<f64> {
        &self.y_squared_sum
    }

    /// Observation count per unique row.
    #[must_use]
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Back-reference from each original row index to its unique-row position.
    #[must_use]
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Mean outcome per unique row (`y_sum / weight`).
    #[must_use]
    pub fn group_means(&self) -> Vector<f64> {
        let means: Vec<f64> = self
            .y_sum
            .iter()
            .zip(&self.weights)
            .map(|(&s, &w)| s / w as f64)
            .collect();
        Vector::from_vec(means)
    }

    /// Exports the bundle under the field names the external sampler binds to.
    ///
    /// Matches the original Stan data contract: `N`, `K`, `X`, `y_sum`,
    /// `y_squared_sum`, `weights`.
    #[must_use]
    pub fn to_sampler_data(&self) -> serde_json::Value {
        json!({
            "N": self.n_unique(),
            "K": self.n_predictors(),
            "X": self.unique_x.to_rows(),
            "y_sum": self.y_sum.as_slice(),
            "y_squared_sum": self.y_squared_sum.as_slice(),
            "weights": self.weights,
        })
    }
}

/// Hashable key for exact row equality. -0.0 is canonicalized to 0.0 so the
/// key respects value equality; NaNs group by their bit pattern.
fn row_key(row: &[f64]) -> Vec<u64> {
    row.iter()
        .map(|&v| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
        .collect()
}

/// Compresses a response vector and predictor matrix into sufficient
/// statistics over the unique predictor rows.
///
/// Pure function: no shared state, safe to call concurrently on independent
/// inputs. An empty input (N = 0) yields an empty bundle. When all rows are
/// distinct the result degenerates to a one-to-one passthrough with all
/// weights equal to 1, in input row order.
///
/// # Errors
///
/// Returns [`CondensarError::DimensionMismatch`] if `y.len() != x.n_rows()`.
///
/// # Examples
///
/// ```
/// use condensar::compress::compress;
/// use condensar::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 1.0, 2.0]).unwrap();
/// let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0]);
///
/// let bundle = compress(&y, &x).unwrap();
/// assert_eq!(bundle.n_unique(), 2);
/// assert_eq!(bundle.weights().iter().sum::<u64>(), 4);
/// ```
pub fn compress(y: &Vector<f64>, x: &Matrix<f64>) -> Result<CompressedBundle> {
    let (n_rows, n_cols) = x.shape();

    if y.len() != n_rows {
        return Err(CondensarError::DimensionMismatch {
            expected: format!("{n_rows} outcomes for a {n_rows}x{n_cols} predictor matrix"),
            actual: format!("{}", y.len()),
        });
    }

    let mut positions: HashMap<Vec<u64>, usize> = HashMap::with_capacity(n_rows);
    let mut unique_data: Vec<f64> = Vec::new();
    let mut weights: Vec<u64> = Vec::new();
    let mut y_sum: Vec<f64> = Vec::new();
    let mut y_squared_sum: Vec<f64> = Vec::new();
    let mut assignments: Vec<usize> = Vec::with_capacity(n_rows);

    for i in 0..n_rows {
        let row = x.row_slice(i);
        let pos = match positions.entry(row_key(row)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let pos = weights.len();
                entry.insert(pos);
                unique_data.extend_from_slice(row);
                weights.push(0);
                y_sum.push(0.0);
                y_squared_sum.push(0.0);
                pos
            }
        };
        weights[pos] += 1;
        y_sum[pos] += y[i];
        y_squared_sum[pos] += y[i] * y[i];
        assignments.push(pos);
    }

    let n_unique = weights.len();
    debug!("compressed {n_rows} observations into {n_unique} unique predictor rows");

    Ok(CompressedBundle {
        unique_x: Matrix::from_vec(n_unique, n_cols, unique_data)?,
        y_sum: Vector::from_vec(y_sum),
        y_squared_sum: Vector::from_vec(y_squared_sum),
        weights,
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rows_aggregate() {
        // The reference scenario: two identical rows and one distinct.
        let x = Matrix::from_vec(3, 2, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let y = Vector::from_slice(&[2.0, 4.0, 10.0]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.n_unique(), 2);
        assert_eq!(bundle.n_predictors(), 2);
        assert_eq!(bundle.unique_x().row_slice(0), &[0.0, 0.0]);
        assert_eq!(bundle.unique_x().row_slice(1), &[1.0, 1.0]);
        assert_eq!(bundle.weights(), &[2, 1]);
        assert_eq!(bundle.y_sum().as_slice(), &[6.0, 10.0]);
        assert_eq!(bundle.y_squared_sum().as_slice(), &[20.0, 100.0]);
        assert_eq!(bundle.assignments(), &[0, 0, 1]);
    }

    #[test]
    fn test_empty_input() {
        let x: Matrix<f64> = Matrix::from_vec(0, 3, vec![]).unwrap();
        let y: Vector<f64> = Vector::from_vec(vec![]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.n_unique(), 0);
        assert_eq!(bundle.n_predictors(), 3);
        assert_eq!(bundle.n_observations(), 0);
        assert!(bundle.weights().is_empty());
        assert!(bundle.y_sum().is_empty());
        assert!(bundle.y_squared_sum().is_empty());
    }

    #[test]
    fn test_no_duplicates_is_passthrough() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let y = Vector::from_slice(&[10.0, 20.0, 30.0]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.n_unique(), 3);
        assert_eq!(bundle.unique_x(), &x);
        assert_eq!(bundle.weights(), &[1, 1, 1]);
        assert_eq!(bundle.y_sum(), &y);
        assert_eq!(
            bundle.y_squared_sum().as_slice(),
            &[100.0, 400.0, 900.0]
        );
        assert_eq!(bundle.assignments(), &[0, 1, 2]);
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let x = Matrix::from_vec(3, 2, vec![1.0; 6]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0]);

        let err = compress(&y, &x).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("3x2"), "message should carry shapes: {msg}");
        assert!(msg.contains('2'), "message should carry outcome length: {msg}");
    }

    #[test]
    fn test_weight_conservation() {
        let x = Matrix::from_vec(6, 2, vec![
            1.0, 0.0,
            0.0, 1.0,
            1.0, 0.0,
            1.0, 0.0,
            0.0, 1.0,
            2.0, 2.0,
        ])
        .unwrap();
        let y = Vector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.n_unique(), 3);
        assert_eq!(bundle.weights().iter().sum::<u64>(), 6);
        // Total outcome mass is preserved.
        assert!((bundle.y_sum().sum() - y.sum()).abs() < 1e-12);
    }

    #[test]
    fn test_group_means_match_observation_averages() {
        let x = Matrix::from_vec(4, 1, vec![5.0, 5.0, 7.0, 5.0]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0, 9.0, 3.0]);

        let bundle = compress(&y, &x).unwrap();
        let means = bundle.group_means();

        assert!((means[0] - 2.0).abs() < 1e-12); // (1+2+3)/3
        assert!((means[1] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_zero_groups_with_zero() {
        let x = Matrix::from_vec(2, 1, vec![0.0, -0.0]).unwrap();
        let y = Vector::from_slice(&[1.0, 3.0]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.n_unique(), 1);
        assert_eq!(bundle.weights(), &[2]);
        assert_eq!(bundle.y_sum().as_slice(), &[4.0]);
    }

    #[test]
    fn test_nearly_equal_rows_stay_distinct() {
        // Exact equality only: representation noise under-compresses.
        let x = Matrix::from_vec(2, 1, vec![1.0, 1.0 + f64::EPSILON]).unwrap();
        let y = Vector::from_slice(&[1.0, 1.0]);

        let bundle = compress(&y, &x).unwrap();
        assert_eq!(bundle.n_unique(), 2);
    }

    #[test]
    fn test_first_occurrence_ordering() {
        let x = Matrix::from_vec(4, 1, vec![9.0, 3.0, 9.0, 1.0]).unwrap();
        let y = Vector::from_slice(&[1.0, 1.0, 1.0, 1.0]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.unique_x().as_slice(), &[9.0, 3.0, 1.0]);
        assert_eq!(bundle.assignments(), &[0, 1, 0, 2]);
    }

    #[test]
    fn test_zero_predictors() {
        // K = 0: every row is the same empty row.
        let x: Matrix<f64> = Matrix::from_vec(3, 0, vec![]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0, 3.0]);

        let bundle = compress(&y, &x).unwrap();

        assert_eq!(bundle.n_unique(), 1);
        assert_eq!(bundle.n_predictors(), 0);
        assert_eq!(bundle.weights(), &[3]);
        assert_eq!(bundle.y_sum().as_slice(), &[6.0]);
    }

    #[test]
    fn test_sampler_data_field_names() {
        let x = Matrix::from_vec(3, 2, vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let y = Vector::from_slice(&[2.0, 4.0, 10.0]);

        let data = compress(&y, &x).unwrap().to_sampler_data();

        assert_eq!(data["N"], 2);
        assert_eq!(data["K"], 2);
        assert_eq!(data["X"][1][0], 1.0);
        assert_eq!(data["y_sum"][0], 6.0);
        assert_eq!(data["y_squared_sum"][1], 100.0);
        assert_eq!(data["weights"][0], 2);
    }

    #[test]
    fn test_bundle_serde_round_trip() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 1.0, 2.0]).unwrap();
        let y = Vector::from_slice(&[1.0, 2.0, 3.0]);

        let bundle = compress(&y, &x).unwrap();
        let json = serde_json::to_string(&bundle).unwrap();
        let back: CompressedBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(bundle, back);
    }
}
