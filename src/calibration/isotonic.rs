//! Isotonic regression calibration

use crate::calibration::{MonotonicFitter, MonotonicRegressor};
use crate::error::{PavError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Fitted isotonic regression
///
/// Non-parametric calibration that fits a monotonically increasing step
/// function with the pool adjacent violators algorithm (PAVA). Predictions
/// interpolate linearly between thresholds; raw scores outside the fitted
/// range are clipped to the boundary thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IsotonicThresholds", into = "IsotonicThresholds")]
pub struct IsotonicRegression {
    /// Fitted x values, strictly increasing
    x_thresholds: Vec<f64>,
    /// Fitted y values, non-decreasing
    y_thresholds: Vec<f64>,
}

/// Serialized form, validated on load
#[derive(Serialize, Deserialize)]
struct IsotonicThresholds {
    x: Vec<f64>,
    y: Vec<f64>,
}

/// A pool of adjacent points sharing one fitted value
#[derive(Clone, Copy)]
struct Block {
    sum_wy: f64,
    sum_w: f64,
    len: usize,
}

impl Block {
    fn value(&self) -> f64 {
        self.sum_wy / self.sum_w
    }
}

impl IsotonicRegression {
    /// Fit on raw scores and binary (or fractional) labels
    pub fn fit(scores: ArrayView1<f64>, labels: ArrayView1<f64>) -> Result<Self> {
        let n = scores.len();
        if n != labels.len() {
            return Err(PavError::ValidationError(
                "Scores and labels must have same length".to_string(),
            ));
        }
        if n == 0 {
            return Err(PavError::ValidationError("Empty input".to_string()));
        }
        if scores.iter().chain(labels.iter()).any(|v| !v.is_finite()) {
            return Err(PavError::ValidationError(
                "Scores and labels must be finite".to_string(),
            ));
        }

        // Sort by score
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

        // Pool tied scores: mean label, weighted by multiplicity
        let mut x_unique: Vec<f64> = Vec::with_capacity(n);
        let mut y_mean: Vec<f64> = Vec::with_capacity(n);
        let mut weights: Vec<f64> = Vec::with_capacity(n);
        for &i in &indices {
            match x_unique.last() {
                Some(&last) if last == scores[i] => {
                    let k = weights.len() - 1;
                    y_mean[k] = (y_mean[k] * weights[k] + labels[i]) / (weights[k] + 1.0);
                    weights[k] += 1.0;
                }
                _ => {
                    x_unique.push(scores[i]);
                    y_mean.push(labels[i]);
                    weights.push(1.0);
                }
            }
        }

        let y_fit = Self::pava(&y_mean, &weights);
        Ok(Self::build_function(x_unique, y_fit))
    }

    /// Create from explicit thresholds
    ///
    /// `x` must be finite and strictly increasing, `y` finite and
    /// non-decreasing, both of the same non-zero length.
    pub fn from_thresholds(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(PavError::ValidationError(format!(
                "Threshold arrays must be non-empty and equally long (x: {}, y: {})",
                x.len(),
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(PavError::ValidationError(
                "Thresholds must be finite".to_string(),
            ));
        }
        if x.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PavError::ValidationError(
                "x thresholds must be strictly increasing".to_string(),
            ));
        }
        if y.windows(2).any(|w| w[0] > w[1]) {
            return Err(PavError::ValidationError(
                "y thresholds must be non-decreasing".to_string(),
            ));
        }
        Ok(Self {
            x_thresholds: x,
            y_thresholds: y,
        })
    }

    pub fn x_thresholds(&self) -> &[f64] {
        &self.x_thresholds
    }

    pub fn y_thresholds(&self) -> &[f64] {
        &self.y_thresholds
    }

    /// Pool Adjacent Violators Algorithm (PAVA)
    fn pava(y: &[f64], weights: &[f64]) -> Vec<f64> {
        let mut blocks: Vec<Block> = Vec::with_capacity(y.len());

        for (&yi, &wi) in y.iter().zip(weights) {
            blocks.push(Block {
                sum_wy: yi * wi,
                sum_w: wi,
                len: 1,
            });
            // Merge backwards while the last two pools violate monotonicity
            while blocks.len() > 1 {
                let last = blocks[blocks.len() - 1];
                let prev = blocks[blocks.len() - 2];
                if prev.value() <= last.value() {
                    break;
                }
                blocks.pop();
                if let Some(merged) = blocks.last_mut() {
                    merged.sum_wy += last.sum_wy;
                    merged.sum_w += last.sum_w;
                    merged.len += last.len;
                }
            }
        }

        blocks
            .iter()
            .flat_map(|block| std::iter::repeat(block.value()).take(block.len))
            .collect()
    }

    /// Build the interpolation function from the PAVA result
    ///
    /// Interior points of a constant run are redundant for linear
    /// interpolation; only the first and last point of each run are kept.
    fn build_function(x_sorted: Vec<f64>, y_isotonic: Vec<f64>) -> Self {
        let n = x_sorted.len();
        let mut x_vals = Vec::with_capacity(n);
        let mut y_vals = Vec::with_capacity(n);

        for i in 0..n {
            let run_start = i == 0 || y_isotonic[i] != y_isotonic[i - 1];
            let run_end = i + 1 == n || y_isotonic[i] != y_isotonic[i + 1];
            if run_start || run_end {
                x_vals.push(x_sorted[i]);
                y_vals.push(y_isotonic[i].clamp(0.0, 1.0));
            }
        }

        Self {
            x_thresholds: x_vals,
            y_thresholds: y_vals,
        }
    }

    /// Interpolate calibrated value
    fn interpolate(&self, x: f64) -> f64 {
        let x_vals = &self.x_thresholds;
        let y_vals = &self.y_thresholds;
        let last = x_vals.len() - 1;

        if x.is_nan() || x <= x_vals[0] {
            return y_vals[0];
        }
        if x >= x_vals[last] {
            return y_vals[last];
        }

        // First threshold strictly greater than x; 1 <= hi <= last here
        let hi = x_vals.partition_point(|&v| v <= x);
        let lo = hi - 1;

        let (x0, x1) = (x_vals[lo], x_vals[hi]);
        let (y0, y1) = (y_vals[lo], y_vals[hi]);
        let t = (x - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }
}

impl MonotonicRegressor for IsotonicRegression {
    fn predict(&self, raw_score: f64) -> f64 {
        self.interpolate(raw_score).clamp(0.0, 1.0)
    }

    fn input_range(&self) -> (f64, f64) {
        (
            self.x_thresholds[0],
            self.x_thresholds[self.x_thresholds.len() - 1],
        )
    }
}

impl TryFrom<IsotonicThresholds> for IsotonicRegression {
    type Error = PavError;

    fn try_from(value: IsotonicThresholds) -> Result<Self> {
        Self::from_thresholds(value.x, value.y)
    }
}

impl From<IsotonicRegression> for IsotonicThresholds {
    fn from(value: IsotonicRegression) -> Self {
        Self {
            x: value.x_thresholds,
            y: value.y_thresholds,
        }
    }
}

/// Default fitter producing [`IsotonicRegression`] models with clipping
#[derive(Debug, Clone, Copy, Default)]
pub struct IsotonicFitter;

impl MonotonicFitter for IsotonicFitter {
    type Model = IsotonicRegression;

    fn fit(&self, scores: ArrayView1<f64>, labels: ArrayView1<f64>) -> Result<IsotonicRegression> {
        IsotonicRegression::fit(scores, labels)
    }
}
