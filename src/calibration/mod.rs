//! Score calibration module
//!
//! Provides the monotonic regression capability the ensemble calibrates with:
//! - [`MonotonicRegressor`]: a fitted non-decreasing `raw score -> probability` map
//! - [`MonotonicFitter`]: the injected fitting routine producing regressors
//! - Isotonic regression (pool adjacent violators) as the default fitter
//! - Calibration metrics (Brier score, ECE)

mod isotonic;
mod metrics;

pub use isotonic::{IsotonicFitter, IsotonicRegression};
pub use metrics::{brier_score, expected_calibration_error, reliability_diagram, ReliabilityDiagram};

use crate::error::Result;
use ndarray::{Array1, ArrayView1};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A fitted monotonic calibration function for one concept
///
/// Implementations must be non-decreasing in the raw score and must clip
/// inputs outside the trained range to the boundary values rather than
/// extrapolate.
pub trait MonotonicRegressor: Send + Sync {
    /// Calibrated probability for a raw score
    fn predict(&self, raw_score: f64) -> f64;

    /// Calibrate a batch of scores
    fn predict_batch(&self, raw_scores: ArrayView1<f64>) -> Array1<f64> {
        raw_scores.mapv(|score| self.predict(score))
    }

    /// Lowest and highest raw score seen during fitting
    fn input_range(&self) -> (f64, f64);
}

/// Fits monotonic regressors from raw scores and binary labels
pub trait MonotonicFitter: Send + Sync {
    /// Regressor type produced, persisted as part of a calibration artifact
    type Model: MonotonicRegressor + Serialize + DeserializeOwned;

    /// Fit a regressor mapping `scores` onto `labels`
    fn fit(&self, scores: ArrayView1<f64>, labels: ArrayView1<f64>) -> Result<Self::Model>;
}
