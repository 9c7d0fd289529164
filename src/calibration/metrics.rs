//! Calibration metrics

use crate::error::{PavError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Reliability diagram data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityDiagram {
    /// Bin edges
    pub bin_edges: Vec<f64>,
    /// Mean predicted probability in each bin
    pub bin_confidences: Vec<f64>,
    /// Fraction of positives in each bin
    pub bin_accuracies: Vec<f64>,
    /// Number of samples in each bin
    pub bin_counts: Vec<usize>,
}

fn check_lengths(probs: &ArrayView1<f64>, labels: &ArrayView1<f64>) -> Result<()> {
    if probs.len() != labels.len() {
        return Err(PavError::ValidationError(
            "Probabilities and labels must have same length".to_string(),
        ));
    }
    if probs.is_empty() {
        return Err(PavError::ValidationError("Empty input".to_string()));
    }
    Ok(())
}

/// Compute Brier Score
///
/// Brier = (1/n) * sum_i (p_i - y_i)^2
pub fn brier_score(probs: ArrayView1<f64>, labels: ArrayView1<f64>) -> Result<f64> {
    check_lengths(&probs, &labels)?;

    let n = probs.len() as f64;
    let score: f64 = probs
        .iter()
        .zip(labels.iter())
        .map(|(&p, &y)| (p - y).powi(2))
        .sum();

    Ok(score / n)
}

/// Compute Expected Calibration Error (ECE)
///
/// ECE = sum_i (|B_i| / n) * |acc(B_i) - conf(B_i)|
///
/// Scores outside `[0, 1]` fall into the first or last bin.
pub fn expected_calibration_error(
    probs: ArrayView1<f64>,
    labels: ArrayView1<f64>,
    n_bins: usize,
) -> Result<f64> {
    let reliability = reliability_diagram(probs, labels, n_bins)?;

    let n = probs.len() as f64;
    let mut ece = 0.0;

    for i in 0..reliability.bin_counts.len() {
        let count = reliability.bin_counts[i] as f64;
        if count > 0.0 {
            let acc = reliability.bin_accuracies[i];
            let conf = reliability.bin_confidences[i];
            ece += (count / n) * (acc - conf).abs();
        }
    }

    Ok(ece)
}

/// Compute reliability diagram data
pub fn reliability_diagram(
    probs: ArrayView1<f64>,
    labels: ArrayView1<f64>,
    n_bins: usize,
) -> Result<ReliabilityDiagram> {
    check_lengths(&probs, &labels)?;

    let n_bins = n_bins.max(1);
    let bin_width = 1.0 / n_bins as f64;

    let bin_edges: Vec<f64> = (0..=n_bins).map(|i| i as f64 * bin_width).collect();

    let mut bin_sums = vec![0.0; n_bins];
    let mut bin_correct = vec![0.0; n_bins];
    let mut bin_counts = vec![0usize; n_bins];

    for (&p, &y) in probs.iter().zip(labels.iter()) {
        // Float-to-int casts saturate, so negative scores land in bin 0
        let bin_idx = ((p / bin_width) as usize).min(n_bins - 1);
        bin_sums[bin_idx] += p;
        bin_correct[bin_idx] += y;
        bin_counts[bin_idx] += 1;
    }

    let mean = |total: &f64, count: &usize| {
        if *count > 0 {
            total / *count as f64
        } else {
            0.0
        }
    };
    let bin_confidences = bin_sums.iter().zip(&bin_counts).map(|(s, c)| mean(s, c)).collect();
    let bin_accuracies = bin_correct.iter().zip(&bin_counts).map(|(s, c)| mean(s, c)).collect();

    Ok(ReliabilityDiagram {
        bin_edges,
        bin_confidences,
        bin_accuracies,
        bin_counts,
    })
}
