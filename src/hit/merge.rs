//! Weighted merging of hit lists

use super::AnalysisResult;
use crate::subject::SubjectIndex;
use ndarray::Array1;

/// Calibrated hits of one source together with the source's ensemble weight
#[derive(Debug, Clone)]
pub struct WeightedHits {
    pub hits: AnalysisResult,
    pub weight: f64,
}

impl WeightedHits {
    pub fn new(hits: AnalysisResult, weight: f64) -> Self {
        Self { hits, weight }
    }
}

/// Merge weighted hit lists into one ranked result over `index`
///
/// Every list is projected onto the target vocabulary, scaled by its weight
/// and summed. Concepts outside the target vocabulary contribute nothing;
/// concepts no source suggested keep an aggregate score of 0.
pub fn merge_hits(weighted_hits: &[WeightedHits], index: &SubjectIndex) -> AnalysisResult {
    let mut total: Array1<f64> = Array1::zeros(index.len());
    for weighted in weighted_hits {
        total.scaled_add(weighted.weight, &weighted.hits.vector_for(index));
    }
    AnalysisResult::from_vector(&total, index)
}
