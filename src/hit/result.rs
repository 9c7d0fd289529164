//! Ranked analysis results

use crate::subject::SubjectIndex;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A single suggestion produced for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHit {
    /// Concept URI
    pub uri: String,
    /// Concept label
    pub label: String,
    /// Raw or calibrated score
    pub score: f64,
}

impl AnalysisHit {
    /// Create a new hit
    pub fn new(uri: impl Into<String>, label: impl Into<String>, score: f64) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
            score,
        }
    }
}

/// Hits for one document, ranked by descending score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    hits: Vec<AnalysisHit>,
}

impl AnalysisResult {
    /// Create a result from hits in any order
    ///
    /// The sort is stable, so equal scores keep their input order.
    pub fn from_hits(mut hits: Vec<AnalysisHit>) -> Self {
        sort_descending(&mut hits);
        Self { hits }
    }

    /// Create a result from a score vector over a vocabulary
    ///
    /// Only concepts with a positive score become hits.
    pub fn from_vector(vector: &Array1<f64>, index: &SubjectIndex) -> Self {
        let hits = vector
            .iter()
            .zip(index.iter())
            .filter(|(score, _)| **score > 0.0)
            .map(|(score, subject)| AnalysisHit::new(&subject.uri, &subject.label, *score))
            .collect();
        Self::from_hits(hits)
    }

    pub fn hits(&self) -> &[AnalysisHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Score of a concept, 0.0 when it was not suggested
    pub fn score_of(&self, uri: &str) -> f64 {
        self.hits
            .iter()
            .find(|hit| hit.uri == uri)
            .map_or(0.0, |hit| hit.score)
    }

    /// Project the hits onto a vocabulary
    ///
    /// Hits whose URI is not part of `index` are dropped. If a URI occurs
    /// more than once the highest score wins.
    pub fn vector_for(&self, index: &SubjectIndex) -> Array1<f64> {
        let mut vector = Array1::zeros(index.len());
        for hit in &self.hits {
            if let Some(idx) = index.by_uri(&hit.uri) {
                if hit.score > vector[idx] {
                    vector[idx] = hit.score;
                }
            }
        }
        vector
    }

    /// Keep hits scoring at least `threshold`, at most `limit` of them
    pub fn filter(&self, limit: Option<usize>, threshold: f64) -> Self {
        let hits = self
            .hits
            .iter()
            .filter(|hit| hit.score >= threshold)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Self { hits }
    }
}

fn sort_descending(hits: &mut [AnalysisHit]) {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> SubjectIndex {
        SubjectIndex::from_pairs([("a", "A"), ("b", "B"), ("c", "C")]).unwrap()
    }

    #[test]
    fn test_from_hits_sorts_descending() {
        let result = AnalysisResult::from_hits(vec![
            AnalysisHit::new("a", "A", 0.2),
            AnalysisHit::new("b", "B", 0.9),
            AnalysisHit::new("c", "C", 0.5),
        ]);
        let uris: Vec<&str> = result.hits().iter().map(|h| h.uri.as_str()).collect();
        assert_eq!(uris, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_vector_for_drops_unknown_concepts() {
        let result = AnalysisResult::from_hits(vec![
            AnalysisHit::new("b", "B", 0.4),
            AnalysisHit::new("zzz", "Z", 0.8),
        ]);
        assert_eq!(result.vector_for(&vocab()).to_vec(), vec![0.0, 0.4, 0.0]);
    }

    #[test]
    fn test_from_vector_skips_zero_scores() {
        let vector = Array1::from_vec(vec![0.0, 0.3, 0.6]);
        let result = AnalysisResult::from_vector(&vector, &vocab());
        assert_eq!(result.len(), 2);
        assert_eq!(result.hits()[0].uri, "c");
        assert_eq!(result.score_of("a"), 0.0);
    }

    #[test]
    fn test_filter_limit_and_threshold() {
        let result = AnalysisResult::from_hits(vec![
            AnalysisHit::new("a", "A", 0.9),
            AnalysisHit::new("b", "B", 0.5),
            AnalysisHit::new("c", "C", 0.1),
        ]);
        assert_eq!(result.filter(None, 0.2).len(), 2);
        assert_eq!(result.filter(Some(1), 0.0).hits()[0].uri, "a");
        assert!(result.filter(Some(0), 0.0).is_empty());
    }
}
