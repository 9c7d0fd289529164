//! Ground-truth subject sets

use super::SubjectIndex;
use ndarray::Array1;
use std::collections::HashSet;

/// Set of subjects a document is labeled with
///
/// A subject may be known by URI, by label, or both. When building vectors
/// the URIs are used if there are any; labels are looked up only for sets
/// that carry no URIs at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectSet {
    uris: HashSet<String>,
    labels: HashSet<String>,
}

impl SubjectSet {
    /// Create a subject set from URIs and labels
    pub fn new<U, L>(uris: impl IntoIterator<Item = U>, labels: impl IntoIterator<Item = L>) -> Self
    where
        U: Into<String>,
        L: Into<String>,
    {
        Self {
            uris: uris.into_iter().map(Into::into).collect(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a subject set known only by URI
    pub fn from_uris<U: Into<String>>(uris: impl IntoIterator<Item = U>) -> Self {
        Self::new(uris, std::iter::empty::<String>())
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.uris.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty() && self.labels.is_empty()
    }

    /// Binary membership vector over the given vocabulary
    pub fn as_vector(&self, index: &SubjectIndex) -> Array1<f64> {
        let mut vector = Array1::zeros(index.len());
        if !self.uris.is_empty() {
            for uri in &self.uris {
                if let Some(idx) = index.by_uri(uri) {
                    vector[idx] = 1.0;
                }
            }
        } else {
            for label in &self.labels {
                if let Some(idx) = index.by_label(label) {
                    vector[idx] = 1.0;
                }
            }
        }
        vector
    }
}
