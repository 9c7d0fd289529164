//! Ordered subject vocabulary

use crate::error::{PavError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single concept of a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    /// Stable concept identifier
    pub uri: String,
    /// Display label
    pub label: String,
}

impl Subject {
    /// Create a new subject
    pub fn new(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
        }
    }
}

/// Ordered vocabulary of a backend
///
/// Index order is fixed at construction and is the column order of every
/// score or truth vector built against this vocabulary.
#[derive(Debug, Clone, Default)]
pub struct SubjectIndex {
    subjects: Vec<Subject>,
    by_uri: HashMap<String, usize>,
}

impl SubjectIndex {
    /// Create a vocabulary, rejecting duplicate URIs
    pub fn new(subjects: Vec<Subject>) -> Result<Self> {
        let mut by_uri = HashMap::with_capacity(subjects.len());
        for (idx, subject) in subjects.iter().enumerate() {
            if by_uri.insert(subject.uri.clone(), idx).is_some() {
                return Err(PavError::ValidationError(format!(
                    "Duplicate subject URI in vocabulary: {}",
                    subject.uri
                )));
            }
        }
        Ok(Self { subjects, by_uri })
    }

    /// Create a vocabulary from `(uri, label)` pairs
    pub fn from_pairs<U, L>(pairs: impl IntoIterator<Item = (U, L)>) -> Result<Self>
    where
        U: Into<String>,
        L: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(uri, label)| Subject::new(uri, label))
                .collect(),
        )
    }

    /// Number of concepts
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Concept at the given index
    pub fn get(&self, idx: usize) -> Option<&Subject> {
        self.subjects.get(idx)
    }

    /// Index of the concept with the given URI
    pub fn by_uri(&self, uri: &str) -> Option<usize> {
        self.by_uri.get(uri).copied()
    }

    /// Index of the first concept carrying the given label
    pub fn by_label(&self, label: &str) -> Option<usize> {
        self.subjects.iter().position(|s| s.label == label)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.by_uri.contains_key(uri)
    }

    /// Iterate concepts in index order
    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }
}
