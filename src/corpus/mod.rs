//! Labeled training corpora
//!
//! Provides document sources for calibration training:
//! - In-memory corpora
//! - Tab-separated document files (`text<TAB><uri> <uri> ...`)

mod tsv;

pub use tsv::TsvDocumentCorpus;

use crate::error::Result;
use crate::subject::SubjectSet;

/// A training document with its ground-truth subjects
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub subjects: SubjectSet,
}

impl Document {
    pub fn new(text: impl Into<String>, subjects: SubjectSet) -> Self {
        Self {
            text: text.into(),
            subjects,
        }
    }
}

/// Iterable source of labeled documents
pub trait DocumentCorpus {
    /// Iterate the documents of the corpus
    ///
    /// A document that cannot be read yields an `Err` item; consumers stop at
    /// the first one.
    fn documents(&self) -> Result<Box<dyn Iterator<Item = Result<Document>> + '_>>;
}

/// Corpus held in memory
#[derive(Debug, Clone, Default)]
pub struct ListCorpus {
    documents: Vec<Document>,
}

impl ListCorpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentCorpus for ListCorpus {
    fn documents(&self) -> Result<Box<dyn Iterator<Item = Result<Document>> + '_>> {
        Ok(Box::new(self.documents.iter().cloned().map(Ok)))
    }
}
