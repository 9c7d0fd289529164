//! Tab-separated document files

use super::{Document, DocumentCorpus};
use crate::error::{PavError, Result};
use crate::subject::SubjectSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Corpus backed by a file of `text<TAB>subjects` lines
///
/// The subject column holds whitespace-separated URIs, optionally wrapped in
/// angle brackets. Blank lines are ignored; lines without a tab are skipped
/// with a warning.
#[derive(Debug, Clone)]
pub struct TsvDocumentCorpus {
    path: PathBuf,
}

impl TsvDocumentCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentCorpus for TsvDocumentCorpus {
    fn documents(&self) -> Result<Box<dyn Iterator<Item = Result<Document>> + '_>> {
        let file = File::open(&self.path).map_err(|e| {
            PavError::CorpusError(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        let lines = BufReader::new(file).lines().enumerate();

        Ok(Box::new(lines.filter_map(move |(lineno, line)| match line {
            Ok(line) => parse_line(&line, lineno + 1, &self.path).map(Ok),
            Err(e) => Some(Err(PavError::CorpusError(format!(
                "Failed to read {} line {}: {}",
                self.path.display(),
                lineno + 1,
                e
            )))),
        })))
    }
}

fn parse_line(line: &str, lineno: usize, path: &Path) -> Option<Document> {
    if line.trim().is_empty() {
        return None;
    }
    let Some((text, subjects)) = line.split_once('\t') else {
        warn!(path = %path.display(), line = lineno, "Skipping line without subject column");
        return None;
    };
    let uris = subjects.split_whitespace().map(cleanup_uri);
    Some(Document::new(text, SubjectSet::from_uris(uris)))
}

fn cleanup_uri(uri: &str) -> &str {
    uri.strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(uri)
}
