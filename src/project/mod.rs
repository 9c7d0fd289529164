//! Source backends
//!
//! The subject-classification backends whose suggestions the ensemble
//! calibrates are opaque here. They are reached through [`SubjectProject`]
//! and resolved by identifier through a [`ProjectRegistry`].

mod registry;

pub use registry::{ProjectRegistry, StaticProjectRegistry};

use crate::error::Result;
use crate::hit::AnalysisResult;
use crate::subject::SubjectIndex;

/// A running subject-suggestion backend
pub trait SubjectProject: Send + Sync {
    /// Identifier used in `sources` configuration and artifact names
    fn project_id(&self) -> &str;

    /// Ordered vocabulary of this backend
    fn subjects(&self) -> &SubjectIndex;

    /// Suggest subjects for a text, ranked by descending raw score
    fn analyze(&self, text: &str) -> Result<AnalysisResult>;
}
