//! Analysis hits
//!
//! Provides the per-document suggestion types that flow between backends,
//! the calibrator and the ensemble:
//! - Single (concept, score) hits
//! - Ranked hit lists with vocabulary projection and filtering
//! - Weighted hit lists and their weighted merge

mod result;
mod merge;

pub use result::{AnalysisHit, AnalysisResult};
pub use merge::{merge_hits, WeightedHits};
