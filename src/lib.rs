//! PAV Ensemble - calibrated merging of subject suggestions
//!
//! This crate turns the uncalibrated scores of several independent
//! subject-suggestion backends into comparable probabilities and blends them
//! into one ranked suggestion list per document.
//!
//! # Modules
//!
//! ## Data model
//! - [`subject`] - Concepts, ordered vocabularies, ground-truth subject sets
//! - [`hit`] - Ranked hit lists, vocabulary projection, weighted merging
//! - [`project`] - Source backend and registry interfaces
//! - [`corpus`] - Labeled training documents
//!
//! ## Calibration
//! - [`calibration`] - Monotonic regressors (isotonic regression) and metrics
//! - [`store`] - Per-source calibration artifacts, lazily loaded and cached
//! - [`calibrator`] - Applies a source's model to its raw hits
//! - [`trainer`] - Fits per-concept regressors from a labeled corpus
//!
//! ## Ensemble
//! - [`ensemble`] - The PAV ensemble backend (training and inference entry points)
//! - [`config`] - Source weights and training thresholds
//!
//! ## Infrastructure
//! - [`persistence`] - Atomic artifact writes and loading

// Core error handling
pub mod error;

// Data model
pub mod subject;
pub mod hit;
pub mod project;
pub mod corpus;

// Calibration
pub mod calibration;
pub mod store;
pub mod calibrator;
pub mod trainer;

// Ensemble
pub mod ensemble;
pub mod config;

// Infrastructure
pub mod persistence;

pub use error::{PavError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PavError, Result};

    // Data model
    pub use crate::subject::{Subject, SubjectIndex, SubjectSet};
    pub use crate::hit::{merge_hits, AnalysisHit, AnalysisResult, WeightedHits};
    pub use crate::project::{ProjectRegistry, StaticProjectRegistry, SubjectProject};
    pub use crate::corpus::{Document, DocumentCorpus, ListCorpus, TsvDocumentCorpus};

    // Calibration
    pub use crate::calibration::{IsotonicFitter, IsotonicRegression, MonotonicFitter, MonotonicRegressor};
    pub use crate::store::{CalibrationModel, ModelStore};
    pub use crate::calibrator::{Calibration, Calibrator};
    pub use crate::trainer::{PavTrainer, TrainingReport};

    // Ensemble
    pub use crate::ensemble::PavBackend;
    pub use crate::config::{parse_sources, PavConfig, SourceSpec};
}
