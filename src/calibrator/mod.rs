//! Calibrator
//!
//! Applies a source's calibration model to that source's raw hits. Concepts
//! with a trained regressor get a probability; all other concepts keep their
//! raw score.

use crate::calibration::MonotonicRegressor;
use crate::error::Result;
use crate::hit::{AnalysisHit, AnalysisResult};
use crate::project::SubjectProject;
use crate::store::{CalibrationModel, ModelStore};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Outcome of calibrating one score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    /// Probability from the concept's regressor
    Calibrated(f64),
    /// Raw score passed through, no regressor for the concept
    Raw(f64),
}

impl Calibration {
    pub fn score(self) -> f64 {
        match self {
            Calibration::Calibrated(score) | Calibration::Raw(score) => score,
        }
    }

    pub fn is_calibrated(self) -> bool {
        matches!(self, Calibration::Calibrated(_))
    }
}

/// Calibrate every hit against a model and re-rank by the new scores
pub fn calibrate_hits<R: MonotonicRegressor>(
    model: &CalibrationModel<R>,
    hits: &AnalysisResult,
) -> AnalysisResult {
    let calibrated = hits
        .hits()
        .iter()
        .map(|hit| {
            let score = model.calibrate(&hit.uri, hit.score).score();
            AnalysisHit::new(&hit.uri, &hit.label, score)
        })
        .collect();
    AnalysisResult::from_hits(calibrated)
}

/// Calibrates source hits using models from a shared [`ModelStore`]
pub struct Calibrator<R> {
    store: Arc<ModelStore<R>>,
}

impl<R> Calibrator<R>
where
    R: MonotonicRegressor + DeserializeOwned,
{
    pub fn new(store: Arc<ModelStore<R>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ModelStore<R> {
        &self.store
    }

    /// Calibrate hits produced by `source` on behalf of the `target` project
    ///
    /// Fails with `NotInitialized` when no artifact exists for `source`.
    pub fn apply(
        &self,
        hits: &AnalysisResult,
        source: &dyn SubjectProject,
        target: &dyn SubjectProject,
    ) -> Result<AnalysisResult> {
        let model = self.store.get_model(source.project_id(), target.project_id())?;
        let calibrated = calibrate_hits(&model, hits);
        debug!(
            source = source.project_id(),
            hits_in = hits.len(),
            hits_out = calibrated.len(),
            "applied PAV calibration"
        );
        Ok(calibrated)
    }
}
