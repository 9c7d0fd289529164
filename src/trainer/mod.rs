//! Calibration training
//!
//! Builds the documents x concepts matrices of raw scores and ground truth
//! for one source backend, fits a monotonic regressor for every concept with
//! enough positive examples and commits the result as one artifact.

use crate::calibration::{brier_score, expected_calibration_error, MonotonicFitter, MonotonicRegressor};
use crate::corpus::DocumentCorpus;
use crate::error::{PavError, Result};
use crate::persistence::save_json;
use crate::project::SubjectProject;
use crate::store::{model_filename, CalibrationModel};
use crate::subject::SubjectIndex;
use ndarray::{Array1, Array2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Number of bins for the ECE reported after training
const ECE_BINS: usize = 10;

/// Summary of one training run for one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub source_project_id: String,
    /// Documents read from the corpus
    pub documents: usize,
    /// Concepts in the source vocabulary
    pub concepts_total: usize,
    /// Concepts that received a regressor
    pub concepts_calibrated: usize,
    /// Brier score of raw scores over calibrated concepts
    pub brier_raw: Option<f64>,
    /// Brier score after calibration over calibrated concepts
    pub brier_calibrated: Option<f64>,
    /// Expected calibration error after calibration
    pub ece_calibrated: Option<f64>,
    /// Where the artifact was committed
    pub artifact_path: PathBuf,
}

/// Raw score and truth matrices of a training corpus
#[derive(Debug, Clone)]
pub struct TrainingMatrices {
    /// documents x concepts raw scores
    pub scores: Array2<f64>,
    /// documents x concepts binary labels
    pub truth: Array2<f64>,
}

impl TrainingMatrices {
    pub fn n_documents(&self) -> usize {
        self.scores.nrows()
    }

    /// Positive examples per concept
    pub fn support(&self) -> Array1<f64> {
        self.truth.sum_axis(Axis(0))
    }
}

/// Trains per-concept calibration models for source backends
pub struct PavTrainer<F> {
    fitter: F,
    datadir: PathBuf,
}

impl<F: MonotonicFitter> PavTrainer<F> {
    /// Create a trainer committing artifacts under `datadir`
    pub fn new(fitter: F, datadir: impl Into<PathBuf>) -> Self {
        Self {
            fitter,
            datadir: datadir.into(),
        }
    }

    /// Run every corpus document through `source`
    ///
    /// Row `d` of both matrices belongs to the d-th document; columns follow
    /// the source vocabulary order. Source hits outside the vocabulary are
    /// dropped.
    pub fn analyze_train_corpus(
        source: &dyn SubjectProject,
        corpus: &dyn DocumentCorpus,
    ) -> Result<TrainingMatrices> {
        let subjects = source.subjects();
        let n_concepts = subjects.len();
        let mut scores: Vec<f64> = Vec::new();
        let mut truth: Vec<f64> = Vec::new();
        let mut n_docs = 0;

        for doc in corpus.documents()? {
            let doc = doc?;
            let hits = source.analyze(&doc.text)?;
            scores.extend(hits.vector_for(subjects).iter().copied());
            truth.extend(doc.subjects.as_vector(subjects).iter().copied());
            n_docs += 1;
        }

        Ok(TrainingMatrices {
            scores: Array2::from_shape_vec((n_docs, n_concepts), scores)?,
            truth: Array2::from_shape_vec((n_docs, n_concepts), truth)?,
        })
    }

    /// Fit a regressor for every concept with at least `min_docs` positives
    pub fn fit_regressors(
        &self,
        subjects: &SubjectIndex,
        matrices: &TrainingMatrices,
        min_docs: usize,
    ) -> Result<BTreeMap<String, F::Model>> {
        if matrices.scores.ncols() != subjects.len() {
            return Err(PavError::ShapeError {
                expected: format!("{} concept columns", subjects.len()),
                actual: format!("{} columns", matrices.scores.ncols()),
            });
        }
        if matrices.n_documents() == 0 {
            return Ok(BTreeMap::new());
        }

        let support = matrices.support();
        let fitted: Vec<(String, F::Model)> = (0..subjects.len())
            .into_par_iter()
            .filter(|&cid| support[cid] >= min_docs as f64)
            .map(|cid| -> Result<(String, F::Model)> {
                let uri = subjects
                    .get(cid)
                    .map(|s| s.uri.clone())
                    .ok_or_else(|| PavError::ValidationError(format!("No concept at index {}", cid)))?;
                let model = self
                    .fitter
                    .fit(matrices.scores.column(cid), matrices.truth.column(cid))?;
                Ok((uri, model))
            })
            .collect::<Result<_>>()?;

        Ok(fitted.into_iter().collect())
    }

    /// Train and commit the calibration model of one source
    ///
    /// Any corpus or backend failure aborts before anything is written.
    pub fn train(
        &self,
        source: &dyn SubjectProject,
        corpus: &dyn DocumentCorpus,
        min_docs: usize,
    ) -> Result<TrainingReport> {
        let source_id = source.project_id();
        info!(source = source_id, min_docs, "creating PAV model");

        let matrices = Self::analyze_train_corpus(source, corpus)?;
        let regressors = self.fit_regressors(source.subjects(), &matrices, min_docs)?;
        let quality = CalibrationQuality::measure(source.subjects(), &matrices, &regressors)?;

        let model = CalibrationModel::new(source_id, min_docs, regressors);
        let artifact_path = save_json(&model, &self.datadir, &model_filename(source_id))?;

        let report = TrainingReport {
            source_project_id: source_id.to_string(),
            documents: matrices.n_documents(),
            concepts_total: source.subjects().len(),
            concepts_calibrated: model.len(),
            brier_raw: quality.as_ref().map(|q| q.brier_raw),
            brier_calibrated: quality.as_ref().map(|q| q.brier_calibrated),
            ece_calibrated: quality.as_ref().map(|q| q.ece_calibrated),
            artifact_path,
        };
        info!(
            source = source_id,
            documents = report.documents,
            calibrated = report.concepts_calibrated,
            total = report.concepts_total,
            brier_raw = ?report.brier_raw,
            brier_calibrated = ?report.brier_calibrated,
            "created PAV model"
        );
        Ok(report)
    }
}

/// Fit quality over the calibrated concepts only
struct CalibrationQuality {
    brier_raw: f64,
    brier_calibrated: f64,
    ece_calibrated: f64,
}

impl CalibrationQuality {
    fn measure<R: MonotonicRegressor>(
        subjects: &SubjectIndex,
        matrices: &TrainingMatrices,
        regressors: &BTreeMap<String, R>,
    ) -> Result<Option<Self>> {
        let mut raw = Vec::new();
        let mut calibrated = Vec::new();
        let mut labels = Vec::new();

        for (uri, regressor) in regressors {
            let Some(cid) = subjects.by_uri(uri) else {
                continue;
            };
            let column = matrices.scores.column(cid);
            raw.extend(column.iter().copied());
            calibrated.extend(regressor.predict_batch(column).iter().copied());
            labels.extend(matrices.truth.column(cid).iter().copied());
        }
        if labels.is_empty() {
            return Ok(None);
        }

        let raw = Array1::from_vec(raw);
        let calibrated = Array1::from_vec(calibrated);
        let labels = Array1::from_vec(labels);
        Ok(Some(Self {
            brier_raw: brier_score(raw.view(), labels.view())?,
            brier_calibrated: brier_score(calibrated.view(), labels.view())?,
            ece_calibrated: expected_calibration_error(calibrated.view(), labels.view(), ECE_BINS)?,
        }))
    }
}
