//! Fake backends shared by the integration tests

#![allow(dead_code)]

use pav_ensemble::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Backend reading its scores from the text: `"a=0.8 b=0.3"`
///
/// Tokens for URIs outside the vocabulary are ignored. A text containing
/// `boom` makes the backend fail.
pub struct ScriptedProject {
    id: String,
    subjects: SubjectIndex,
}

impl ScriptedProject {
    pub fn new(id: &str, uris: &[&str]) -> Self {
        let subjects = SubjectIndex::from_pairs(uris.iter().map(|u| (*u, u.to_uppercase()))).unwrap();
        Self {
            id: id.to_string(),
            subjects,
        }
    }

    pub fn shared(id: &str, uris: &[&str]) -> Arc<dyn SubjectProject> {
        Arc::new(Self::new(id, uris))
    }
}

impl SubjectProject for ScriptedProject {
    fn project_id(&self) -> &str {
        &self.id
    }

    fn subjects(&self) -> &SubjectIndex {
        &self.subjects
    }

    fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if text.contains("boom") {
            return Err(PavError::BackendError {
                project_id: self.id.clone(),
                message: "analysis failed".to_string(),
            });
        }
        let hits = text
            .split_whitespace()
            .filter_map(|token| token.split_once('='))
            .filter(|(uri, _)| self.subjects.contains(uri))
            .filter_map(|(uri, score)| {
                score
                    .parse::<f64>()
                    .ok()
                    .map(|score| AnalysisHit::new(uri, uri.to_uppercase(), score))
            })
            .collect();
        Ok(AnalysisResult::from_hits(hits))
    }
}

/// Commit an artifact for `source` directly, bypassing training
pub fn write_model(datadir: &Path, source: &str, regressors: Vec<(&str, IsotonicRegression)>) {
    let regressors: BTreeMap<String, IsotonicRegression> = regressors
        .into_iter()
        .map(|(uri, reg)| (uri.to_string(), reg))
        .collect();
    let model = CalibrationModel::new(source, 1, regressors);
    pav_ensemble::persistence::save_json(&model, datadir, &pav_ensemble::store::model_filename(source))
        .unwrap();
}

/// Regressor mapping the raw range `[x0, x1]` linearly onto `[y0, y1]`
pub fn linear(x0: f64, x1: f64, y0: f64, y1: f64) -> IsotonicRegression {
    IsotonicRegression::from_thresholds(vec![x0, x1], vec![y0, y1]).unwrap()
}
