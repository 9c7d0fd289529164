//! Per-source calibration artifact

use crate::calibration::MonotonicRegressor;
use crate::calibrator::Calibration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fitted regressors of one source backend, keyed by concept URI
///
/// Concepts without an entry have no calibration; their raw scores pass
/// through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationModel<R> {
    /// Source project the regressors were trained for
    pub source_project_id: String,
    /// When training finished
    pub trained_at: DateTime<Utc>,
    /// Minimum positive examples a concept needed to be calibrated
    pub min_docs: usize,
    regressors: BTreeMap<String, R>,
}

impl<R: MonotonicRegressor> CalibrationModel<R> {
    /// Create a model stamped with the current time
    pub fn new(
        source_project_id: impl Into<String>,
        min_docs: usize,
        regressors: BTreeMap<String, R>,
    ) -> Self {
        Self {
            source_project_id: source_project_id.into(),
            trained_at: Utc::now(),
            min_docs,
            regressors,
        }
    }

    /// Regressor for a concept, if one was trained
    pub fn regressor(&self, uri: &str) -> Option<&R> {
        self.regressors.get(uri)
    }

    /// Calibrate a raw score for one concept
    pub fn calibrate(&self, uri: &str, raw_score: f64) -> Calibration {
        match self.regressor(uri) {
            Some(regressor) => Calibration::Calibrated(regressor.predict(raw_score)),
            None => Calibration::Raw(raw_score),
        }
    }

    /// URIs of the calibrated concepts, in sorted order
    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.regressors.keys().map(String::as_str)
    }

    /// Number of calibrated concepts
    pub fn len(&self) -> usize {
        self.regressors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regressors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::IsotonicRegression;

    #[test]
    fn test_calibrate_branches() {
        let reg = IsotonicRegression::from_thresholds(vec![0.0, 1.0], vec![0.2, 0.6]).unwrap();
        let model = CalibrationModel::new("src", 5, BTreeMap::from([("a".to_string(), reg)]));

        assert_eq!(model.calibrate("a", 2.0), Calibration::Calibrated(0.6));
        assert_eq!(model.calibrate("b", 2.0), Calibration::Raw(2.0));
        assert_eq!(model.concepts().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_json_round_trip_keeps_regressors() {
        let reg = IsotonicRegression::from_thresholds(vec![0.1, 0.9], vec![0.0, 1.0]).unwrap();
        let model = CalibrationModel::new("src", 3, BTreeMap::from([("a".to_string(), reg)]));

        let json = serde_json::to_string(&model).unwrap();
        let loaded: CalibrationModel<IsotonicRegression> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.source_project_id, "src");
        assert_eq!(loaded.min_docs, 3);
        assert_eq!(loaded.regressor("a"), model.regressor("a"));
    }
}
