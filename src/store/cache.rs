//! Lazily loaded, cached calibration models

use super::CalibrationModel;
use crate::calibration::MonotonicRegressor;
use crate::error::{PavError, Result};
use crate::persistence::load_json;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// File name prefix of per-source calibration artifacts
pub const MODEL_FILE_PREFIX: &str = "pav-model-";

/// Artifact file name for a source project
pub fn model_filename(source_project_id: &str) -> String {
    format!("{}{}", MODEL_FILE_PREFIX, source_project_id)
}

/// Read-mostly cache of calibration models owned by one ensemble backend
///
/// Each source's artifact is loaded from the data directory on first access
/// and shared immutably afterwards. The store never writes artifacts.
pub struct ModelStore<R> {
    datadir: PathBuf,
    models: RwLock<HashMap<String, Arc<CalibrationModel<R>>>>,
}

impl<R> ModelStore<R>
where
    R: MonotonicRegressor + DeserializeOwned,
{
    /// Create an empty store over a data directory
    pub fn new(datadir: impl Into<PathBuf>) -> Self {
        Self {
            datadir: datadir.into(),
            models: RwLock::new(HashMap::new()),
        }
    }

    pub fn datadir(&self) -> &Path {
        &self.datadir
    }

    /// Path of the artifact for a source project
    pub fn model_path(&self, source_project_id: &str) -> PathBuf {
        self.datadir.join(model_filename(source_project_id))
    }

    /// Calibration model of a source, loading it on first access
    ///
    /// A missing artifact is reported as [`PavError::NotInitialized`]
    /// attributed to `project_id`, the project owning this store.
    pub fn get_model(
        &self,
        source_project_id: &str,
        project_id: &str,
    ) -> Result<Arc<CalibrationModel<R>>> {
        if let Some(model) = self.models.read().get(source_project_id) {
            return Ok(Arc::clone(model));
        }

        let path = self.model_path(source_project_id);
        debug!(path = %path.display(), "loading PAV model");
        let model: CalibrationModel<R> = match load_json(&path) {
            Ok(model) => model,
            Err(PavError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(PavError::not_initialized(
                    format!("PAV model file '{}' not found", path.display()),
                    project_id,
                ));
            }
            Err(e) => return Err(e),
        };

        if model.source_project_id != source_project_id {
            return Err(PavError::SerializationError(format!(
                "PAV model file '{}' belongs to source '{}'",
                path.display(),
                model.source_project_id
            )));
        }

        // Another reader may have loaded it meanwhile; keep the first one
        let mut models = self.models.write();
        let entry = models
            .entry(source_project_id.to_string())
            .or_insert_with(|| Arc::new(model));
        Ok(Arc::clone(entry))
    }

    /// Whether a source's model is currently cached
    pub fn is_loaded(&self, source_project_id: &str) -> bool {
        self.models.read().contains_key(source_project_id)
    }

    /// Drop a cached model so the next access reloads it from disk
    pub fn evict(&self, source_project_id: &str) -> bool {
        self.models.write().remove(source_project_id).is_some()
    }
}
