//! Calibration model store
//!
//! Per-source collections of fitted regressors, persisted as one artifact
//! per source and loaded lazily into a read-mostly in-memory cache.

mod model;
mod cache;

pub use model::CalibrationModel;
pub use cache::{model_filename, ModelStore, MODEL_FILE_PREFIX};
