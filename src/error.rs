//! Error types for the PAV ensemble

use thiserror::Error;

/// Result type alias for PAV ensemble operations
pub type Result<T> = std::result::Result<T, PavError>;

/// Main error type for calibration, training and merging
#[derive(Error, Debug)]
pub enum PavError {
    /// A calibration artifact required at inference time does not exist
    #[error("Backend not initialized in project '{project_id}': {message}")]
    NotInitialized { message: String, project_id: String },

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Backend error in project '{project_id}': {message}")]
    BackendError { project_id: String, message: String },

    #[error("Corpus error: {0}")]
    CorpusError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },
}

impl PavError {
    /// Build a [`PavError::NotInitialized`] for the given owning project
    pub fn not_initialized(message: impl Into<String>, project_id: impl Into<String>) -> Self {
        PavError::NotInitialized {
            message: message.into(),
            project_id: project_id.into(),
        }
    }
}

impl From<serde_json::Error> for PavError {
    fn from(err: serde_json::Error) -> Self {
        PavError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PavError {
    fn from(err: ndarray::ShapeError) -> Self {
        PavError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_display() {
        let err = PavError::not_initialized("PAV model file 'x' not found", "ensemble-fi");
        assert_eq!(
            err.to_string(),
            "Backend not initialized in project 'ensemble-fi': PAV model file 'x' not found"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PavError = io_err.into();
        assert!(matches!(err, PavError::IoError(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: PavError = json_err.into();
        assert!(matches!(err, PavError::SerializationError(_)));
    }
}
