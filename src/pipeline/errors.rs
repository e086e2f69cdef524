//! Error types for pipeline domain

use thiserror::Error;

/// Errors that can occur while building or writing a pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Validation failed with specified reason
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A predefined CI variable was expected but not set
    #[error("Missing CI variable: {0}")]
    MissingVariable(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Validation errors for pipeline components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name cannot be empty
    #[error("Name cannot be empty")]
    EmptyName,

    /// Retry count outside of what GitLab accepts
    #[error("Invalid retry max: must be 0, 1 or 2, got {value}")]
    InvalidRetryMax {
        /// The rejected value.
        value: u32,
    },

    /// Lists and maps cannot be used as map keys
    #[error("Only scalar map keys are supported, got: {key}")]
    NonScalarKey {
        /// Rendered form of the rejected key.
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert!(ValidationError::EmptyName.to_string().contains("empty"));

        let err = ValidationError::InvalidRetryMax { value: 3 };
        assert!(err.to_string().contains("0, 1 or 2"));
        assert!(err.to_string().contains('3'));

        let err = ValidationError::NonScalarKey { key: "- a".to_string() };
        assert!(err.to_string().contains("- a"));
    }

    #[test]
    fn test_pipeline_error_from_validation() {
        let err: PipelineError = ValidationError::EmptyName.into();
        assert!(matches!(err, PipelineError::Validation(ValidationError::EmptyName)));
        assert!(err.to_string().starts_with("Validation failed"));
    }

    #[test]
    fn test_pipeline_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = PipelineError::from(io);
        assert!(matches!(err, PipelineError::Io(ref msg) if msg.contains("missing file")));
    }
}
