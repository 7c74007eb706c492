use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Resolution error: {0}")]
    ResolutionError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
