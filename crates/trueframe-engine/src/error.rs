//! Error types for the inference pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while analyzing a video.
///
/// `VideoOpen` and `EmptyVideo` are per-request failures surfaced to the
/// caller. `ModelNotFound` and `ModelLoad` only occur at process startup and
/// abort the service before any request is served.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cannot open video file. It may be corrupt.")]
    VideoOpen,

    #[error("Could not extract any frames. The video might be too short or in an unsupported format.")]
    EmptyVideo,

    #[error("Model weights file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Failed to load model weights: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Analysis timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create a model load failure error.
    pub fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad(message.into())
    }

    /// Create an inference failure error.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error is recoverable per-request (vs fatal at startup).
    pub fn is_per_request(&self) -> bool {
        matches!(
            self,
            EngineError::VideoOpen | EngineError::EmptyVideo | EngineError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_request_classification() {
        assert!(EngineError::VideoOpen.is_per_request());
        assert!(EngineError::EmptyVideo.is_per_request());
        assert!(EngineError::Timeout(120).is_per_request());
        assert!(!EngineError::ModelNotFound(PathBuf::from("model.onnx")).is_per_request());
        assert!(!EngineError::model_load("bad weights").is_per_request());
    }
}
