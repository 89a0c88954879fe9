//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Decision threshold on the mean fake probability. Fixed, not configurable.
pub const PREDICTION_THRESHOLD: f32 = 0.5;

/// Square input resolution the classifier was calibrated for.
pub const MODEL_INPUT_SIZE: u32 = 224;

/// Per-channel mean used for input normalization (RGB order).
pub const NORMALIZE_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel standard deviation used for input normalization (RGB order).
pub const NORMALIZE_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Inference pipeline configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the ONNX model weights
    pub model_path: PathBuf,
    /// Sample one frame every `frame_stride` decoded frames
    pub frame_stride: u32,
    /// Number of frame tensors per model invocation
    pub batch_size: usize,
    /// Recognized class labels, in model output order
    pub class_labels: Vec<String>,
    /// Wall-clock budget for one analysis (decode + inference)
    pub analysis_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/deepfake_detector.onnx"),
            frame_stride: 30,
            batch_size: 16,
            class_labels: vec!["fake".to_string(), "real".to_string()],
            analysis_timeout: Duration::from_secs(120),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            frame_stride: std::env::var("FRAME_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&s| s > 0)
                .unwrap_or(defaults.frame_stride),
            batch_size: std::env::var("INFERENCE_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&b| b > 0)
                .unwrap_or(defaults.batch_size),
            class_labels: defaults.class_labels,
            analysis_timeout: Duration::from_secs(
                std::env::var("ANALYSIS_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }

    /// Index of the "fake" class in the model output, if configured.
    pub fn fake_class_index(&self) -> Option<usize> {
        self.class_labels.iter().position(|label| label == "fake")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.frame_stride, 30);
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.class_labels, vec!["fake", "real"]);
        assert_eq!(config.fake_class_index(), Some(0));
    }

    #[test]
    fn test_fake_class_index_missing() {
        let config = EngineConfig {
            class_labels: vec!["real".to_string()],
            ..Default::default()
        };
        assert_eq!(config.fake_class_index(), None);
    }
}
