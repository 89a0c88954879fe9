//! Frame classification using the deepfake detection ONNX model.
//!
//! The model is loaded once at process startup with automatic execution
//! provider selection:
//! - CUDA on Linux with NVIDIA GPU (when `cuda` feature enabled)
//! - CoreML on macOS
//! - CPU fallback on all platforms

use std::path::Path;
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::{debug, info};

use crate::config::{EngineConfig, MODEL_INPUT_SIZE};
use crate::error::{EngineError, EngineResult};
use crate::preprocess::FrameTensor;

/// Per-batch frame classification.
///
/// Implementations return one fake-probability in [0, 1] per input tensor,
/// aligned by position.
pub trait FrameClassifier: Send + Sync {
    /// Classify one batch with a single model invocation.
    fn classify_batch(&self, batch: &[FrameTensor]) -> EngineResult<Vec<f32>>;
}

/// Deepfake frame classifier backed by an ONNX Runtime session.
///
/// The session is created once and shared read-only for the process
/// lifetime; ort sessions take `&mut self` to run, so concurrent requests
/// are serialized through the mutex.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    num_classes: usize,
    fake_index: usize,
}

impl OnnxClassifier {
    /// Load the classification model from the configured weights path.
    ///
    /// Failure here is fatal to the service: it is only called at startup,
    /// and serving without a model is meaningless.
    pub fn load(config: &EngineConfig) -> EngineResult<Self> {
        if !config.model_path.exists() {
            return Err(EngineError::ModelNotFound(config.model_path.clone()));
        }

        let fake_index = config.fake_class_index().ok_or_else(|| {
            EngineError::model_load("Class label list does not contain a 'fake' class")
        })?;

        let session = create_session(&config.model_path)?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| EngineError::model_load("Model has no output tensors"))?;

        info!(
            model_path = %config.model_path.display(),
            input_size = MODEL_INPUT_SIZE,
            output = %output_name,
            "Deepfake classifier initialized"
        );

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            num_classes: config.class_labels.len(),
            fake_index,
        })
    }
}

impl FrameClassifier for OnnxClassifier {
    fn classify_batch(&self, batch: &[FrameTensor]) -> EngineResult<Vec<f32>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let size = MODEL_INPUT_SIZE as usize;
        let mut data: Vec<f32> = Vec::with_capacity(batch.len() * FrameTensor::LEN);
        for (i, tensor) in batch.iter().enumerate() {
            if tensor.data.len() != FrameTensor::LEN {
                return Err(EngineError::internal(format!(
                    "Tensor {} expected {} floats, got {}",
                    i,
                    FrameTensor::LEN,
                    tensor.data.len()
                )));
            }
            data.extend_from_slice(&tensor.data);
        }

        let shape = vec![batch.len(), 3, size, size];
        let input = Tensor::from_array((shape, data.into_boxed_slice()))
            .map::<Value, _>(Value::from)
            .map_err(|e| EngineError::inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| EngineError::internal("Session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| EngineError::inference(format!("ONNX inference failed: {}", e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| EngineError::inference(format!("Missing {} tensor", self.output_name)))?;

        let logits = output
            .try_extract_tensor::<f32>()
            .map_err(|e| EngineError::inference(format!("Failed to extract logits: {}", e)))?;
        let logits: Vec<f32> = logits.1.iter().copied().collect();

        let expected = batch.len() * self.num_classes;
        if logits.len() != expected {
            return Err(EngineError::inference(format!(
                "Unexpected output size: expected {}, got {}",
                expected,
                logits.len()
            )));
        }

        // Softmax each row of logits and keep the fake-class probability
        let fake_probs: Vec<f32> = logits
            .chunks_exact(self.num_classes)
            .map(|row| softmax(row)[self.fake_index])
            .collect();

        debug!(batch_size = batch.len(), "Classified batch in single forward pass");
        Ok(fake_probs)
    }
}

/// Numerically stable softmax over one logit row.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

/// Create ONNX Runtime session with automatic execution provider selection.
fn create_session(model_path: &Path) -> EngineResult<Session> {
    let model_bytes = std::fs::read(model_path)
        .map_err(|e| EngineError::model_load(format!("Failed to read model file: {}", e)))?;

    let builder = Session::builder()
        .map_err(|e| EngineError::model_load(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| EngineError::model_load(format!("Failed to set optimization level: {}", e)))?;

    // Try CUDA on Linux with cuda feature
    #[cfg(all(target_os = "linux", feature = "cuda"))]
    {
        use ort::execution_providers::CUDAExecutionProvider;
        if let Ok(cuda_builder) = builder
            .clone()
            .with_execution_providers([CUDAExecutionProvider::default().build()])
        {
            if let Ok(session) = cuda_builder.commit_from_memory(&model_bytes) {
                info!("Using CUDA execution provider for frame classification");
                return Ok(session);
            }
        }
        debug!("CUDA execution provider not available, trying alternatives");
    }

    // Try CoreML on macOS
    #[cfg(target_os = "macos")]
    {
        use ort::execution_providers::CoreMLExecutionProvider;
        if let Ok(coreml_builder) = builder
            .clone()
            .with_execution_providers([CoreMLExecutionProvider::default().build()])
        {
            if let Ok(session) = coreml_builder.commit_from_memory(&model_bytes) {
                info!("Using CoreML execution provider for frame classification");
                return Ok(session);
            }
        }
        debug!("CoreML execution provider not available, using CPU");
    }

    // CPU fallback
    info!("Using CPU execution provider for frame classification");
    builder
        .commit_from_memory(&model_bytes)
        .map_err(|e| EngineError::model_load(format!("Failed to load ONNX model: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[2.0, -1.0]);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_softmax_equal_logits() {
        let probs = softmax(&[0.5, 0.5]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_large_logits_stable() {
        let probs = softmax(&[1000.0, 999.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_model_fails() {
        let config = EngineConfig {
            model_path: std::path::PathBuf::from("/nonexistent/model.onnx"),
            ..Default::default()
        };
        match OnnxClassifier::load(&config) {
            Err(EngineError::ModelNotFound(path)) => {
                assert_eq!(path, config.model_path);
            }
            other => panic!("expected ModelNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
