//! Video inference pipeline for deepfake detection.
//!
//! The pipeline decodes frames from an uploaded video at a fixed stride,
//! preprocesses them into classifier input tensors, runs batched ONNX
//! inference, averages the per-frame fake probabilities into a verdict and
//! confidence, and derives a diagnostic breakdown.
//!
//! The classification model is loaded once at process startup and shared
//! read-only for the process lifetime; everything else is per-request.

pub mod aggregate;
pub mod analyzer;
pub mod batch;
pub mod breakdown;
pub mod classifier;
pub mod config;
pub mod error;
pub mod preprocess;
pub mod sampler;

pub use aggregate::{aggregate_predictions, Aggregate};
pub use analyzer::VideoAnalyzer;
pub use batch::BatchAccumulator;
pub use breakdown::generate_breakdown;
pub use classifier::{FrameClassifier, OnnxClassifier};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use preprocess::{preprocess_frame, FrameTensor};
pub use sampler::{FrameSampler, FrameSource, RgbFrame, SampledFrame, VideoFrameSource};
