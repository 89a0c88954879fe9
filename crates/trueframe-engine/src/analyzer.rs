//! End-to-end analysis orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use trueframe_models::AnalysisReport;

use crate::aggregate::aggregate_predictions;
use crate::batch::BatchAccumulator;
use crate::breakdown::generate_breakdown;
use crate::classifier::FrameClassifier;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::preprocess::preprocess_frame;
use crate::sampler::{FrameSampler, FrameSource, VideoFrameSource};

/// Composes the full pipeline over one video resource:
/// sample → preprocess → batch → classify → aggregate → breakdown.
///
/// Holds the process-wide classifier; everything else is created per call.
/// Either a complete report or an error is produced, never partial results.
#[derive(Clone)]
pub struct VideoAnalyzer {
    classifier: Arc<dyn FrameClassifier>,
    config: EngineConfig,
}

impl VideoAnalyzer {
    pub fn new(classifier: Arc<dyn FrameClassifier>, config: EngineConfig) -> Self {
        Self { classifier, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a video file.
    ///
    /// Decode and inference are blocking, so the pipeline runs on the
    /// blocking pool.
    pub async fn analyze(&self, path: impl AsRef<Path>) -> EngineResult<AnalysisReport> {
        let analyzer = self.clone();
        let path: PathBuf = path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || analyzer.analyze_blocking(&path))
            .await
            .map_err(|e| EngineError::internal(format!("Analysis task failed: {}", e)))?
    }

    /// Synchronous analysis of a video file.
    pub fn analyze_blocking(&self, path: &Path) -> EngineResult<AnalysisReport> {
        let source = VideoFrameSource::open(path)?;
        self.run_pipeline(source)
    }

    /// Run the pipeline over an already-opened frame source.
    pub fn run_pipeline<S: FrameSource>(&self, source: S) -> EngineResult<AnalysisReport> {
        let started = Instant::now();
        let budget = self.config.analysis_timeout;

        let mut sampler = FrameSampler::new(source, self.config.frame_stride);
        let mut accumulator = BatchAccumulator::new(self.config.batch_size);
        let mut predictions: Vec<f32> = Vec::new();

        for sampled in &mut sampler {
            if started.elapsed() >= budget {
                return Err(EngineError::Timeout(budget.as_secs()));
            }

            let tensor = preprocess_frame(&sampled.frame)?;
            if let Some(batch) = accumulator.push(tensor) {
                predictions.extend(self.classifier.classify_batch(&batch)?);
            }
        }

        // Remaining frames form one final partial batch
        if let Some(batch) = accumulator.flush() {
            if started.elapsed() >= budget {
                return Err(EngineError::Timeout(budget.as_secs()));
            }
            predictions.extend(self.classifier.classify_batch(&batch)?);
        }

        info!(
            frames_classified = predictions.len(),
            frames_decoded = sampler.frames_decoded(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Video analysis pipeline finished"
        );

        let aggregate = aggregate_predictions(&predictions)?;
        let breakdown =
            generate_breakdown(aggregate.verdict, aggregate.confidence, &mut rand::rng());

        Ok(AnalysisReport::new(
            aggregate.verdict,
            aggregate.confidence,
            breakdown,
        ))
    }
}
