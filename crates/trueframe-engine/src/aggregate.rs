//! Aggregation of per-frame predictions into a verdict.

use trueframe_models::Verdict;

use crate::config::PREDICTION_THRESHOLD;
use crate::error::{EngineError, EngineResult};

/// Aggregated decision for one video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub verdict: Verdict,
    /// Confidence percentage, always in [50, 100]
    pub confidence: f64,
    /// Mean fake probability the decision was derived from
    pub mean_fake_prob: f64,
}

/// Reduce the ordered per-frame fake probabilities into one verdict.
///
/// The verdict is FAKE iff the mean fake probability strictly exceeds the
/// threshold; a mean of exactly 0.5 is REAL with confidence exactly 50.
pub fn aggregate_predictions(predictions: &[f32]) -> EngineResult<Aggregate> {
    if predictions.is_empty() {
        return Err(EngineError::EmptyVideo);
    }

    let sum: f64 = predictions.iter().map(|&p| f64::from(p)).sum();
    let mean = sum / predictions.len() as f64;

    let verdict = if mean > f64::from(PREDICTION_THRESHOLD) {
        Verdict::Fake
    } else {
        Verdict::Real
    };

    let confidence = match verdict {
        Verdict::Fake => mean * 100.0,
        Verdict::Real => (1.0 - mean) * 100.0,
    };

    Ok(Aggregate {
        verdict,
        confidence,
        mean_fake_prob: mean,
    })
}
