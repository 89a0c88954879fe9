//! Application state.

use std::sync::Arc;

use trueframe_engine::VideoAnalyzer;

use crate::config::ApiConfig;

/// Shared application state.
///
/// The analyzer owns the classification model, which is loaded once at
/// startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<VideoAnalyzer>,
}

impl AppState {
    /// Create new application state around an initialized analyzer.
    pub fn new(config: ApiConfig, analyzer: VideoAnalyzer) -> Self {
        Self {
            config,
            analyzer: Arc::new(analyzer),
        }
    }
}
