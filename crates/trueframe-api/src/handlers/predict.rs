//! Video prediction handler.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{info, warn};

use trueframe_engine::EngineError;
use trueframe_models::AnalysisReport;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Analyze an uploaded video and return the FAKE/REAL verdict.
///
/// Expects a multipart form with a `file` field. The upload is written to a
/// per-request temp directory, which is removed when the request ends.
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisReport>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            if filename.is_empty() {
                return Err(ApiError::bad_request("No file selected"));
            }
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::bad_request("No file part in the request"))?;
    let filename = sanitize_filename(&filename);

    info!(
        filename = %filename,
        size_bytes = data.len(),
        "Received file for prediction"
    );

    let temp_dir = tempfile::tempdir()
        .map_err(|e| ApiError::internal(format!("Failed to create temp directory: {}", e)))?;
    let temp_path = temp_dir.path().join(&filename);
    tokio::fs::write(&temp_path, &data)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to save upload: {}", e)))?;

    let started = Instant::now();
    match state.analyzer.analyze(&temp_path).await {
        Ok(report) => {
            metrics::record_analysis(
                report.prediction.as_str(),
                started.elapsed().as_secs_f64(),
            );
            Ok(Json(report))
        }
        Err(e) => {
            warn!(filename = %filename, error = %e, "Video analysis failed");
            metrics::record_analysis_failure(failure_kind(&e));
            Err(e.into())
        }
    }
}

/// Reduce an uploaded filename to a safe basename for the temp directory.
fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let sanitized: String = basename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "upload.bin".to_string()
    } else {
        sanitized
    }
}

/// Metric label for a failed analysis.
fn failure_kind(error: &EngineError) -> &'static str {
    match error {
        EngineError::VideoOpen => "video_open",
        EngineError::EmptyVideo => "empty_video",
        EngineError::Timeout(_) => "timeout",
        _ => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\videos\\clip.mp4"), "clip.mp4");
        assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
    }

    #[test]
    fn test_sanitize_filename_drops_special_chars() {
        assert_eq!(sanitize_filename("my video (1).mp4"), "myvideo1.mp4");
        assert_eq!(sanitize_filename("Ünïcode.webm"), "ncode.webm");
    }

    #[test]
    fn test_sanitize_filename_fallback() {
        assert_eq!(sanitize_filename("???"), "upload.bin");
        assert_eq!(sanitize_filename(".."), "upload.bin");
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(failure_kind(&EngineError::VideoOpen), "video_open");
        assert_eq!(failure_kind(&EngineError::EmptyVideo), "empty_video");
        assert_eq!(failure_kind(&EngineError::Timeout(5)), "timeout");
        assert_eq!(failure_kind(&EngineError::internal("x")), "internal");
    }
}
