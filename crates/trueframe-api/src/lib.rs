//! Axum HTTP API server for the TrueFrame AI engine.
//!
//! This crate provides:
//! - The `/api/predict` upload-and-analyze endpoint
//! - Liveness and readiness probes
//! - Prometheus metrics and security/logging middleware

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
