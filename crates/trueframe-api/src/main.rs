//! Axum API server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trueframe_api::{create_router, ApiConfig, AppState};
use trueframe_engine::{EngineConfig, OnnxClassifier, VideoAnalyzer};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("trueframe=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Initializing TrueFrame AI engine");

    // Load configuration
    let engine_config = EngineConfig::from_env();
    let api_config = ApiConfig::from_env();
    info!(
        host = %api_config.host,
        port = api_config.port,
        model_path = %engine_config.model_path.display(),
        frame_stride = engine_config.frame_stride,
        batch_size = engine_config.batch_size,
        "Configuration loaded"
    );

    // Load the classification model. Serving without a model is meaningless,
    // so any failure here halts startup.
    let classifier = match OnnxClassifier::load(&engine_config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load classification model: {}", e);
            std::process::exit(1);
        }
    };

    let analyzer = VideoAnalyzer::new(Arc::new(classifier), engine_config);
    let state = AppState::new(api_config.clone(), analyzer);

    // Initialize metrics
    let metrics_enabled = std::env::var("METRICS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    let metrics_handle = if metrics_enabled {
        info!("Prometheus metrics enabled at /metrics");
        Some(trueframe_api::metrics::init_metrics())
    } else {
        None
    };

    // Create router
    let app = create_router(state, metrics_handle);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", api_config.host, api_config.port)
        .parse()
        .expect("Invalid bind address");

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Server shutdown complete");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
