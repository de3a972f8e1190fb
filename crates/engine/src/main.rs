//! Veo Director Engine - HTTP server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use veodirector_engine::infrastructure::config::EngineConfig;
use veodirector_engine::{api, init_tracing, load_dotenv_from_repo_root, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the server may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    init_tracing("veodirector_engine=debug,tower_http=debug");

    tracing::info!("Starting Veo Director Engine");

    // Load configuration
    let config = EngineConfig::from_env()?;
    tracing::info!(
        project = %config.vertex.project_id,
        location = %config.vertex.location,
        model = %config.vertex.model_id,
        credentials = ?config.credential_source,
        "Vertex AI configured"
    );
    tracing::info!(
        interval_secs = config.poll_policy.interval.as_secs(),
        max_attempts = config.poll_policy.max_attempts,
        retry_hint_secs = config.poll_policy.retry_hint.as_secs(),
        "Poll policy"
    );

    // Create application
    let app = Arc::new(App::from_config(&config));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // The web client posts JSON, which triggers CORS preflights.
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
