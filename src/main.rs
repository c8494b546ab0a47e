//! Pen Sales Agent server binary.

use std::sync::Arc;

use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use pen_sales_agent::adapters::ai::OpenAIProvider;
use pen_sales_agent::adapters::http::{agent_router, AgentAppState};
use pen_sales_agent::adapters::product::LuxuryPenFacts;
use pen_sales_agent::application::ProduceReplyHandler;
use pen_sales_agent::config::{AppConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let provider = Arc::new(OpenAIProvider::new(config.ai.openai_config()?)?);
    let handler = ProduceReplyHandler::new(provider, Arc::new(LuxuryPenFacts))
        .with_settings(config.ai.generation_settings());

    let app = agent_router()
        .with_state(AgentAppState::new(Arc::new(handler)))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(config.server.allowed_origins()?))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        timeout = ?config.server.request_timeout(),
        models = ?config.ai.supported_models_list(),
        "Pen sales agent listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_filter));

    let fmt_layer = match server.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
}
