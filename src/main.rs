//! Main entry point for the AI Ad Studio

use ad_studio::{
    api,
    backend::{GeminiBackend, GenerationService},
    config::Settings,
    response::file::FileHandler,
    AppState,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    init_tracing(&settings);

    info!("Starting AI Ad Studio");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    let backend = GeminiBackend::new(&settings.gemini)?;
    if !backend.has_api_key() {
        warn!("No Gemini API key set (GEMINI_API_KEY / API_KEY); generation requests will fail until one is configured");
    }
    info!(endpoint = %backend.endpoint(), "Gemini backend ready");

    let uploads = FileHandler::new(&settings.storage.upload_dir);
    uploads.ensure_storage_dir().await?;
    let removed = uploads.cleanup(settings.storage.upload_retention_secs).await?;
    if removed > 0 {
        info!(removed, "Removed stale uploads");
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let service: Arc<dyn GenerationService> = Arc::new(backend);
    let app_state = Arc::new(AppState::new(settings, service));

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
