use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use chat_api_server::config::Settings;
use chat_api_server::router::build_router;
use chat_api_server::services::conversation::ConversationManager;
use chat_api_server::services::LlmService;
use chat_api_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,chat_api_server=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting Chat API Server...");

    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let llm_service = Arc::new(LlmService::new(settings.llm.clone()));

    let manager = Arc::new(ConversationManager::new(
        llm_service.clone(),
        settings.llm.default_model.clone(),
    ));

    let state = AppState {
        manager,
        llm: llm_service,
    };

    let app = build_router(state);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
