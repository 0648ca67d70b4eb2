use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

use usecase_proxy::config::Settings;
use usecase_proxy::proxy::Forwarder;
use usecase_proxy::router::build_router;
use usecase_proxy::security::{PolicySnapshot, PolicyStore};
use usecase_proxy::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,usecase_proxy=debug".to_string()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("🚀 Starting Use-Case-ID Proxy...");

    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let policy = PolicyStore::new(PolicySnapshot::from_settings(&settings));
    let forwarder = Forwarder::new(
        settings.proxy.backend_url.clone(),
        settings.proxy.timeout_seconds,
    )?;

    let state = AppState {
        policy,
        forwarder,
        config_name: "config/gateway".to_string(),
    };

    let app = build_router(state);

    let addr = SocketAddr::from((
        settings.proxy.host.parse::<std::net::IpAddr>()?,
        settings.proxy.port,
    ));

    info!("🎯 Proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
