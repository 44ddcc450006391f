//! `DesignOS` Access Server - Main Entry Point

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use designos_server::{
    api, config,
    permissions::{CapabilityPolicy, PermissionResolver, RoleHierarchy, TabRegistry},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "designos_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting DesignOS Access Server"
    );

    // Role and tab configuration is validated once; a bad catalog is fatal
    let hierarchy = Arc::new(RoleHierarchy::default());
    let registry =
        Arc::new(TabRegistry::designos(&hierarchy).context("Invalid tab catalog")?);
    info!(
        roles = hierarchy.ordered().len(),
        tabs = registry.len(),
        "Permission configuration loaded"
    );
    let resolver = PermissionResolver::new(hierarchy, registry, CapabilityPolicy::default());

    // Build application state
    let state = api::AppState::new(config.clone(), resolver);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
