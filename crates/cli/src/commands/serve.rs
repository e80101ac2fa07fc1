use std::sync::Arc;

use anyhow::Result;
use contact_identity_core::env_config::{env_flag, env_parse_with_default};
use contact_identity_core::{DEFAULT_HTTP_PORT, ENV_ENABLE_ADMIN, ENV_PORT};
use contact_identity_http::{AppState, create_router};
use contact_identity_service::IdentityService;

use crate::open_storage;

pub(crate) async fn run(port: Option<u16>, host: String, enable_admin: bool) -> Result<()> {
    let port = port.unwrap_or_else(|| env_parse_with_default(ENV_PORT, DEFAULT_HTTP_PORT));
    let admin_enabled = enable_admin || env_flag(ENV_ENABLE_ADMIN, false);

    let storage = Arc::new(open_storage().await?);
    let backend = storage.kind();
    let identity_service = Arc::new(IdentityService::new(storage));
    let state = Arc::new(AppState::new(identity_service, admin_enabled));

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!(%addr, backend, admin_enabled, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    tracing::info!("HTTP server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
