//! HTTP API server for contact-identity.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod handlers;
mod response_types;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use contact_identity_service::IdentityService;

pub use response_types::{ClearResponse, MessageResponse, VersionResponse};

/// Shared application state for all HTTP handlers.
///
/// Built once at startup and wrapped in `Arc` for sharing across handlers.
pub struct AppState {
    /// Identity resolution over the configured store
    pub identity_service: Arc<IdentityService>,
    /// Whether destructive admin endpoints are served
    pub admin_enabled: bool,
}

impl AppState {
    #[must_use]
    pub const fn new(identity_service: Arc<IdentityService>, admin_enabled: bool) -> Self {
        Self { identity_service, admin_enabled }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/identify", post(handlers::identify::identify))
        .route("/clear-db", post(handlers::admin::clear_db))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Identity service is running" })
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
