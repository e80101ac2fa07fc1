use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::api_error::ApiError;
use crate::response_types::ClearResponse;

/// Wipe every contact. Served only when admin endpoints were enabled at startup.
pub async fn clear_db(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResponse>, ApiError> {
    if !state.admin_enabled {
        tracing::warn!("rejected clear-db: admin endpoints are disabled");
        return Err(ApiError::Forbidden("admin endpoints are disabled".to_owned()));
    }
    let deleted = state.identity_service.clear_all().await?;
    Ok(Json(ClearResponse { message: "Database cleared successfully", deleted }))
}
