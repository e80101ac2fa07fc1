use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use contact_identity_core::{IdentifyRequest, IdentifyResponse};

use crate::AppState;
use crate::api_error::ApiError;

pub async fn identify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IdentifyRequest>, JsonRejection>,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let attrs = req.validate()?;
    let view = state.identity_service.identify(&attrs).await?;
    Ok(Json(view.into()))
}
