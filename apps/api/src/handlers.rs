use authsift_core::UserIdentity;
use axum::Json;
use axum::extract::State;

use crate::dto::{CheckAccessRequest, CheckAccessResponse, HealthResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Returns the subset of the requested documents the identity may see.
///
/// Any failure surfaces as an error status; a partial authorized list is
/// never returned.
pub async fn check_access_handler(
    State(state): State<AppState>,
    Json(request): Json<CheckAccessRequest>,
) -> ApiResult<Json<CheckAccessResponse>> {
    let identity = UserIdentity::new(request.identity.username, request.identity.domain)?;
    let authorized = state
        .authorization_service
        .check_access(request.document_ids, &identity)
        .await?;

    Ok(Json(CheckAccessResponse { authorized }))
}
