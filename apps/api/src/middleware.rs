use authsift_core::AuthzError;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::state::AppState;

/// Requires the host search system's shared-secret bearer token.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if token != Some(state.host_shared_secret.as_str()) {
        return Err(AuthzError::Authentication("invalid host credentials".to_owned()).into());
    }

    Ok(next.run(request).await)
}
