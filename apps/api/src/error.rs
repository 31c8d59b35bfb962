use authsift_core::AuthzError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core authorization errors.
///
/// A failed request never carries a partial authorized list; callers apply
/// their own fail-closed policy on any non-success status.
#[derive(Debug)]
pub struct ApiError(pub AuthzError);

impl From<AuthzError> for ApiError {
    fn from(value: AuthzError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AuthzError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthzError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AuthzError::Connection(_) | AuthzError::Query(_) => StatusCode::BAD_GATEWAY,
            AuthzError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorResponse {
            message: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use authsift_core::AuthzError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::ApiError;

    #[test]
    fn repository_failures_map_to_bad_gateway() {
        let response =
            ApiError(AuthzError::Query("repository query failed".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rejected_identity_maps_to_unauthorized() {
        let response =
            ApiError(AuthzError::Authentication("rejected".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
