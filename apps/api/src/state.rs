use authsift_application::BulkAuthorizationService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: BulkAuthorizationService,
    pub host_shared_secret: String,
}
