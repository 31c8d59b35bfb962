//! authsift authorization API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use authsift_application::BulkAuthorizationService;
use authsift_core::AuthzError;
use authsift_infrastructure::HttpContentRepository;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api_config::ApiConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AuthzError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|error| AuthzError::Internal(format!("failed to build HTTP client: {error}")))?;
    let session_factory = Arc::new(HttpContentRepository::new(
        http_client,
        config.repository_base_url.as_str(),
        config.repository_service_token.as_str(),
    ));
    let authorization_service =
        BulkAuthorizationService::new(session_factory, config.query_deadline);

    let app_state = AppState {
        authorization_service,
        host_shared_secret: config.host_shared_secret.clone(),
    };
    let app = api_router::build_router(app_state);

    let host = IpAddr::from_str(config.api_host.as_str()).map_err(|error| {
        AuthzError::Internal(format!("invalid API_HOST '{}': {error}", config.api_host))
    })?;
    let address = SocketAddr::from((host, config.api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AuthzError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, repository = %config.repository_base_url, "authsift-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AuthzError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
