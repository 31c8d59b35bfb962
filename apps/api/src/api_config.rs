use std::env;
use std::time::Duration;

use authsift_core::AuthzError;
use url::Url;

/// Runtime configuration for the authorization API, loaded from environment
/// variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub repository_base_url: String,
    pub repository_service_token: String,
    pub host_shared_secret: String,
    pub query_deadline: Option<Duration>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AuthzError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3007);

        let repository_base_url = required_env("REPOSITORY_BASE_URL")?;
        Url::parse(repository_base_url.as_str()).map_err(|error| {
            AuthzError::Validation(format!(
                "invalid REPOSITORY_BASE_URL '{repository_base_url}': {error}"
            ))
        })?;

        let repository_service_token = required_env("REPOSITORY_SERVICE_TOKEN")?;
        let host_shared_secret = required_env("HOST_SHARED_SECRET")?;
        let query_deadline = optional_env_u64("QUERY_DEADLINE_MS")?.map(Duration::from_millis);

        if query_deadline == Some(Duration::ZERO) {
            return Err(AuthzError::Validation(
                "QUERY_DEADLINE_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_host,
            api_port,
            repository_base_url,
            repository_service_token,
            host_shared_secret,
            query_deadline,
        })
    }
}

fn required_env(name: &str) -> Result<String, AuthzError> {
    let value =
        env::var(name).map_err(|_| AuthzError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AuthzError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_env_u64(name: &str) -> Result<Option<u64>, AuthzError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|error| {
                AuthzError::Validation(format!("invalid {name} value '{value}': {error}"))
            }),
        Err(_) => Ok(None),
    }
}
