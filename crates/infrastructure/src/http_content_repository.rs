use std::time::Duration;

use async_trait::async_trait;
use authsift_application::{DocumentRow, QueryColumn, RepositorySession, RepositorySessionFactory};
use authsift_core::{AuthzError, AuthzResult};
use authsift_domain::MembershipPredicate;
use serde::{Deserialize, Serialize};

/// Session factory for a remote content repository exposed over HTTP.
///
/// The repository is session-based: `POST /api/sessions` opens a session
/// under the connector's service account, `POST /api/sessions/{id}/impersonate`
/// switches its effective principal, and `POST /api/sessions/{id}/query`
/// executes a membership query as that principal. Sessions are request-scoped
/// and abandoned when the authorization request ends.
pub struct HttpContentRepository {
    http_client: reqwest::Client,
    base_url: String,
    service_token: String,
}

impl HttpContentRepository {
    /// Creates a factory from a shared HTTP client, the repository base URL,
    /// and the service-account bearer token.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        service_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: normalize_base_url(base_url.into()),
            service_token: service_token.into(),
        }
    }
}

#[async_trait]
impl RepositorySessionFactory for HttpContentRepository {
    async fn open_session(&self) -> AuthzResult<Box<dyn RepositorySession>> {
        let endpoint = format!("{}/api/sessions", self.base_url);
        let response = self
            .http_client
            .post(endpoint)
            .bearer_auth(self.service_token.as_str())
            .send()
            .await
            .map_err(|error| {
                AuthzError::Connection(format!("failed to open repository session: {error}"))
            })?;

        if !response.status().is_success() {
            return Err(AuthzError::Connection(repository_error_detail(response).await));
        }

        let body = response
            .json::<OpenSessionResponseBody>()
            .await
            .map_err(|error| {
                AuthzError::Connection(format!(
                    "failed to parse repository session response: {error}"
                ))
            })?;

        Ok(Box::new(HttpRepositorySession {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            service_token: self.service_token.clone(),
            session_id: body.session_id,
            query_deadline: None,
        }))
    }

    fn supports_query_deadline(&self) -> bool {
        true
    }
}

struct HttpRepositorySession {
    http_client: reqwest::Client,
    base_url: String,
    service_token: String,
    session_id: String,
    query_deadline: Option<Duration>,
}

#[async_trait]
impl RepositorySession for HttpRepositorySession {
    async fn impersonate(&mut self, username: &str, domain: Option<&str>) -> AuthzResult<()> {
        let endpoint = format!(
            "{}/api/sessions/{}/impersonate",
            self.base_url, self.session_id
        );
        let response = self
            .http_client
            .post(endpoint)
            .bearer_auth(self.service_token.as_str())
            .json(&ImpersonateRequestBody { username, domain })
            .send()
            .await
            .map_err(|error| {
                AuthzError::Authentication(format!(
                    "failed to impersonate '{username}': {error}"
                ))
            })?;

        if !response.status().is_success() {
            return Err(AuthzError::Authentication(format!(
                "impersonation of '{username}' rejected: {}",
                repository_error_detail(response).await
            )));
        }

        Ok(())
    }

    fn set_query_deadline(&mut self, deadline: Duration) -> AuthzResult<()> {
        self.query_deadline = Some(deadline);
        Ok(())
    }

    async fn query(
        &mut self,
        predicate: &MembershipPredicate<'_>,
        columns: &[QueryColumn],
    ) -> AuthzResult<Vec<DocumentRow>> {
        let endpoint = format!("{}/api/sessions/{}/query", self.base_url, self.session_id);
        let mut request = self
            .http_client
            .post(endpoint)
            .bearer_auth(self.service_token.as_str())
            .json(&QueryRequestBody {
                document_ids: predicate
                    .document_ids()
                    .iter()
                    .map(|document_id| document_id.as_str().to_owned())
                    .collect(),
                columns: columns.iter().map(QueryColumn::as_str).collect(),
            });
        if let Some(deadline) = self.query_deadline {
            request = request.timeout(deadline);
        }

        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                AuthzError::Query("membership query deadline expired".to_owned())
            } else {
                AuthzError::Query(format!("membership query transport failure: {error}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(AuthzError::Query(repository_error_detail(response).await));
        }

        let body = response.json::<QueryResponseBody>().await.map_err(|error| {
            AuthzError::Query(format!("failed to parse membership query response: {error}"))
        })?;

        Ok(body
            .rows
            .into_iter()
            .map(|row| DocumentRow {
                document_id: row.document_id,
                permission_id: row.permission_id,
            })
            .collect())
    }
}

/// Builds an error message from the pieces the repository reports: its status
/// message, the HTTP status code, and an optional backend error detail.
async fn repository_error_detail(response: reqwest::Response) -> String {
    let status = response.status().as_u16();
    match response.json::<RepositoryErrorBody>().await {
        Ok(body) => {
            let message = body
                .message
                .unwrap_or_else(|| "repository request failed".to_owned());
            match body.api_error {
                Some(api_error) => format!("{message} ({status}) ({api_error})"),
                None => format!("{message} ({status})"),
            }
        }
        Err(_) => format!("repository request failed ({status})"),
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_owned()
}

#[derive(Debug, Serialize)]
struct ImpersonateRequestBody<'a> {
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct QueryRequestBody {
    document_ids: Vec<String>,
    columns: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct OpenSessionResponseBody {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponseBody {
    rows: Vec<QueryRowBody>,
}

#[derive(Debug, Deserialize)]
struct QueryRowBody {
    document_id: String,
    #[serde(default)]
    permission_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    api_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ImpersonateRequestBody, QueryRowBody, normalize_base_url};

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(
            normalize_base_url("https://repository.example.com/".to_owned()),
            "https://repository.example.com"
        );
    }

    #[test]
    fn impersonate_body_omits_absent_domain() {
        let body = serde_json::to_value(ImpersonateRequestBody {
            username: "jsmith",
            domain: None,
        })
        .unwrap_or_default();
        assert_eq!(body, json!({ "username": "jsmith" }));
    }

    #[test]
    fn query_row_defaults_missing_permission_id() {
        let row: Result<QueryRowBody, _> =
            serde_json::from_value(json!({ "document_id": "d1" }));
        assert!(row.is_ok());
        assert!(row.map(|row| row.permission_id.is_none()).unwrap_or(false));
    }
}
