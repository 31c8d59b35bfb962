use serde::{Deserialize, Serialize};

/// Identity of the end user whose access is being checked.
#[derive(Debug, Deserialize)]
pub struct IdentityDto {
    pub username: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Request body for the bulk authorization check.
#[derive(Debug, Deserialize)]
pub struct CheckAccessRequest {
    pub document_ids: Vec<String>,
    pub identity: IdentityDto,
}

/// Response body carrying the authorized subset in request order.
#[derive(Debug, Serialize)]
pub struct CheckAccessResponse {
    pub authorized: Vec<String>,
}

/// Health probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::CheckAccessRequest;

    #[test]
    fn check_access_request_accepts_missing_domain() {
        let request: Result<CheckAccessRequest, _> = serde_json::from_value(json!({
            "document_ids": ["d1", "d2"],
            "identity": { "username": "jsmith" }
        }));

        assert!(request.is_ok());
        let request = request.unwrap_or_else(|_| unreachable!());
        assert_eq!(request.document_ids.len(), 2);
        assert!(request.identity.domain.is_none());
    }
}
