use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authsift_application::{DocumentRow, QueryColumn, RepositorySession, RepositorySessionFactory};
use authsift_core::{AuthzError, AuthzResult};
use authsift_domain::MembershipPredicate;
use tokio::sync::RwLock;

/// In-memory content repository for tests and local runs.
///
/// Holds registered usernames and a per-document visibility set. Directory
/// domains are accepted during impersonation but not modeled. The repository
/// is shared by concurrent sessions; each session still carries its own
/// impersonated principal.
#[derive(Debug, Default)]
pub struct InMemoryContentRepository {
    state: Arc<InMemoryState>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    users: RwLock<HashSet<String>>,
    visibility: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryContentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(InMemoryState::default()),
        }
    }

    /// Registers a username that may be impersonated.
    pub async fn register_user(&self, username: impl Into<String>) {
        self.state.users.write().await.insert(username.into());
    }

    /// Makes a document visible to a registered user.
    pub async fn grant_visibility(&self, document_id: impl Into<String>, username: &str) {
        self.state
            .visibility
            .write()
            .await
            .entry(document_id.into())
            .or_default()
            .insert(username.to_owned());
    }
}

#[async_trait]
impl RepositorySessionFactory for InMemoryContentRepository {
    async fn open_session(&self) -> AuthzResult<Box<dyn RepositorySession>> {
        Ok(Box::new(InMemorySession {
            state: self.state.clone(),
            principal: None,
        }))
    }

    fn supports_query_deadline(&self) -> bool {
        false
    }
}

struct InMemorySession {
    state: Arc<InMemoryState>,
    principal: Option<String>,
}

#[async_trait]
impl RepositorySession for InMemorySession {
    async fn impersonate(&mut self, username: &str, _domain: Option<&str>) -> AuthzResult<()> {
        if !self.state.users.read().await.contains(username) {
            return Err(AuthzError::Authentication(format!(
                "unknown repository user '{username}'"
            )));
        }

        self.principal = Some(username.to_owned());
        Ok(())
    }

    fn set_query_deadline(&mut self, _deadline: Duration) -> AuthzResult<()> {
        Err(AuthzError::Validation(
            "in-memory sessions do not support query deadlines".to_owned(),
        ))
    }

    async fn query(
        &mut self,
        predicate: &MembershipPredicate<'_>,
        _columns: &[QueryColumn],
    ) -> AuthzResult<Vec<DocumentRow>> {
        let principal = self.principal.as_deref().ok_or_else(|| {
            AuthzError::Query("query issued without an impersonated principal".to_owned())
        })?;

        let visibility = self.state.visibility.read().await;
        Ok(predicate
            .document_ids()
            .iter()
            .filter(|document_id| {
                visibility
                    .get(document_id.as_str())
                    .is_some_and(|viewers| viewers.contains(principal))
            })
            .map(|document_id| DocumentRow {
                document_id: document_id.as_str().to_owned(),
                permission_id: None,
            })
            .collect())
    }
}
