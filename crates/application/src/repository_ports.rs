use std::time::Duration;

use async_trait::async_trait;
use authsift_core::AuthzResult;
use authsift_domain::MembershipPredicate;

/// Columns requested from every membership query.
pub const REQUESTED_COLUMNS: &[QueryColumn] = &[QueryColumn::DocumentId, QueryColumn::PermissionId];

/// Result columns a membership query can project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryColumn {
    /// The document identifier column.
    DocumentId,
    /// The permission identifier resolved for the impersonated principal.
    PermissionId,
}

impl QueryColumn {
    /// Returns the stable wire value for this column.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentId => "document_id",
            Self::PermissionId => "permission_id",
        }
    }
}

/// One row returned by a membership query.
///
/// The query contract only returns documents visible to the impersonated
/// principal, so a row is always a confirmation and never a denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    /// Raw id of a document the principal can see.
    pub document_id: String,
    /// Permission id the repository resolved for the principal, when the
    /// backend projects one.
    pub permission_id: Option<String>,
}

/// An exclusive, impersonatable query session against the content repository.
///
/// A session belongs to exactly one authorization request and is never shared
/// or pooled across identities. Sessions are abandoned when the request ends.
#[async_trait]
pub trait RepositorySession: Send {
    /// Switches the session's effective principal before any query runs.
    ///
    /// Fails with [`authsift_core::AuthzError::Authentication`] when the
    /// repository rejects the identity; no queries are issued in that case.
    async fn impersonate(&mut self, username: &str, domain: Option<&str>) -> AuthzResult<()>;

    /// Applies a per-query deadline to subsequent queries.
    ///
    /// Only invoked when the owning factory declares deadline support; an
    /// expired deadline surfaces from [`RepositorySession::query`] as
    /// [`authsift_core::AuthzError::Query`].
    fn set_query_deadline(&mut self, deadline: Duration) -> AuthzResult<()>;

    /// Executes one membership query and returns the visible rows.
    async fn query(
        &mut self,
        predicate: &MembershipPredicate<'_>,
        columns: &[QueryColumn],
    ) -> AuthzResult<Vec<DocumentRow>>;
}

/// Factory producing one fresh repository session per authorization request.
///
/// Per-request instantiation is intentional isolation: sharing a session
/// across requests could leak one user's impersonated view to another. The
/// factory itself is shared by concurrent requests and must be safe for that.
#[async_trait]
pub trait RepositorySessionFactory: Send + Sync {
    /// Opens an unimpersonated session.
    ///
    /// Fails with [`authsift_core::AuthzError::Connection`] when the session
    /// cannot be established, before impersonation is attempted.
    async fn open_session(&self) -> AuthzResult<Box<dyn RepositorySession>>;

    /// Declares whether sessions from this factory honor query deadlines.
    fn supports_query_deadline(&self) -> bool;
}
