use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use authsift_core::{AuthzResult, UserIdentity};
use authsift_domain::{AuthorizedDocuments, DocIdBatches, DocumentId};
use tracing::{Level, debug, trace};

use crate::grant_aggregator::GrantAggregator;
use crate::repository_ports::{REQUESTED_COLUMNS, RepositorySessionFactory};

/// Orchestrates one bulk authorization request against the repository.
///
/// Each [`BulkAuthorizationService::authorize`] call opens exactly one fresh
/// impersonated session, issues batch membership queries strictly
/// sequentially, and either returns the complete authorized subset or fails.
/// A failure on any batch aborts the request and discards results from
/// earlier batches: authorization is a security boundary, so the engine never
/// degrades to a partial answer.
#[derive(Clone)]
pub struct BulkAuthorizationService {
    session_factory: Arc<dyn RepositorySessionFactory>,
    query_deadline: Option<Duration>,
}

impl BulkAuthorizationService {
    /// Creates a service over a session factory and an optional per-query
    /// deadline, applied only when the factory declares deadline support.
    #[must_use]
    pub fn new(
        session_factory: Arc<dyn RepositorySessionFactory>,
        query_deadline: Option<Duration>,
    ) -> Self {
        Self {
            session_factory,
            query_deadline,
        }
    }

    /// Returns the subset of `document_ids` visible to `identity`, in the
    /// original relative order.
    ///
    /// Empty input returns an empty result without opening a session. The
    /// first failing batch query aborts the whole request; nothing from
    /// earlier batches is returned.
    pub async fn authorize(
        &self,
        document_ids: &[DocumentId],
        identity: &UserIdentity,
    ) -> AuthzResult<AuthorizedDocuments> {
        if document_ids.is_empty() {
            return Ok(AuthorizedDocuments::new());
        }

        debug!(
            username = identity.username(),
            document_count = document_ids.len(),
            "authorizing documents"
        );

        let mut session = self.session_factory.open_session().await?;
        session
            .impersonate(identity.username(), identity.domain())
            .await?;

        if let Some(deadline) = self.query_deadline
            && self.session_factory.supports_query_deadline()
        {
            session.set_query_deadline(deadline)?;
        }

        let mut aggregator = GrantAggregator::new(document_ids);
        for batch in DocIdBatches::new(document_ids) {
            let predicate = batch.predicate();
            trace!(predicate = %predicate, "issuing membership query");

            let rows = session.query(&predicate, REQUESTED_COLUMNS).await?;
            aggregator.absorb(&batch, rows.as_slice());
        }

        let authorized = aggregator.finish();
        if tracing::enabled!(Level::TRACE) {
            let confirmed: HashSet<&str> =
                authorized.ids().iter().map(DocumentId::as_str).collect();
            for document_id in document_ids {
                trace!(
                    document_id = %document_id,
                    granted = confirmed.contains(document_id.as_str()),
                    "authorization decision"
                );
            }
        }

        Ok(authorized)
    }

    /// Host-facing entry point over raw id strings.
    ///
    /// Validates the raw ids, runs [`BulkAuthorizationService::authorize`],
    /// and returns the authorized ids as strings. Fails outright rather than
    /// returning a partial list.
    pub async fn check_access(
        &self,
        document_ids: Vec<String>,
        identity: &UserIdentity,
    ) -> AuthzResult<Vec<String>> {
        let document_ids = document_ids
            .into_iter()
            .map(DocumentId::new)
            .collect::<AuthzResult<Vec<_>>>()?;

        let authorized = self.authorize(document_ids.as_slice(), identity).await?;
        Ok(authorized.into_ids().into_iter().map(String::from).collect())
    }
}
