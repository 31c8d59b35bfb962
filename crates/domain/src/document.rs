use std::fmt::{Display, Formatter};

use authsift_core::{AuthzError, AuthzResult, NonEmptyString};

/// Opaque identifier of a repository document.
///
/// The identifier is unique within the repository namespace; no internal
/// structure is assumed beyond non-blankness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(NonEmptyString);

impl DocumentId {
    /// Creates a document identifier from a raw repository value.
    pub fn new(value: impl Into<String>) -> AuthzResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AuthzError::Validation("document id must not be blank".to_owned()))
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for DocumentId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.as_str())
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0.into()
    }
}

/// A single authorization decision paired with its document id.
///
/// Only confirmed documents are ever materialized, so `granted` is true for
/// every grant produced by [`AuthorizedDocuments::grants`]; the flag exists
/// for callers that consume decision objects rather than bare ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentGrant {
    document_id: DocumentId,
    granted: bool,
}

impl DocumentGrant {
    /// Creates a grant decision for a document.
    #[must_use]
    pub fn new(document_id: DocumentId, granted: bool) -> Self {
        Self {
            document_id,
            granted,
        }
    }

    /// Returns the document the decision applies to.
    #[must_use]
    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// Returns whether access was confirmed.
    #[must_use]
    pub fn granted(&self) -> bool {
        self.granted
    }
}

/// Ordered collection of documents confirmed visible to one principal.
///
/// The collection grows monotonically while a request is processed, keeps the
/// relative order of the original input sequence, and is discarded once the
/// request completes. Two views are exposed: bare ids, and id+granted pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorizedDocuments {
    documents: Vec<DocumentId>,
}

impl AuthorizedDocuments {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    /// Appends a confirmed document, preserving insertion order.
    pub fn push(&mut self, document_id: DocumentId) {
        self.documents.push(document_id);
    }

    /// Returns the number of confirmed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns whether no document was confirmed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the confirmed ids in input order.
    #[must_use]
    pub fn ids(&self) -> &[DocumentId] {
        self.documents.as_slice()
    }

    /// Consumes the collection and returns the confirmed ids in input order.
    #[must_use]
    pub fn into_ids(self) -> Vec<DocumentId> {
        self.documents
    }

    /// Returns the decision-object view over the same confirmed documents.
    #[must_use]
    pub fn grants(&self) -> Vec<DocumentGrant> {
        self.documents
            .iter()
            .map(|document_id| DocumentGrant::new(document_id.clone(), true))
            .collect()
    }
}
