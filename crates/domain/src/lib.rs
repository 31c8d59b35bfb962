//! Domain types and invariants for bulk document authorization.

#![forbid(unsafe_code)]

mod batch;
mod document;

pub use batch::{DocIdBatch, DocIdBatches, MAX_BATCH_DOCUMENTS, MembershipPredicate};
pub use document::{AuthorizedDocuments, DocumentGrant, DocumentId};
