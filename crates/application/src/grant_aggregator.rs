use std::collections::HashSet;

use authsift_domain::{AuthorizedDocuments, DocIdBatch, DocumentId};

use crate::DocumentRow;

/// Accumulates membership-query rows into the ordered authorized subset.
///
/// Rows arrive batch by batch and in whatever order the repository returns
/// them; the aggregator instead tracks which *input positions* were
/// confirmed, so the final output is the input sequence filtered to granted
/// ids. A confirmed id marks every occurrence of that id inside the absorbing
/// batch, which preserves duplicates, and rows naming ids outside the batch
/// are ignored, which keeps the output a subset of the input.
#[derive(Debug)]
pub struct GrantAggregator<'a> {
    document_ids: &'a [DocumentId],
    granted: Vec<bool>,
}

impl<'a> GrantAggregator<'a> {
    /// Creates an aggregator over the full request input sequence.
    #[must_use]
    pub fn new(document_ids: &'a [DocumentId]) -> Self {
        Self {
            document_ids,
            granted: vec![false; document_ids.len()],
        }
    }

    /// Absorbs the rows returned for one batch, marking confirmed positions.
    pub fn absorb(&mut self, batch: &DocIdBatch<'_>, rows: &[DocumentRow]) {
        let confirmed: HashSet<&str> = rows
            .iter()
            .map(|row| row.document_id.as_str())
            .collect();

        for (index, document_id) in batch.document_ids().iter().enumerate() {
            if confirmed.contains(document_id.as_str())
                && let Some(flag) = self.granted.get_mut(batch.offset() + index)
            {
                *flag = true;
            }
        }
    }

    /// Produces the authorized subset in original input order.
    #[must_use]
    pub fn finish(self) -> AuthorizedDocuments {
        let mut authorized = AuthorizedDocuments::new();
        for (document_id, granted) in self.document_ids.iter().zip(self.granted) {
            if granted {
                authorized.push(document_id.clone());
            }
        }

        authorized
    }
}
