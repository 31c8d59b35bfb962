use std::fmt::{Display, Formatter};

use crate::DocumentId;

/// Maximum number of document ids carried by one membership query.
///
/// Backing repositories cap the size of a single query condition, so large
/// requests are split into chunks of at most this many ids.
pub const MAX_BATCH_DOCUMENTS: usize = 1000;

/// An ordered, contiguous slice of the requested document-id sequence.
///
/// Batches partition the input without loss or reordering; duplicates are
/// kept. `offset` is the position of the batch's first id in the original
/// input, which lets the aggregator map query rows back to input positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocIdBatch<'a> {
    offset: usize,
    document_ids: &'a [DocumentId],
}

impl<'a> DocIdBatch<'a> {
    /// Returns the position of this batch's first id in the input sequence.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the ids of this batch in input order.
    #[must_use]
    pub fn document_ids(&self) -> &'a [DocumentId] {
        self.document_ids
    }

    /// Returns the number of ids in this batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document_ids.len()
    }

    /// Returns whether the batch carries no ids. Batches produced by
    /// [`DocIdBatches`] are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document_ids.is_empty()
    }

    /// Renders the membership predicate covering this batch's ids.
    #[must_use]
    pub fn predicate(&self) -> MembershipPredicate<'a> {
        MembershipPredicate {
            document_ids: self.document_ids,
        }
    }
}

/// Query condition expressing "identifier is one of this batch's ids".
///
/// The predicate is never empty: batching stops when the source sequence is
/// exhausted instead of yielding an empty condition. The `Display` rendering
/// is an abstract form used for query tracing; adapters translate the id set
/// into their own wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipPredicate<'a> {
    document_ids: &'a [DocumentId],
}

impl<'a> MembershipPredicate<'a> {
    /// Returns the ids covered by the predicate, in input order.
    #[must_use]
    pub fn document_ids(&self) -> &'a [DocumentId] {
        self.document_ids
    }

    /// Returns the number of ids covered by the predicate.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document_ids.len()
    }

    /// Returns whether the predicate covers no ids. Predicates rendered from
    /// [`DocIdBatches`] output are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document_ids.is_empty()
    }
}

impl Display for MembershipPredicate<'_> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "id in (")?;
        for (index, document_id) in self.document_ids.iter().enumerate() {
            if index > 0 {
                write!(formatter, ",")?;
            }
            write!(formatter, "'{document_id}'")?;
        }
        write!(formatter, ")")
    }
}

/// Lazy, consumed-once partition of an id sequence into bounded batches.
///
/// Boundaries fall strictly every [`MAX_BATCH_DOCUMENTS`] consumed elements
/// in input order; the final batch carries the remainder. An empty input
/// yields no batches.
#[derive(Debug)]
pub struct DocIdBatches<'a> {
    remaining: &'a [DocumentId],
    offset: usize,
}

impl<'a> DocIdBatches<'a> {
    /// Creates the batch sequence over an input id slice.
    #[must_use]
    pub fn new(document_ids: &'a [DocumentId]) -> Self {
        Self {
            remaining: document_ids,
            offset: 0,
        }
    }
}

impl<'a> Iterator for DocIdBatches<'a> {
    type Item = DocIdBatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let taken = self.remaining.len().min(MAX_BATCH_DOCUMENTS);
        let (head, tail) = self.remaining.split_at(taken);
        let batch = DocIdBatch {
            offset: self.offset,
            document_ids: head,
        };

        self.offset += taken;
        self.remaining = tail;
        Some(batch)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{DocIdBatches, MAX_BATCH_DOCUMENTS};
    use crate::DocumentId;

    fn document_ids(count: usize) -> Vec<DocumentId> {
        (1..=count)
            .map(|index| DocumentId::new(format!("d{index}")))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_default()
    }

    #[test]
    fn empty_input_yields_no_batches() {
        let ids = document_ids(0);
        assert_eq!(DocIdBatches::new(&ids).count(), 0);
    }

    #[test]
    fn input_shorter_than_cap_yields_one_batch() {
        let ids = document_ids(42);
        let batches: Vec<_> = DocIdBatches::new(&ids).collect();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 42);
        assert_eq!(batches[0].offset(), 0);
    }

    #[test]
    fn input_of_exactly_one_cap_yields_one_full_batch() {
        let ids = document_ids(MAX_BATCH_DOCUMENTS);
        let batches: Vec<_> = DocIdBatches::new(&ids).collect();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), MAX_BATCH_DOCUMENTS);
    }

    #[test]
    fn input_of_one_over_cap_yields_full_batch_and_remainder() {
        let ids = document_ids(MAX_BATCH_DOCUMENTS + 1);
        let batches: Vec<_> = DocIdBatches::new(&ids).collect();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), MAX_BATCH_DOCUMENTS);
        assert_eq!(batches[1].len(), 1);
        assert_eq!(batches[1].offset(), MAX_BATCH_DOCUMENTS);
    }

    #[test]
    fn exact_multiple_of_cap_yields_only_full_batches() {
        let ids = document_ids(3 * MAX_BATCH_DOCUMENTS);
        let batches: Vec<_> = DocIdBatches::new(&ids).collect();

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|batch| batch.len() == MAX_BATCH_DOCUMENTS));
    }

    #[test]
    fn duplicates_are_not_deduplicated() {
        let ids = vec![
            DocumentId::new("d1").unwrap_or_else(|_| unreachable!()),
            DocumentId::new("d1").unwrap_or_else(|_| unreachable!()),
        ];
        let batches: Vec<_> = DocIdBatches::new(&ids).collect();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[test]
    fn predicate_renders_quoted_id_list() {
        let ids = document_ids(3);
        let batches: Vec<_> = DocIdBatches::new(&ids).collect();

        let rendered = batches[0].predicate().to_string();
        assert_eq!(rendered, "id in ('d1','d2','d3')");
    }

    proptest! {
        #[test]
        fn batches_partition_input_without_loss_or_reordering(count in 0usize..3500) {
            let ids = document_ids(count);
            let batches: Vec<_> = DocIdBatches::new(&ids).collect();

            let rejoined: Vec<DocumentId> = batches
                .iter()
                .flat_map(|batch| batch.document_ids().iter().cloned())
                .collect();
            prop_assert_eq!(rejoined, ids.clone());

            prop_assert_eq!(batches.len(), count.div_ceil(MAX_BATCH_DOCUMENTS));
            prop_assert!(batches.iter().all(|batch| !batch.is_empty()));
            prop_assert!(batches.iter().all(|batch| batch.len() <= MAX_BATCH_DOCUMENTS));
            if let Some((_last, head)) = batches.split_last() {
                prop_assert!(head.iter().all(|batch| batch.len() == MAX_BATCH_DOCUMENTS));
            }
        }
    }
}
