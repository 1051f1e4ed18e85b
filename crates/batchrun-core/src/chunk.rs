//! Chunker — splits an ordered item sequence into fixed-size batches.

use crate::error::InvocationError;

/// A contiguous, ordered slice of the caller's items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    /// 0-based position of this batch in the run.
    pub index: usize,
    /// Global index of the first item in this batch.
    pub offset: usize,
    /// The items themselves, in original order.
    pub items: Vec<T>,
}

impl<T> Batch<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Global index of the item at `position` within this batch.
    pub fn global_index(&self, position: usize) -> usize {
        self.offset + position
    }
}

/// Number of batches `n` items produce at `batch_size` (`ceil(n / batch_size)`).
///
/// Returns 0 for a zero batch size; [`chunk`] rejects that case.
pub fn batch_count(n: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    n.div_ceil(batch_size)
}

/// Split `items` into batches of `batch_size`, preserving order.
///
/// Every batch has exactly `batch_size` items except possibly the last.
/// An empty input yields no batches.
pub fn chunk<T>(items: Vec<T>, batch_size: usize) -> Result<Vec<Batch<T>>, InvocationError> {
    if batch_size == 0 {
        return Err(InvocationError::InvalidBatchSize { size: batch_size });
    }

    let mut batches = Vec::with_capacity(batch_count(items.len(), batch_size));
    let mut iter = items.into_iter().peekable();
    let mut offset = 0usize;

    while iter.peek().is_some() {
        let items: Vec<T> = iter.by_ref().take(batch_size).collect();
        let len = items.len();
        batches.push(Batch {
            index: batches.len(),
            offset,
            items,
        });
        offset += len;
    }

    Ok(batches)
}
