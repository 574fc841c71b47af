//! Reordering buffer for parts that finish out of order.
//!
//! Workers finish parts in whatever order compression allows. When `--ordered` is set the pool
//! routes each finished part's stdout line through a [`ReorderBuffer`], which holds lines until
//! every lower part index has been released.
//!
//! # Example
//!
//! ```
//! use vcfsplit_lib::reorder_buffer::ReorderBuffer;
//!
//! let mut buffer: ReorderBuffer<&str> = ReorderBuffer::new();
//!
//! buffer.insert(2, "part000002.vcf.gz");
//! buffer.insert(0, "part000000.vcf.gz");
//! assert_eq!(buffer.drain_ready().collect::<Vec<_>>(), vec!["part000000.vcf.gz"]);
//!
//! buffer.insert(1, "part000001.vcf.gz");
//! assert_eq!(
//!     buffer.drain_ready().collect::<Vec<_>>(),
//!     vec!["part000001.vcf.gz", "part000002.vcf.gz"]
//! );
//! ```

use std::collections::VecDeque;

/// A buffer that releases items in sequential order.
///
/// Slot `i` of the deque holds the item with sequence number `next_seq + i`, if it has arrived.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    buffer: VecDeque<Option<T>>,
    /// Next sequence number to release.
    next_seq: u64,
    /// Number of items currently stored.
    count: usize,
}

impl<T> ReorderBuffer<T> {
    /// Create a new reorder buffer starting at sequence number zero.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: VecDeque::new(), next_seq: 0, count: 0 }
    }

    /// Insert an item with its sequence number.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the sequence number was already released or is already buffered.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, seq: u64, item: T) {
        debug_assert!(seq >= self.next_seq, "Sequence number {seq} was already released");
        let index = (seq - self.next_seq) as usize;

        if self.buffer.len() <= index {
            self.buffer.resize_with(index + 1, || None);
        }

        debug_assert!(self.buffer[index].is_none(), "Duplicate sequence number: {seq}");
        self.buffer[index] = Some(item);
        self.count += 1;
    }

    /// Pop the next sequential item if it has arrived.
    #[must_use]
    pub fn try_pop_next(&mut self) -> Option<T> {
        if !self.buffer.front().is_some_and(Option::is_some) {
            return None;
        }
        let item = self.buffer.pop_front().flatten()?;
        self.next_seq += 1;
        self.count -= 1;
        Some(item)
    }

    /// Drain all consecutive ready items, stopping at the first gap.
    pub fn drain_ready(&mut self) -> DrainReady<'_, T> {
        DrainReady { buffer: self }
    }

    /// Check if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of items waiting for an earlier sequence number.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// The next sequence number that will be released.
    #[must_use]
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator that drains consecutive ready items from a `ReorderBuffer`.
pub struct DrainReady<'a, T> {
    buffer: &'a mut ReorderBuffer<T>,
}

impl<T> Iterator for DrainReady<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.try_pop_next()
    }
}
