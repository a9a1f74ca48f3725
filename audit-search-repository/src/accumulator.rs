//! Bounded accumulation of documents across indices.

use serde_json::Value;

/// Collects documents up to a fixed capacity.
///
/// Documents past the capacity are dropped on insertion, so the accumulator
/// never holds more than `capacity` items. Once full, callers stop querying.
#[derive(Debug, Clone)]
pub struct BoundedAccumulator {
    capacity: usize,
    documents: Vec<Value>,
}

impl BoundedAccumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            documents: Vec::new(),
        }
    }

    /// Append documents in order, keeping at most `remaining()` of them.
    ///
    /// Returns how many were kept.
    pub fn extend<I>(&mut self, documents: I) -> usize
    where
        I: IntoIterator<Item = Value>,
    {
        let before = self.documents.len();
        let remaining = self.remaining();
        self.documents.extend(documents.into_iter().take(remaining));
        self.documents.len() - before
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents still needed to reach capacity.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.documents.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    pub fn into_documents(self) -> Vec<Value> {
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs(range: std::ops::Range<i32>) -> Vec<Value> {
        range.map(|i| json!({ "n": i })).collect()
    }

    #[test]
    fn test_extend_below_capacity() {
        let mut acc = BoundedAccumulator::new(5);
        assert_eq!(acc.extend(docs(0..3)), 3);
        assert_eq!(acc.len(), 3);
        assert_eq!(acc.remaining(), 2);
        assert!(!acc.is_full());
    }

    #[test]
    fn test_extend_truncates_at_capacity() {
        let mut acc = BoundedAccumulator::new(5);
        acc.extend(docs(0..3));
        assert_eq!(acc.extend(docs(3..10)), 2);
        assert!(acc.is_full());
        assert_eq!(acc.extend(docs(10..12)), 0);
        assert_eq!(acc.into_documents(), docs(0..5));
    }

    #[test]
    fn test_zero_capacity_is_full() {
        let mut acc = BoundedAccumulator::new(0);
        assert!(acc.is_full());
        assert_eq!(acc.extend(docs(0..2)), 0);
        assert!(acc.is_empty());
    }
}
