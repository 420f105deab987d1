//! Deduplication of generated local-parts
//!
//! One [`SeenSet`] belongs to exactly one generation run. It only ever stores
//! first occurrences and never shrinks while the run is alive.

use ahash::RandomState;
use hashbrown::HashSet;

/// In-memory HashSet of local-parts already emitted
#[derive(Debug)]
pub struct SeenSet {
    set: HashSet<String, RandomState>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self {
            set: HashSet::with_hasher(RandomState::new()),
        }
    }

    /// Record `item`. Returns true if it had not been seen before.
    pub fn insert(&mut self, item: &str) -> bool {
        if self.set.contains(item) {
            return false;
        }
        self.set.insert(item.to_string())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Get approximate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        // String header + average short content per entry, plus table slots
        self.set.len() * 64 + self.set.capacity() * 8
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seen_set() {
        let mut seen = SeenSet::new();

        assert!(seen.insert("juan.perez"));
        assert!(seen.insert("jperez"));
        assert!(!seen.insert("juan.perez")); // Duplicate

        assert_eq!(seen.len(), 2);
        assert!(seen.insert("perez"));
    }

    #[test]
    fn test_memory_usage_grows() {
        let mut seen = SeenSet::new();
        let empty = seen.memory_usage();

        for i in 0..100 {
            seen.insert(&format!("user{}", i));
        }

        assert!(seen.memory_usage() > empty);
        assert!(!seen.is_empty());
    }
}
