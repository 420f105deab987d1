//! Combination engine
//!
//! [`Combinations`] walks the Cartesian product of the components with an
//! odometer of indices (rightmost component varies fastest) and yields one
//! local-part per call to `next`. Nothing is materialized ahead of time: memory
//! is the components plus the seen-set of emitted values.

use crate::component::Component;
use crate::dedup::SeenSet;
use crate::filter::{LengthFilter, MAX_LOCAL_PART_LEN};
use std::iter::FusedIterator;

/// Limits and deduplication policy for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Hard ceiling on yielded local-parts
    pub max_results: Option<u64>,
    /// Emit repeats instead of dropping them (they are still counted)
    pub allow_duplicates: bool,
    pub max_local_part_len: usize,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            max_results: None,
            allow_duplicates: false,
            max_local_part_len: MAX_LOCAL_PART_LEN,
        }
    }
}

/// Counters for one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Local-parts yielded to the caller
    pub total_generated: u64,
    /// Candidates that had already been seen
    pub duplicates: u64,
    /// Candidates over the local-part length limit
    pub invalid_emails: u64,
}

/// Lazy Cartesian product of components, filtered and deduplicated
#[derive(Debug)]
pub struct Combinations {
    components: Vec<Component>,
    indices: Vec<u64>,
    exhausted: bool,
    policy: GenerationPolicy,
    filter: LengthFilter,
    seen: SeenSet,
    stats: GenerationStats,
}

impl Combinations {
    pub fn new(components: Vec<Component>, policy: GenerationPolicy) -> Self {
        let exhausted = components.is_empty() || components.iter().any(Component::is_empty);

        Self {
            indices: vec![0; components.len()],
            components,
            exhausted,
            filter: LengthFilter::new(policy.max_local_part_len),
            policy,
            seen: SeenSet::new(),
            stats: GenerationStats::default(),
        }
    }

    /// Counters so far; final once the iterator returned `None`
    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    /// Approximate bytes held by the dedup set
    pub fn dedup_memory(&self) -> usize {
        self.seen.memory_usage()
    }

    /// Size of the full product space, `None` if it overflows `u64`
    pub fn candidate_space(&self) -> Option<u64> {
        self.components
            .iter()
            .try_fold(1u64, |acc, c| acc.checked_mul(c.len()))
    }

    /// Upper bound on what this run can still yield
    pub fn expected_len(&self) -> Option<u64> {
        match (self.candidate_space(), self.policy.max_results) {
            (Some(space), Some(max)) => Some(space.min(max)),
            (None, Some(max)) => Some(max),
            (space, None) => space,
        }
    }

    /// Render the current tuple and step the odometer
    fn next_candidate(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }

        let mut local_part = String::new();
        for (component, &index) in self.components.iter().zip(&self.indices) {
            component.write_nth(index, &mut local_part);
        }

        self.exhausted = true;
        for (index, component) in self.indices.iter_mut().zip(&self.components).rev() {
            *index += 1;
            if *index < component.len() {
                self.exhausted = false;
                break;
            }
            *index = 0;
        }

        Some(local_part)
    }

    fn limit_reached(&self) -> bool {
        self.policy
            .max_results
            .is_some_and(|max| self.stats.total_generated >= max)
    }
}

impl Iterator for Combinations {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.limit_reached() {
                self.exhausted = true;
                return None;
            }

            let local_part = self.next_candidate()?;

            if !self.filter.accepts(&local_part) {
                self.stats.invalid_emails += 1;
                continue;
            }

            if !self.seen.insert(&local_part) {
                self.stats.duplicates += 1;
                if !self.policy.allow_duplicates {
                    continue;
                }
            }

            self.stats.total_generated += 1;
            return Some(local_part);
        }
    }
}

impl FusedIterator for Combinations {}
