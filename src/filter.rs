//! Local-part filtering module
//!
//! Candidates longer than the SMTP local-part limit are discarded and counted
//! as invalid instead of being emitted.

/// Maximum local-part length in characters (RFC 5321)
pub const MAX_LOCAL_PART_LEN: usize = 64;

/// Length-based validity filter for generated local-parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthFilter {
    max_len: usize,
}

impl LengthFilter {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Check if a local-part is short enough to be used
    #[inline]
    pub fn accepts(&self, local_part: &str) -> bool {
        // Fast byte-length check first for ASCII-only optimization
        if local_part.len() <= self.max_len {
            return true;
        }
        if local_part.is_ascii() {
            return false;
        }
        local_part.chars().count() <= self.max_len
    }
}

impl Default for LengthFilter {
    fn default() -> Self {
        Self::new(MAX_LOCAL_PART_LEN)
    }
}
