//! Email assembly
//!
//! Joins local-parts with the validated domain, optionally replacing each
//! local-part with a short SHA-256 prefix so the output can be shared without
//! exposing the names it was built from.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest when masking
pub const MASK_HEX_LEN: usize = 8;

/// One-way, deterministic mask of a local-part
pub fn mask_local_part(local_part: &str) -> String {
    let digest = Sha256::digest(local_part.as_bytes());
    let mut masked = hex::encode(digest);
    masked.truncate(MASK_HEX_LEN);
    masked
}

/// Iterator adapter turning local-parts into full addresses
#[derive(Debug)]
pub struct Assembler<I> {
    local_parts: I,
    domain: String,
    mask: bool,
}

impl<I> Assembler<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(local_parts: I, domain: &str, mask: bool) -> Self {
        Self {
            local_parts,
            domain: domain.to_string(),
            mask,
        }
    }
}

impl<I> Iterator for Assembler<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let local_part = self.local_parts.next()?;

        let mut email = if self.mask {
            mask_local_part(&local_part)
        } else {
            local_part
        };
        email.push('@');
        email.push_str(&self.domain);

        Some(email)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.local_parts.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locals(items: &[&str]) -> std::vec::IntoIter<String> {
        items
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_plain_assembly() {
        let emails: Vec<String> =
            Assembler::new(locals(&["Juan.Perez", "aSmith"]), "test.com", false).collect();

        assert_eq!(emails, vec!["Juan.Perez@test.com", "aSmith@test.com"]);
    }

    #[test]
    fn test_mask_is_stable() {
        // sha256("test") = 9f86d081884c7d65...
        assert_eq!(mask_local_part("test"), "9f86d081");
        assert_eq!(mask_local_part("juan"), mask_local_part("juan"));
        assert_ne!(mask_local_part("juan"), mask_local_part("Juan"));
    }

    #[test]
    fn test_masked_assembly() {
        let emails: Vec<String> =
            Assembler::new(locals(&["test", "test"]), "corp.io", true).collect();

        assert_eq!(emails, vec!["9f86d081@corp.io", "9f86d081@corp.io"]);
        assert!(emails.iter().all(|e| e.len() == MASK_HEX_LEN + "@corp.io".len()));
    }
}
