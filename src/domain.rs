//! Domain validation
//!
//! Reduces user input to its registrable `domain.suffix` form using the
//! embedded public suffix list. Only known suffixes are accepted, so typos
//! such as `empresa.cmo` are rejected instead of producing useless output.

use crate::error::{MailcraftError, Result};

/// Validate a domain (or URL) and return the lowercased registrable domain
pub fn validate_domain(input: &str) -> Result<String> {
    let host = extract_host(input);
    let invalid = || MailcraftError::InvalidDomain(input.to_string());

    if host.is_empty() || host.starts_with('.') || host.contains("..") {
        return Err(invalid());
    }

    let domain = psl::domain(host.as_bytes()).ok_or_else(invalid)?;
    if !domain.suffix().is_known() {
        return Err(invalid());
    }

    let registrable = std::str::from_utf8(domain.as_bytes()).map_err(|_| invalid())?;
    log::debug!("Domain '{}' resolved to '{}'", input, registrable);

    Ok(registrable.to_string())
}

/// Strip scheme, credentials, path, port and trailing dot
fn extract_host(input: &str) -> String {
    let mut host = input.trim();

    if let Some((_, rest)) = host.split_once("://") {
        host = rest;
    }
    if let Some(end) = host.find(['/', '?', '#']) {
        host = &host[..end];
    }
    if let Some((_, rest)) = host.rsplit_once('@') {
        host = rest;
    }
    if let Some((name, port)) = host.rsplit_once(':') {
        if port.chars().all(|c| c.is_ascii_digit()) {
            host = name;
        }
    }

    host.trim_end_matches('.').to_lowercase()
}
