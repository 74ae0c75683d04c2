//! Syntactic checks for domain names, IP addresses and listen ports.
//!
//! These checks are deliberately shallow: no DNS lookups and no per-label
//! hostname rules. A domain only has to contain a dot and fit the length bounds.

use std::net::IpAddr;

/// Shortest accepted domain name, dot included (`a.io`).
pub const MIN_DOMAIN_LEN: usize = 4;

/// Longest accepted domain name.
pub const MAX_DOMAIN_LEN: usize = 254;

/// Returns `true` if `name` contains a dot and is 4 to 254 bytes long.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_domain("example.com"));
/// assert!(!is_valid_domain("localhost"));
/// assert!(!is_valid_domain("a.b"));
/// ```
pub fn is_valid_domain(name: &str) -> bool {
    name.contains('.') && (MIN_DOMAIN_LEN..=MAX_DOMAIN_LEN).contains(&name.len())
}

/// Returns `true` for IPv4 and IPv6 literals. Hostnames are rejected.
pub fn is_valid_ip(address: &str) -> bool {
    parse_ip(address).is_some()
}

pub fn parse_ip(address: &str) -> Option<IpAddr> {
    address.parse().ok()
}

/// Parses a base-10 port number in `1..=65535`.
///
/// Signs, whitespace and any non-digit character are rejected. Leading zeros
/// are accepted, so `"080"` yields `80`.
pub fn parse_port(value: &str) -> Option<u16> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let trimmed = value.trim_start_matches('0');
    if trimmed.is_empty() || trimmed.len() > 5 {
        return None;
    }

    match trimmed.parse::<u32>() {
        Ok(port @ 1..=65535) => Some(port as u16),
        _ => None,
    }
}

/// Characters that end or open an nginx token when written unquoted.
const NGINX_SYNTAX: &[char] = &[';', '{', '}', '#', '"', '\'', '$'];

/// Returns `true` if `name` can be used as a single file name inside a
/// configuration directory and spliced into a `server_name` directive.
///
/// Path separators, whitespace, control characters and nginx syntax
/// characters are rejected.
pub fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.chars().any(|c| {
            c == '/' || c == '\\' || c.is_control() || c.is_whitespace() || NGINX_SYNTAX.contains(&c)
        })
}
