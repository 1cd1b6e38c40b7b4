//! URL acceptance rules for shortening.
//!
//! A URL is accepted only if it is a well-formed absolute `http`/`https` URL of at
//! most [`MAX_URL_LENGTH`] characters whose host is not loopback or a private
//! network. Every violated rule is reported, not just the first.

use serde_json::{Value, json};
use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};
use validator::ValidateUrl;

/// Longest URL that can be stored.
pub const MAX_URL_LENGTH: usize = 2048;

/// A single acceptance rule a URL can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UrlRule {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is too long (maximum 2048 characters)")]
    TooLong,

    #[error("URL must start with http:// or https://")]
    Scheme,

    #[error("Invalid URL format")]
    Format,

    #[error("URLs pointing to localhost or private networks are not allowed")]
    PrivateNetwork,
}

impl UrlRule {
    /// Machine-readable rule identifier.
    pub fn code(&self) -> &'static str {
        match self {
            UrlRule::Empty => "empty",
            UrlRule::TooLong => "too_long",
            UrlRule::Scheme => "scheme",
            UrlRule::Format => "format",
            UrlRule::PrivateNetwork => "private_network",
        }
    }
}

/// Checks `input` against every rule.
///
/// An empty input reports only [`UrlRule::Empty`]. Otherwise all rules are evaluated
/// and the violations are returned in rule order.
///
/// # Errors
///
/// Returns the list of violated rules.
pub fn validate_url(input: &str) -> Result<(), Vec<UrlRule>> {
    if input.is_empty() {
        return Err(vec![UrlRule::Empty]);
    }

    let mut violations = Vec::new();

    if input.chars().count() > MAX_URL_LENGTH {
        violations.push(UrlRule::TooLong);
    }

    if !(input.starts_with("http://") || input.starts_with("https://")) {
        violations.push(UrlRule::Scheme);
    }

    match parse_absolute(input) {
        Some(url) => {
            if url.host().is_some_and(|host| is_private_host(&host)) {
                violations.push(UrlRule::PrivateNetwork);
            }
        }
        None => violations.push(UrlRule::Format),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Renders violations as `{"url": [{"rule": ..., "message": ...}, ...]}`.
pub fn violations_to_details(violations: &[UrlRule]) -> Value {
    let items: Vec<Value> = violations
        .iter()
        .map(|rule| json!({ "rule": rule.code(), "message": rule.to_string() }))
        .collect();

    json!({ "url": items })
}

/// Parses `input` as an absolute URL with a non-empty host.
fn parse_absolute(input: &str) -> Option<Url> {
    if input.chars().any(char::is_whitespace) || !input.validate_url() {
        return None;
    }

    let url = Url::parse(input).ok()?;

    match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => Some(url),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Some(url),
        _ => None,
    }
}

/// Returns true for hosts that resolve to this machine or a private network.
fn is_private_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            domain == "localhost" || domain.ends_with(".localhost")
        }
        Host::Ipv4(ip) => is_private_ipv4(ip),
        Host::Ipv6(ip) => is_private_ipv6(ip),
    }
}

fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_unspecified()
}

fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }

    ip.to_ipv4_mapped().is_some_and(|v4| is_private_ipv4(&v4))
}
