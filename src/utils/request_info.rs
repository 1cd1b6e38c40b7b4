//! Client metadata extracted from HTTP request headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Resolves the client IP address for a request.
///
/// When `behind_proxy` is set, the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`; unparseable values are ignored. Otherwise, and as a fallback, the
/// socket peer address is used.
pub fn client_ip(headers: &HeaderMap, peer: IpAddr, behind_proxy: bool) -> IpAddr {
    if !behind_proxy {
        return peer;
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    forwarded.or_else(real_ip).unwrap_or(peer)
}

/// Returns the base URL short links are published under.
///
/// A configured base URL takes priority; otherwise it is built from the `Host`
/// header. Returns `None` when neither is available.
pub fn public_base_url(headers: &HeaderMap, configured: Option<&str>) -> Option<String> {
    if let Some(base) = configured {
        return Some(base.trim_end_matches('/').to_string());
    }

    let host = headers.get(header::HOST)?.to_str().ok()?.trim();
    if host.is_empty() {
        return None;
    }

    Some(format!("http://{}", host))
}

/// Builds the public short URL for `short_code`.
pub fn short_url(base: Option<&str>, short_code: &str) -> String {
    match base {
        Some(base) => format!("{}/short/{}/", base.trim_end_matches('/'), short_code),
        None => format!("/short/{}/", short_code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> IpAddr {
        "198.51.100.10".parse().unwrap()
    }

    #[test]
    fn test_client_ip_uses_peer_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.1"));

        assert_eq!(client_ip(&headers, peer(), false), peer());
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.1, 10.0.0.2"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.99"));

        let ip = client_ip(&headers, peer(), true);
        assert_eq!(ip, "203.0.113.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::1"));

        let ip = client_ip(&headers, peer(), true);
        assert_eq!(ip, "2001:db8::1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer(), true), peer());
    }

    #[test]
    fn test_public_base_url_prefers_configured() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("ignored.example"));

        let base = public_base_url(&headers, Some("https://s.example.com/"));
        assert_eq!(base.as_deref(), Some("https://s.example.com"));
    }

    #[test]
    fn test_public_base_url_from_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));

        let base = public_base_url(&headers, None);
        assert_eq!(base.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn test_public_base_url_missing() {
        assert!(public_base_url(&HeaderMap::new(), None).is_none());
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url(Some("https://s.example.com/"), "Ab3dE9"),
            "https://s.example.com/short/Ab3dE9/"
        );
        assert_eq!(short_url(None, "Ab3dE9"), "/short/Ab3dE9/");
    }
}
