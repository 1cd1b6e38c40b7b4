//! Per-client rate limiting using the token bucket algorithm.
//!
//! Requests exceeding the limit receive `429 Too Many Requests`.

use anyhow::{Context, Result};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

pub type PeerRateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

pub type ProxyRateLimitLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Limiter keyed on the socket peer address.
///
/// `per_second` is the replenish interval in seconds for one token and `burst` the
/// bucket size. Both must be non-zero.
pub fn layer(per_second: u64, burst: u32) -> Result<PeerRateLimitLayer> {
    let config = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst)
        .finish()
        .context("Invalid rate limit settings")?;

    Ok(GovernorLayer::new(Arc::new(config)))
}

/// Limiter keyed on `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling back
/// to the peer address.
///
/// Only use behind a trusted reverse proxy; clients can set these headers freely.
pub fn proxy_layer(per_second: u64, burst: u32) -> Result<ProxyRateLimitLayer> {
    let config = GovernorConfigBuilder::default()
        .per_second(per_second)
        .burst_size(burst)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .context("Invalid rate limit settings")?;

    Ok(GovernorLayer::new(Arc::new(config)))
}
