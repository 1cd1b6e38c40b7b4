//! Read-through cache for redirect lookups.
//!
//! Short code targets never change once written, so entries only expire by TTL.
//! Two implementations of [`RedirectCache`] exist:
//! - [`RedisCache`] for deployments with a Redis instance
//! - [`NullCache`] when caching is disabled or Redis is unreachable at startup

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
#[cfg(test)]
pub use service::MockRedirectCache;
pub use service::{CacheError, CacheResult, RedirectCache};
