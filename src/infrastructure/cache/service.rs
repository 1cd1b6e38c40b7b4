//! Cache trait and error types.

use async_trait::async_trait;

/// Errors raised while setting up a cache backend.
///
/// Lookups and writes never surface these; a failing cache behaves like an empty one.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Maps short codes to their target URL.
///
/// Implementations are fail-open. A backend error on read is reported as a miss
/// and a failed write is logged and dropped, so the mapping store stays the only
/// source of truth.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectCache: Send + Sync {
    /// Cached target for `short_code`, or `None` on a miss.
    async fn get_target(&self, short_code: &str) -> Option<String>;

    /// Stores `original_url` under `short_code` with the backend's default TTL.
    async fn put_target(&self, short_code: &str, original_url: &str);

    /// Whether the backend answers. Reported by `/health`.
    async fn health_check(&self) -> bool;

    /// Name shown in health output and startup logs.
    fn backend(&self) -> &'static str;
}
