//! Cache that stores nothing.

use super::service::RedirectCache;
use async_trait::async_trait;
use tracing::debug;

/// Always misses. Used when `REDIS_URL` is unset or Redis is down at startup.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Redirect cache disabled");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RedirectCache for NullCache {
    async fn get_target(&self, _short_code: &str) -> Option<String> {
        None
    }

    async fn put_target(&self, _short_code: &str, _original_url: &str) {}

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}
