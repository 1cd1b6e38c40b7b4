//! Redis-backed redirect cache.

use super::service::{CacheError, CacheResult, RedirectCache};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "short:";

/// Redis cache over a multiplexed [`ConnectionManager`], which reconnects on its own.
pub struct RedisCache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Invalid Redis URL: {}", e)))?;

        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!(ttl_seconds, "Connected to Redis");

        Ok(Self { conn, ttl_seconds })
    }
}

fn cache_key(short_code: &str) -> String {
    format!("{}{}", KEY_PREFIX, short_code)
}

#[async_trait]
impl RedirectCache for RedisCache {
    async fn get_target(&self, short_code: &str) -> Option<String> {
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(cache_key(short_code)).await {
            Ok(hit) => {
                debug!(short_code, hit = hit.is_some(), "Redirect cache lookup");
                hit
            }
            Err(e) => {
                warn!(short_code, error = %e, "Redis GET failed, treating as miss");
                None
            }
        }
    }

    async fn put_target(&self, short_code: &str, original_url: &str) {
        let mut conn = self.conn.clone();

        if let Err(e) = conn
            .set_ex::<_, _, ()>(cache_key(short_code), original_url, self.ttl_seconds)
            .await
        {
            warn!(short_code, error = %e, "Redis SET failed");
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
