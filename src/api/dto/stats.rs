//! DTOs for per-code statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlMapping;

/// Access statistics for one short code.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub access_count: i64,
}

impl From<UrlMapping> for StatsResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            short_code: mapping.short_code,
            original_url: mapping.original_url,
            created_at: mapping.created_at,
            last_accessed: mapping.last_accessed,
            access_count: mapping.access_count,
        }
    }
}
