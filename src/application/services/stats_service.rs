//! Mapping statistics and listings.

use std::sync::Arc;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use serde_json::json;

/// One page of mappings together with the overall total.
#[derive(Debug, Clone)]
pub struct MappingPage {
    pub items: Vec<UrlMapping>,
    pub total: i64,
}

/// Read-only access to mapping statistics.
pub struct StatsService {
    repository: Arc<dyn MappingRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn MappingRepository>) -> Self {
        Self { repository }
    }

    /// Retrieves the statistics for one short code.
    ///
    /// Reflects every access recorded so far; accesses still queued for the
    /// access worker are not yet included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_stats(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        self.repository
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    format!("Short URL '{}' not found", short_code),
                    json!({ "short_code": short_code }),
                )
            })
    }

    /// Lists mappings newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<MappingPage, AppError> {
        let items = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;

        Ok(MappingPage { items, total })
    }

    /// Checks that the store is reachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
