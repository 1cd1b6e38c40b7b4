//! Per-mapping access counting.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// Applies redirect accesses to the store.
///
/// Each access is one atomic store-level increment of `access_count` together
/// with a `last_accessed` update. Nothing is read into memory and written back,
/// so concurrent redirects on the same code never lose an increment.
pub struct AccessTracker {
    repository: Arc<dyn MappingRepository>,
}

impl AccessTracker {
    pub fn new(repository: Arc<dyn MappingRepository>) -> Self {
        Self { repository }
    }

    /// Records one access to `short_code`.
    ///
    /// Returns the mapping with its fresh counters, or `None` if the code does
    /// not exist. Callers resolve the code before tracking it, so a missing code
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store update fails.
    pub async fn record_access(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let updated = self.repository.increment_access(short_code).await?;

        match &updated {
            Some(mapping) => debug!(
                short_code,
                access_count = mapping.access_count,
                "Access recorded"
            ),
            None => debug!(short_code, "Access for unknown short code ignored"),
        }

        Ok(updated)
    }
}
