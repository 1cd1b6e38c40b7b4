//! Short code resolution for redirects.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use crate::application::services::AccessTracker;
use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::RedirectCache;

/// Resolves short codes to their target URL and schedules access tracking.
///
/// Counting happens off the request path. The access is queued for the access
/// worker; when the queue is full or the worker is gone it is recorded on a
/// spawned task instead. Either way the redirect never waits for the counter.
pub struct RedirectService {
    repository: Arc<dyn MappingRepository>,
    cache: Arc<dyn RedirectCache>,
    tracker: Arc<AccessTracker>,
    access_sender: mpsc::Sender<AccessEvent>,
}

impl RedirectService {
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        cache: Arc<dyn RedirectCache>,
        tracker: Arc<AccessTracker>,
        access_sender: mpsc::Sender<AccessEvent>,
    ) -> Self {
        Self {
            repository,
            cache,
            tracker,
            access_sender,
        }
    }

    /// Returns the original URL for `short_code` and records the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] naming the code if it does not exist.
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        let original_url = match self.cache.get_target(short_code).await {
            Some(url) => url,
            None => {
                let mapping = self
                    .repository
                    .find_by_short_code(short_code)
                    .await?
                    .ok_or_else(|| {
                        metrics::counter!("shortener_redirects_not_found_total").increment(1);
                        AppError::not_found(
                            format!("Short URL '{}' not found", short_code),
                            json!({ "short_code": short_code }),
                        )
                    })?;

                self.backfill_cache(short_code, &mapping.original_url);
                mapping.original_url
            }
        };

        self.track_access(short_code);
        metrics::counter!("shortener_redirects_total").increment(1);

        Ok(original_url)
    }

    fn backfill_cache(&self, short_code: &str, original_url: &str) {
        let cache = self.cache.clone();
        let short_code = short_code.to_string();
        let original_url = original_url.to_string();

        tokio::spawn(async move {
            cache.put_target(&short_code, &original_url).await;
        });
    }

    fn track_access(&self, short_code: &str) {
        let event = match self.access_sender.try_send(AccessEvent::new(short_code)) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => {
                warn!(short_code, "Access queue full, recording inline");
                event
            }
            Err(TrySendError::Closed(event)) => {
                debug!(short_code, "Access worker stopped, recording inline");
                event
            }
        };

        let tracker = self.tracker.clone();
        tokio::spawn(async move {
            if let Err(e) = tracker.record_access(&event.short_code).await {
                metrics::counter!("shortener_access_records_failed_total").increment(1);
                error!(short_code = %event.short_code, error = %e, "Failed to record access");
            }
        });
    }
}
