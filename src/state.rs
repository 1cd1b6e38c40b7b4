//! Shared application state passed to all HTTP handlers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AccessTracker, RedirectService, ShortenService, StatsService};
use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::cache::RedirectCache;
use crate::utils::code_generator::CodeGenerator;

/// Application state shared across all handlers.
///
/// Cheap to clone: every service sits behind an `Arc` and the access sender is a
/// channel handle.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    /// Shared with the access worker so queued and inline accesses go through one path.
    pub access_tracker: Arc<AccessTracker>,
    pub cache: Arc<dyn RedirectCache>,
    pub access_sender: mpsc::Sender<AccessEvent>,
    /// Public base URL for short links; derived from the `Host` header when unset.
    pub base_url: Option<String>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires all services around one mapping store.
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        cache: Arc<dyn RedirectCache>,
        access_sender: mpsc::Sender<AccessEvent>,
        generator: Arc<CodeGenerator>,
    ) -> Self {
        let access_tracker = Arc::new(AccessTracker::new(repository.clone()));

        Self {
            shorten_service: Arc::new(ShortenService::new(repository.clone(), generator)),
            redirect_service: Arc::new(RedirectService::new(
                repository.clone(),
                cache.clone(),
                access_tracker.clone(),
                access_sender.clone(),
            )),
            stats_service: Arc::new(StatsService::new(repository)),
            access_tracker,
            cache,
            access_sender,
            base_url: None,
            behind_proxy: false,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }
}
