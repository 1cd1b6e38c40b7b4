//! Business logic services for the application layer.

pub mod access_tracker;
pub mod redirect_service;
pub mod shorten_service;
pub mod stats_service;

pub use access_tracker::AccessTracker;
pub use redirect_service::RedirectService;
pub use shorten_service::{ShortenOutcome, ShortenService};
pub use stats_service::{MappingPage, StatsService};
