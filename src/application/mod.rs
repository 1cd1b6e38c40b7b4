//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::MappingRepository`] trait and
//! give HTTP handlers and the admin CLI a narrow API.
//!
//! # Available Services
//!
//! - [`services::ShortenService`] - Validation, deduplication and code allocation
//! - [`services::RedirectService`] - Code resolution and access scheduling
//! - [`services::AccessTracker`] - Atomic access counting
//! - [`services::StatsService`] - Per-code statistics and listings
//!
//! [`access_worker`] drains queued redirect accesses into the tracker.

pub mod access_worker;
pub mod services;
