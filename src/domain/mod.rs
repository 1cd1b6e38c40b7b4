//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - The [`entities::UrlMapping`] record
//! - [`repositories`] - The [`repositories::MappingRepository`] storage contract
//! - [`access_event`] - Redirect accesses queued for counting
//!
//! # Access Counting Flow
//!
//! 1. [`crate::application::services::RedirectService`] resolves a short code
//! 2. An [`access_event::AccessEvent`] is sent to a bounded channel
//! 3. [`crate::application::access_worker::run_access_worker`] drains the channel
//! 4. [`crate::application::services::AccessTracker`] applies the atomic increment

pub mod access_event;
pub mod entities;
pub mod repositories;
