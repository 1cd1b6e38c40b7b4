//! Repository trait for URL mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable keyed storage of short code → URL mappings.
///
/// Implementations must make [`insert`](MappingRepository::insert) and
/// [`increment_access`](MappingRepository::increment_access) atomic with respect to
/// concurrent callers: uniqueness is decided by the store itself, and counters are
/// updated in place rather than read, modified, and written back.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - lock-guarded maps
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code is already taken and
    /// [`AppError::DuplicateUrl`] if the URL is already mapped. Nothing is written
    /// in either case.
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError>;

    /// Finds a mapping by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Finds the mapping for an original URL (exact match).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, AppError>;

    /// Returns true if the short code is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn short_code_exists(&self, short_code: &str) -> Result<bool, AppError>;

    /// Atomically adds one to `access_count` and sets `last_accessed` to now.
    ///
    /// Returns the updated mapping, or `Ok(None)` if the code is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_access(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Lists mappings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<UrlMapping>, AppError>;

    /// Lists mappings whose short code or URL contains `term` (case-insensitive),
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn search(
        &self,
        term: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UrlMapping>, AppError>;

    /// Counts all stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}
