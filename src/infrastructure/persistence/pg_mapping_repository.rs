//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::db_error::map_insert_error;

/// Row shape shared by every query against `url_mappings`.
#[derive(Debug, sqlx::FromRow)]
struct UrlMappingRow {
    id: i64,
    short_code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    last_accessed: Option<DateTime<Utc>>,
    access_count: i64,
    creator_ip: Option<String>,
}

impl From<UrlMappingRow> for UrlMapping {
    fn from(row: UrlMappingRow) -> Self {
        UrlMapping {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            created_at: row.created_at,
            last_accessed: row.last_accessed,
            access_count: row.access_count,
            creator_ip: row.creator_ip,
        }
    }
}

/// PostgreSQL repository for URL mappings.
///
/// Uniqueness of `short_code` is a table constraint and uniqueness of `original_url`
/// is a unique index on `md5(original_url)`, so URLs longer than a btree entry
/// are still accepted. Lookups by URL go through that index. Access counters are
/// bumped with a single `UPDATE`, so concurrent callers never overwrite each other.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let result = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            INSERT INTO url_mappings (short_code, original_url, creator_ip)
            VALUES ($1, $2, $3::inet)
            RETURNING id, short_code, original_url, created_at, last_accessed,
                      access_count, host(creator_ip) AS creator_ip
            "#,
        )
        .bind(&new_mapping.short_code)
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.creator_ip)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) => Err(map_insert_error(e, &new_mapping)),
        }
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, short_code, original_url, created_at, last_accessed,
                   access_count, host(creator_ip) AS creator_ip
            FROM url_mappings
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, short_code, original_url, created_at, last_accessed,
                   access_count, host(creator_ip) AS creator_ip
            FROM url_mappings
            WHERE md5(original_url) = md5($1) AND original_url = $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn short_code_exists(&self, short_code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM url_mappings WHERE short_code = $1)")
                .bind(short_code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn increment_access(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            UPDATE url_mappings
            SET access_count = access_count + 1,
                last_accessed = NOW()
            WHERE short_code = $1
            RETURNING id, short_code, original_url, created_at, last_accessed,
                      access_count, host(creator_ip) AS creator_ip
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<UrlMapping>, AppError> {
        let rows = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, short_code, original_url, created_at, last_accessed,
                   access_count, host(creator_ip) AS creator_ip
            FROM url_mappings
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UrlMapping::from).collect())
    }

    async fn search(
        &self,
        term: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UrlMapping>, AppError> {
        let pattern = format!("%{}%", escape_like(term));

        let rows = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, short_code, original_url, created_at, last_accessed,
                   access_count, host(creator_ip) AS creator_ip
            FROM url_mappings
            WHERE short_code ILIKE $1 OR original_url ILIKE $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UrlMapping::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

/// Escapes `LIKE` wildcards so `term` matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
