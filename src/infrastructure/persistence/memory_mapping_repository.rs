//! In-memory implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    by_code: HashMap<String, UrlMapping>,
    code_by_url: HashMap<String, String>,
}

/// Mapping repository backed by two hash maps behind one lock.
///
/// Every insert and increment runs entirely under the write lock, which gives the
/// same guarantees as the database constraints: a taken code or URL is rejected
/// without a partial write, and concurrent increments are never lost. Data lives
/// only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    store: RwLock<Store>,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the matching mappings, newest first.
    fn sorted_matching<F>(&self, predicate: F) -> Vec<UrlMapping>
    where
        F: Fn(&UrlMapping) -> bool,
    {
        let store = self.store.read();
        let mut mappings: Vec<UrlMapping> = store
            .by_code
            .values()
            .filter(|m| predicate(m))
            .cloned()
            .collect();

        mappings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        mappings
    }
}

fn page(mappings: Vec<UrlMapping>, offset: i64, limit: i64) -> Vec<UrlMapping> {
    mappings
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let mut store = self.store.write();

        if store.by_code.contains_key(&new_mapping.short_code) {
            return Err(AppError::DuplicateCode {
                code: new_mapping.short_code,
            });
        }
        if store.code_by_url.contains_key(&new_mapping.original_url) {
            return Err(AppError::DuplicateUrl {
                url: new_mapping.original_url,
            });
        }

        store.next_id += 1;
        let mapping = UrlMapping::new(
            store.next_id,
            new_mapping.short_code,
            new_mapping.original_url,
            Utc::now(),
            new_mapping.creator_ip,
        );

        store
            .code_by_url
            .insert(mapping.original_url.clone(), mapping.short_code.clone());
        store
            .by_code
            .insert(mapping.short_code.clone(), mapping.clone());

        Ok(mapping)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.store.read().by_code.get(short_code).cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlMapping>, AppError> {
        let store = self.store.read();

        Ok(store
            .code_by_url
            .get(original_url)
            .and_then(|code| store.by_code.get(code))
            .cloned())
    }

    async fn short_code_exists(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.store.read().by_code.contains_key(short_code))
    }

    async fn increment_access(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let mut store = self.store.write();

        Ok(store.by_code.get_mut(short_code).map(|mapping| {
            mapping.access_count += 1;
            mapping.last_accessed = Some(Utc::now());
            mapping.clone()
        }))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<UrlMapping>, AppError> {
        Ok(page(self.sorted_matching(|_| true), offset, limit))
    }

    async fn search(
        &self,
        term: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<UrlMapping>, AppError> {
        let needle = term.to_lowercase();
        let matches = self.sorted_matching(|m| {
            m.short_code.to_lowercase().contains(&needle)
                || m.original_url.to_lowercase().contains(&needle)
        });

        Ok(page(matches, offset, limit))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.store.read().by_code.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_mapping(code: &str, url: &str) -> NewUrlMapping {
        NewUrlMapping {
            short_code: code.to_string(),
            original_url: url.to_string(),
            creator_ip: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryMappingRepository::new();

        let created = repo
            .insert(new_mapping("abc123", "https://example.com/a"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.access_count, 0);

        let by_code = repo.find_by_short_code("abc123").await.unwrap();
        assert_eq!(by_code, Some(created.clone()));

        let by_url = repo
            .find_by_original_url("https://example.com/a")
            .await
            .unwrap();
        assert_eq!(by_url, Some(created));
    }

    #[tokio::test]
    async fn test_insert_duplicate_code_writes_nothing() {
        let repo = InMemoryMappingRepository::new();
        repo.insert(new_mapping("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let result = repo
            .insert(new_mapping("abc123", "https://example.com/b"))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateCode { ref code }) if code == "abc123"));
        assert!(
            repo.find_by_original_url("https://example.com/b")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_url() {
        let repo = InMemoryMappingRepository::new();
        repo.insert(new_mapping("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let result = repo
            .insert(new_mapping("zzz999", "https://example.com/a"))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateUrl { .. })));
        assert!(!repo.short_code_exists("zzz999").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_access() {
        let repo = InMemoryMappingRepository::new();
        repo.insert(new_mapping("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let before = Utc::now();
        let updated = repo.increment_access("abc123").await.unwrap().unwrap();

        assert_eq!(updated.access_count, 1);
        assert!(updated.last_accessed.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_increment_access_unknown_code() {
        let repo = InMemoryMappingRepository::new();
        assert!(repo.increment_access("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_paging() {
        let repo = InMemoryMappingRepository::new();
        for i in 0..5 {
            repo.insert(new_mapping(
                &format!("code{}", i),
                &format!("https://example.com/{}", i),
            ))
            .await
            .unwrap();
        }

        let first_page = repo.list(0, 2).await.unwrap();
        let codes: Vec<&str> = first_page.iter().map(|m| m.short_code.as_str()).collect();
        assert_eq!(codes, vec!["code4", "code3"]);

        let last_page = repo.list(4, 2).await.unwrap();
        assert_eq!(last_page.len(), 1);
        assert_eq!(last_page[0].short_code, "code0");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let repo = InMemoryMappingRepository::new();
        repo.insert(new_mapping("AbC123", "https://rust-lang.org"))
            .await
            .unwrap();
        repo.insert(new_mapping("xyz789", "https://example.com/Rust"))
            .await
            .unwrap();
        repo.insert(new_mapping("qqq111", "https://other.org"))
            .await
            .unwrap();

        let results = repo.search("RUST", 0, 10).await.unwrap();
        assert_eq!(results.len(), 2);

        let results = repo.search("abc", 0, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].short_code, "AbC123");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_increments_and_reads() {
        let repo = std::sync::Arc::new(InMemoryMappingRepository::new());
        repo.insert(new_mapping("abc123", "https://example.com/a"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        repo.increment_access("abc123").await.unwrap();
                    } else {
                        repo.list(0, 10).await.unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let mapping = repo.find_by_short_code("abc123").await.unwrap().unwrap();
        assert_eq!(mapping.access_count, 50);
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(InMemoryMappingRepository::new().ping().await.is_ok());
    }
}
