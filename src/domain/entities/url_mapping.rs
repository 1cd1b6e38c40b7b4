//! URL mapping entity: a short code bound to the URL it redirects to.

use chrono::{DateTime, Utc};

/// A stored short code → original URL mapping with its access statistics.
///
/// `created_at` is assigned by the store on insert and never changes afterwards.
/// `access_count` and `last_accessed` are only ever modified by the store's atomic
/// increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: Option<DateTime<Utc>>,
    pub access_count: i64,
    pub creator_ip: Option<String>,
}

impl UrlMapping {
    /// Creates a mapping that has never been accessed.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        created_at: DateTime<Utc>,
        creator_ip: Option<String>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            created_at,
            last_accessed: None,
            access_count: 0,
            creator_ip,
        }
    }

    /// Returns true if the mapping has been followed at least once.
    pub fn was_accessed(&self) -> bool {
        self.access_count > 0
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub short_code: String,
    pub original_url: String,
    pub creator_ip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let now = Utc::now();
        let mapping = UrlMapping::new(
            1,
            "Ab3dE9".to_string(),
            "https://example.com/a".to_string(),
            now,
            Some("203.0.113.7".to_string()),
        );

        assert_eq!(mapping.id, 1);
        assert_eq!(mapping.short_code, "Ab3dE9");
        assert_eq!(mapping.original_url, "https://example.com/a");
        assert_eq!(mapping.created_at, now);
        assert_eq!(mapping.access_count, 0);
        assert!(mapping.last_accessed.is_none());
        assert!(!mapping.was_accessed());
    }

    #[test]
    fn test_mapping_was_accessed() {
        let mut mapping = UrlMapping::new(
            2,
            "xYz123".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
            None,
        );
        mapping.access_count = 3;
        mapping.last_accessed = Some(Utc::now());

        assert!(mapping.was_accessed());
    }
}
