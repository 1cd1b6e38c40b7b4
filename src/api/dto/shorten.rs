//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlMapping;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// A created or previously existing short URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    pub fn from_mapping(mapping: UrlMapping, short_url: String) -> Self {
        Self {
            short_code: mapping.short_code,
            short_url,
            original_url: mapping.original_url,
            created_at: mapping.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ignores_unknown_fields() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "extra": 1}"#).unwrap();
        assert_eq!(req.url, "https://example.com");
    }

    #[test]
    fn test_request_requires_url() {
        assert!(serde_json::from_str::<ShortenRequest>("{}").is_err());
    }

    #[test]
    fn test_response_from_mapping() {
        let mapping = UrlMapping::new(
            1,
            "Ab3dE9".to_string(),
            "https://example.com/a".to_string(),
            Utc::now(),
            None,
        );
        let response =
            ShortenResponse::from_mapping(mapping, "http://sho.rt/short/Ab3dE9/".to_string());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["short_code"], "Ab3dE9");
        assert_eq!(json["short_url"], "http://sho.rt/short/Ab3dE9/");
        assert_eq!(json["original_url"], "https://example.com/a");
        assert!(json["created_at"].is_string());
    }
}
