//! Short URL creation with deduplication.

use std::net::IpAddr;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::{validate_url, violations_to_details};

/// Inserts attempted before a run of code collisions is treated as a failure.
const MAX_INSERT_ATTEMPTS: usize = 5;

/// Result of [`ShortenService::shorten`].
#[derive(Debug, Clone)]
pub struct ShortenOutcome {
    pub mapping: UrlMapping,
    /// `false` when an existing mapping for the same URL was returned.
    pub created: bool,
}

/// Creates short URLs, returning the existing mapping for URLs seen before.
///
/// The flow is validate, look up by URL, then generate a code and insert. The
/// store has the final word on uniqueness of both the code and the URL:
/// - a code taken between generation and insert is retried with a new code
/// - a URL inserted concurrently by another request is re-read and returned,
///   so the first writer wins and every caller sees the same code
pub struct ShortenService {
    repository: Arc<dyn MappingRepository>,
    generator: Arc<CodeGenerator>,
}

impl ShortenService {
    pub fn new(repository: Arc<dyn MappingRepository>, generator: Arc<CodeGenerator>) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Shortens `url`, recording `client_ip` as the creator of a new mapping.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing every violated URL rule.
    /// Returns [`AppError::Internal`] on store failures or when no free code can be
    /// inserted.
    pub async fn shorten(
        &self,
        url: &str,
        client_ip: Option<IpAddr>,
    ) -> Result<ShortenOutcome, AppError> {
        let url = url.trim();

        if let Err(violations) = validate_url(url) {
            warn!(
                rules = ?violations.iter().map(|r| r.code()).collect::<Vec<_>>(),
                "Rejected URL"
            );
            return Err(AppError::bad_request(
                "Validation failed",
                violations_to_details(&violations),
            ));
        }

        if let Some(existing) = self.repository.find_by_original_url(url).await? {
            return Ok(self.deduplicated(existing));
        }

        let creator_ip = client_ip.map(|ip| ip.to_string());

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let short_code = self.generator.generate(self.repository.as_ref()).await?;

            let new_mapping = NewUrlMapping {
                short_code,
                original_url: url.to_string(),
                creator_ip: creator_ip.clone(),
            };

            match self.repository.insert(new_mapping).await {
                Ok(mapping) => {
                    metrics::counter!("shortener_mappings_created_total").increment(1);
                    info!(
                        short_code = %mapping.short_code,
                        original_url = %mapping.original_url,
                        "Short URL created"
                    );
                    return Ok(ShortenOutcome {
                        mapping,
                        created: true,
                    });
                }
                Err(AppError::DuplicateCode { code }) => {
                    metrics::counter!("shortener_code_collisions_total").increment(1);
                    warn!(short_code = %code, attempt, "Short code taken at insert, retrying");
                }
                Err(AppError::DuplicateUrl { .. }) => {
                    return match self.repository.find_by_original_url(url).await? {
                        Some(winner) => Ok(self.deduplicated(winner)),
                        None => Err(AppError::internal(
                            "Mapping vanished after duplicate URL conflict",
                            json!({ "original_url": url }),
                        )),
                    };
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many insert collisions", "attempts": MAX_INSERT_ATTEMPTS }),
        ))
    }

    fn deduplicated(&self, mapping: UrlMapping) -> ShortenOutcome {
        metrics::counter!("shortener_mappings_deduplicated_total").increment(1);
        info!(short_code = %mapping.short_code, "Returning existing short URL");

        ShortenOutcome {
            mapping,
            created: false,
        }
    }
}
