//! Short code generation.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet. The
//! random source is owned by the generator rather than shared global state, and
//! collision avoidance is what matters here, not unpredictability.

use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use parking_lot::Mutex;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::warn;

/// Length of freshly generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code the store accepts.
pub const MAX_CODE_LENGTH: usize = 10;

/// Candidates tried at one length before escalating to the next.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Generates short codes that are free at the time of the check.
///
/// The existence check only narrows the window for collisions; the store's unique
/// insert is what finally decides. Callers must be prepared to receive
/// [`AppError::DuplicateCode`] from the insert and ask for another code.
pub struct CodeGenerator {
    rng: Mutex<StdRng>,
    base_length: usize,
    max_attempts: usize,
}

impl CodeGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new(base_length: usize) -> Self {
        Self::with_rng(StdRng::from_os_rng(), base_length)
    }

    /// Creates a generator with an explicit random source.
    pub fn with_rng(rng: StdRng, base_length: usize) -> Self {
        Self {
            rng: Mutex::new(rng),
            base_length: base_length.clamp(1, MAX_CODE_LENGTH),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides how many candidates are tried per length.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn base_length(&self) -> usize {
        self.base_length
    }

    /// Draws one random code of `length` characters without checking the store.
    pub fn candidate(&self, length: usize) -> String {
        let mut rng = self.rng.lock();

        (0..length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }

    /// Generates a code that is not yet present in `repository`.
    ///
    /// Tries `max_attempts` candidates at the base length; when every one of them is
    /// taken, moves on to the next length, up to [`MAX_CODE_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store lookup fails or no free code is
    /// found at any permitted length.
    pub async fn generate(&self, repository: &dyn MappingRepository) -> Result<String, AppError> {
        for length in self.base_length..=MAX_CODE_LENGTH {
            for _ in 0..self.max_attempts {
                let code = self.candidate(length);

                if !repository.short_code_exists(&code).await? {
                    return Ok(code);
                }

                metrics::counter!("shortener_code_collisions_total").increment(1);
            }

            warn!(
                length,
                attempts = self.max_attempts,
                "No free short code at this length, escalating"
            );
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Short code space exhausted", "max_length": MAX_CODE_LENGTH }),
        ))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}
