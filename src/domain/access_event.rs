//! Access event queued on every successful redirect.

use chrono::{DateTime, Utc};

/// A redirect that still has to be counted.
///
/// Sent from the redirect path to the background access worker over a bounded
/// channel, so the redirect response never waits on the counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub short_code: String,
    pub requested_at: DateTime<Utc>,
}

impl AccessEvent {
    /// Creates an event stamped with the current time.
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            requested_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_event_creation() {
        let before = Utc::now();
        let event = AccessEvent::new("Ab3dE9");

        assert_eq!(event.short_code, "Ab3dE9");
        assert!(event.requested_at >= before);
        assert!(event.requested_at <= Utc::now());
    }

    #[test]
    fn test_access_event_clone() {
        let event = AccessEvent::new(String::from("xyz"));
        let cloned = event.clone();

        assert_eq!(cloned, event);
    }
}
