//! Background worker that applies queued redirect accesses.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, info};

use crate::application::services::AccessTracker;
use crate::domain::access_event::AccessEvent;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Drains `rx` until every sender is dropped, recording each access.
///
/// At most `concurrency` increments run at once. Failed increments are retried
/// with jittered exponential backoff; an access that still fails is logged and
/// counted in `shortener_access_records_failed_total`. Once the channel closes the
/// worker waits for in-flight increments before returning.
pub async fn run_access_worker(
    mut rx: mpsc::Receiver<AccessEvent>,
    tracker: Arc<AccessTracker>,
    concurrency: usize,
) {
    let permits = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(permits));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let tracker = tracker.clone();

        tokio::spawn(async move {
            let _permit = permit;
            record_with_retry(&tracker, &event).await;
        });
    }

    let _ = semaphore.acquire_many(permits as u32).await;
    info!("Access worker stopped");
}

async fn record_with_retry(tracker: &AccessTracker, event: &AccessEvent) {
    let short_code = event.short_code.as_str();
    let strategy = ExponentialBackoff::from_millis(10)
        .map(jitter)
        .take(MAX_RETRIES);

    if let Err(e) = Retry::start(strategy, move || tracker.record_access(short_code)).await {
        metrics::counter!("shortener_access_records_failed_total").increment(1);
        error!(
            short_code,
            requested_at = %event.requested_at,
            error = %e,
            "Dropping access after retries"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewUrlMapping, UrlMapping};
    use crate::domain::repositories::{MappingRepository, MockMappingRepository};
    use crate::error::AppError;
    use crate::infrastructure::persistence::InMemoryMappingRepository;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn test_worker_records_all_events_before_stopping() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        repo.insert(NewUrlMapping {
            short_code: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            creator_ip: None,
        })
        .await
        .unwrap();

        let tracker = Arc::new(AccessTracker::new(repo.clone()));
        let (tx, rx) = mpsc::channel(100);
        let worker = tokio::spawn(run_access_worker(rx, tracker, 4));

        for _ in 0..20 {
            tx.send(AccessEvent::new("abc123")).await.unwrap();
        }
        drop(tx);
        worker.await.unwrap();

        let mapping = repo.find_by_short_code("abc123").await.unwrap().unwrap();
        assert_eq!(mapping.access_count, 20);
        assert!(mapping.last_accessed.is_some());
    }

    #[tokio::test]
    async fn test_worker_retries_transient_failure() {
        let mut mock_repo = MockMappingRepository::new();
        let mut calls = 0;
        mock_repo
            .expect_increment_access()
            .times(2)
            .returning(move |code| {
                calls += 1;
                if calls == 1 {
                    Err(AppError::internal("connection reset", json!({})))
                } else {
                    Ok(Some(UrlMapping::new(
                        1,
                        code.to_string(),
                        "https://example.com".to_string(),
                        Utc::now(),
                        None,
                    )))
                }
            });

        let tracker = Arc::new(AccessTracker::new(Arc::new(mock_repo)));
        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(run_access_worker(rx, tracker, 1));

        tx.send(AccessEvent::new("abc123")).await.unwrap();
        drop(tx);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_max_retries() {
        let mut mock_repo = MockMappingRepository::new();
        mock_repo
            .expect_increment_access()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let tracker = Arc::new(AccessTracker::new(Arc::new(mock_repo)));
        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(run_access_worker(rx, tracker, 2));

        tx.send(AccessEvent::new("abc123")).await.unwrap();
        drop(tx);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_stops_on_empty_closed_channel() {
        let repo: Arc<dyn MappingRepository> = Arc::new(InMemoryMappingRepository::new());
        let tracker = Arc::new(AccessTracker::new(repo));
        let (tx, rx) = mpsc::channel::<AccessEvent>(8);
        drop(tx);

        run_access_worker(rx, tracker, 0).await;
    }
}
