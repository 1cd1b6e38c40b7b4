mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use snaplink::api::handlers::{stats_handler, stats_list_handler};
use snaplink::domain::repositories::MappingRepository;
use snaplink::infrastructure::persistence::InMemoryMappingRepository;
use snaplink::state::AppState;
use std::sync::Arc;

fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/stats", get(stats_list_handler))
        .route("/stats/{code}", get(stats_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_stats_for_new_mapping() {
    let repo = Arc::new(InMemoryMappingRepository::new());
    common::create_test_mapping(repo.as_ref(), "stat01", "https://example.com/s").await;
    let (state, _rx) = common::create_test_state_with(repo);
    let server = test_server(state);

    let response = server.get("/stats/stat01").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "stat01");
    assert_eq!(json["original_url"], "https://example.com/s");
    assert_eq!(json["access_count"], 0);
    assert!(json["last_accessed"].is_null());
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_stats_reflect_accesses() {
    let repo = Arc::new(InMemoryMappingRepository::new());
    common::create_test_mapping(repo.as_ref(), "stat02", "https://example.com/t").await;
    for _ in 0..3 {
        repo.increment_access("stat02").await.unwrap();
    }
    let (state, _rx) = common::create_test_state_with(repo);
    let server = test_server(state);

    let json = server.get("/stats/stat02").await.json::<serde_json::Value>();

    assert_eq!(json["access_count"], 3);
    assert!(json["last_accessed"].is_string());
}

#[tokio::test]
async fn test_stats_not_found() {
    let (state, _rx) = common::create_test_state();
    let server = test_server(state);

    let response = server.get("/stats/absent").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["details"]["short_code"], "absent");
}

#[tokio::test]
async fn test_stats_list_pagination() {
    let repo = Arc::new(InMemoryMappingRepository::new());
    for i in 0..5 {
        common::create_test_mapping(
            repo.as_ref(),
            &format!("page0{}", i),
            &format!("https://example.com/{}", i),
        )
        .await;
    }
    let (state, _rx) = common::create_test_state_with(repo);
    let server = test_server(state);

    let response = server
        .get("/stats")
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["pagination"]["page"], 2);
    assert_eq!(json["pagination"]["page_size"], 2);
    assert_eq!(json["pagination"]["total_items"], 5);
    assert_eq!(json["pagination"]["total_pages"], 3);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_stats_list_newest_first() {
    let repo = Arc::new(InMemoryMappingRepository::new());
    common::create_test_mapping(repo.as_ref(), "older1", "https://example.com/old").await;
    common::create_test_mapping(repo.as_ref(), "newer1", "https://example.com/new").await;
    let (state, _rx) = common::create_test_state_with(repo);
    let server = test_server(state);

    let json = server.get("/stats").await.json::<serde_json::Value>();

    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["short_code"], "newer1");
    assert_eq!(items[1]["short_code"], "older1");
}

#[tokio::test]
async fn test_stats_list_empty() {
    let (state, _rx) = common::create_test_state();
    let server = test_server(state);

    let response = server.get("/stats").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["pagination"]["total_items"], 0);
    assert_eq!(json["pagination"]["total_pages"], 0);
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_list_rejects_oversized_page() {
    let (state, _rx) = common::create_test_state();
    let server = test_server(state);

    let response = server
        .get("/stats")
        .add_query_param("page_size", 101)
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["details"]["page_size"], 101);
}

#[tokio::test]
async fn test_stats_list_rejects_page_zero() {
    let (state, _rx) = common::create_test_state();
    let server = test_server(state);

    server
        .get("/stats")
        .add_query_param("page", 0)
        .await
        .assert_status_bad_request();
}
