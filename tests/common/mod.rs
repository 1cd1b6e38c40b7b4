#![allow(dead_code)]

use axum::extract::ConnectInfo;
use rand::SeedableRng;
use rand::rngs::StdRng;
use snaplink::domain::access_event::AccessEvent;
use snaplink::domain::entities::{NewUrlMapping, UrlMapping};
use snaplink::domain::repositories::MappingRepository;
use snaplink::infrastructure::cache::NullCache;
use snaplink::infrastructure::persistence::InMemoryMappingRepository;
use snaplink::state::AppState;
use snaplink::utils::code_generator::CodeGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_PEER: &str = "203.0.113.7:12345";

/// State over an empty in-memory store with caching disabled.
pub fn create_test_state() -> (AppState, mpsc::Receiver<AccessEvent>) {
    create_test_state_with(Arc::new(InMemoryMappingRepository::new()))
}

pub fn create_test_state_with(
    repository: Arc<dyn MappingRepository>,
) -> (AppState, mpsc::Receiver<AccessEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let generator = Arc::new(CodeGenerator::with_rng(StdRng::seed_from_u64(42), 6));

    let state = AppState::new(repository, Arc::new(NullCache::new()), tx, generator);

    (state, rx)
}

pub async fn create_test_mapping(
    repository: &dyn MappingRepository,
    code: &str,
    url: &str,
) -> UrlMapping {
    repository
        .insert(NewUrlMapping {
            short_code: code.to_string(),
            original_url: url.to_string(),
            creator_ip: None,
        })
        .await
        .unwrap()
}

/// Injects a fixed `ConnectInfo` so handlers can read the peer address.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = TEST_PEER.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
