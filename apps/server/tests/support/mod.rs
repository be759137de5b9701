#![allow(unused)]
//! Shared test support: an app served over in-memory backends, request
//! helpers, and fault-injecting backend fakes.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use planvault::{
    config::Config,
    db::{
        KeyValueStore, KvError, MemoryEventChannel, MemoryKeyValueStore, MemorySearchBackend,
        SearchBackend, SearchError,
    },
    state::AppState,
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub kv: Arc<MemoryKeyValueStore>,
    pub search: Arc<MemorySearchBackend>,
    pub events: Arc<MemoryEventChannel>,
}

pub async fn test_app() -> TestApp {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let search = Arc::new(MemorySearchBackend::new());
    let events = Arc::new(MemoryEventChannel::new());

    let state = AppState::with_backends(
        Config::default(),
        kv.clone(),
        search.clone(),
        events.clone(),
    )
    .await
    .expect("test app state");

    TestApp {
        router: planvault::api::create_router(state.clone()),
        state,
        kv,
        search,
        events,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&value).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request dispatch");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes()
            .to_vec();

        (status, headers, bytes)
    }

    /// Wait until at least `count` events reached the channel.
    pub async fn wait_for_events(&self, count: usize) {
        for _ in 0..100 {
            if self.events.messages().len() >= count {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

pub fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("JSON response body")
}

pub fn etag(headers: &HeaderMap) -> String {
    headers
        .get("etag")
        .expect("ETag header")
        .to_str()
        .unwrap()
        .to_string()
}

pub fn sample_plan(id: &str) -> Value {
    json!({
        "planCostShares": {
            "deductible": 500,
            "_org": "example.com",
            "copay": 20,
            "objectId": format!("{id}-cs"),
            "objectType": "membercostshare"
        },
        "linkedPlanServices": [],
        "_org": "example.com",
        "objectId": id,
        "objectType": "plan",
        "planType": "inNetwork",
        "creationDate": "2024-01-15"
    })
}

pub fn sample_service(id: &str) -> Value {
    json!({
        "linkedService": {
            "_org": "example.com",
            "objectId": format!("{id}-ref"),
            "objectType": "service",
            "name": "Yearly physical"
        },
        "planserviceCostShares": {
            "deductible": 10,
            "_org": "example.com",
            "copay": 0,
            "objectId": format!("{id}-cs"),
            "objectType": "membercostshare"
        },
        "_org": "example.com",
        "objectId": id,
        "objectType": "planservice"
    })
}

// ============================================================================
// Fault-injecting backends
// ============================================================================

/// Key/value store that reports the backend as unreachable.
#[derive(Debug, Default)]
pub struct UnavailableKeyValueStore;

#[async_trait]
impl KeyValueStore for UnavailableKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), KvError> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError::Unavailable("connection refused".to_string()))
    }
}

/// Search backend that works until told to fail.
#[derive(Debug, Default)]
pub struct FlakySearchBackend {
    pub inner: MemorySearchBackend,
    failing: AtomicBool,
}

impl FlakySearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SearchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SearchError::Backend("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for FlakySearchBackend {
    async fn ensure_index(&self, index: &str, mapping: &Value) -> Result<(), SearchError> {
        self.check()?;
        self.inner.ensure_index(index, mapping).await
    }

    async fn index(
        &self,
        index: &str,
        id: &str,
        routing: &str,
        body: Value,
    ) -> Result<(), SearchError> {
        self.check()?;
        self.inner.index(index, id, routing, body).await
    }

    async fn delete(&self, index: &str, id: &str) -> Result<(), SearchError> {
        self.check()?;
        self.inner.delete(index, id).await
    }
}
