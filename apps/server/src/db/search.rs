//! Search backend boundary.
//!
//! The projector talks to an injected [`SearchBackend`]: per-document index
//! and delete plus idempotent index provisioning. Two implementations ship:
//! an HTTP client for an Elasticsearch-compatible REST API and an in-process
//! store for tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Create `index` with `mapping` if it does not exist. Idempotent.
    async fn ensure_index(&self, index: &str, mapping: &JsonValue) -> Result<(), SearchError>;

    /// Index (or overwrite) one document, routed by `routing`.
    async fn index(
        &self,
        index: &str,
        id: &str,
        routing: &str,
        body: JsonValue,
    ) -> Result<(), SearchError>;

    /// Delete one document by id. Deleting a missing document is not an error.
    async fn delete(&self, index: &str, id: &str) -> Result<(), SearchError>;
}

// ============================================================================
// HTTP backend (Elasticsearch-compatible REST API)
// ============================================================================

pub struct HttpSearchBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchBackend {
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| SearchError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn check_status(operation: &str, response: &reqwest::Response) -> Result<(), SearchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(SearchError::Backend(format!(
            "{operation} returned HTTP {status}"
        )))
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn ensure_index(&self, index: &str, mapping: &JsonValue) -> Result<(), SearchError> {
        let url = format!("{}/{index}", self.base_url);
        let exists = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(|e| SearchError::Backend(format!("index existence check failed: {e}")))?;

        let status = exists.status();
        if status.is_success() {
            tracing::debug!(index, "search index already exists");
            return Ok(());
        }
        // Only 404 means the index is missing; anything else is a backend
        // problem and must not be answered with a create attempt.
        if status != reqwest::StatusCode::NOT_FOUND {
            return Err(SearchError::Backend(format!(
                "index existence check returned HTTP {status}"
            )));
        }

        let response = self
            .client
            .put(&url)
            .json(mapping)
            .send()
            .await
            .map_err(|e| SearchError::Backend(format!("index creation failed: {e}")))?;
        Self::check_status("index creation", &response)?;

        tracing::info!(index, "search index created");
        Ok(())
    }

    async fn index(
        &self,
        index: &str,
        id: &str,
        routing: &str,
        body: JsonValue,
    ) -> Result<(), SearchError> {
        let url = format!("{}/{index}/_doc/{id}", self.base_url);
        let response = self
            .client
            .put(&url)
            .query(&[("routing", routing)])
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Backend(format!("index request failed: {e}")))?;
        Self::check_status("index request", &response)
    }

    async fn delete(&self, index: &str, id: &str) -> Result<(), SearchError> {
        let url = format!("{}/{index}/_doc/{id}", self.base_url);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| SearchError::Backend(format!("delete request failed: {e}")))?;

        // 404 on delete means the document is already gone.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status("delete request", &response)
    }
}

// ============================================================================
// In-memory backend (tests, local development)
// ============================================================================

/// One indexed document as the in-memory backend stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub routing: String,
    pub body: JsonValue,
}

/// In-process search backend keyed by document id.
#[derive(Debug, Default)]
pub struct MemorySearchBackend {
    documents: Mutex<HashMap<String, StoredDocument>>,
}

impl MemorySearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, id: &str) -> Option<StoredDocument> {
        self.documents.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All document ids sharing a routing value (one plan's join family).
    pub fn ids_routed_to(&self, routing: &str) -> Vec<String> {
        let documents = self.documents.lock().unwrap();
        let mut ids: Vec<String> = documents
            .iter()
            .filter(|(_, doc)| doc.routing == routing)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl SearchBackend for MemorySearchBackend {
    async fn ensure_index(&self, _index: &str, _mapping: &JsonValue) -> Result<(), SearchError> {
        Ok(())
    }

    async fn index(
        &self,
        _index: &str,
        id: &str,
        routing: &str,
        body: JsonValue,
    ) -> Result<(), SearchError> {
        let mut documents = self.documents.lock().unwrap();
        documents.insert(
            id.to_string(),
            StoredDocument {
                routing: routing.to_string(),
                body,
            },
        );
        Ok(())
    }

    async fn delete(&self, _index: &str, id: &str) -> Result<(), SearchError> {
        let mut documents = self.documents.lock().unwrap();
        documents.remove(id);
        Ok(())
    }
}
