//! Canonical aggregate storage.
//!
//! `PlanRepository` owns the one-aggregate-per-id mapping over an injected
//! key/value backend. It performs no validation and no concurrency checking;
//! that policy lives in the orchestrator.

use crate::{
    db::{KeyValueStore, KvError},
    models::Plan,
    Error, Result,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PlanRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl PlanRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Fetch the aggregate stored under `id`, if any.
    pub async fn get(&self, id: &str) -> Result<Option<Plan>> {
        let Some(bytes) = self.kv.get(id).await.map_err(store_unavailable)? else {
            return Ok(None);
        };

        let plan = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Internal(format!("stored aggregate for '{id}' failed to decode: {e}"))
        })?;
        Ok(Some(plan))
    }

    /// Unconditional overwrite. Callers verify uniqueness or concurrency
    /// preconditions first.
    pub async fn put(&self, plan: &Plan) -> Result<()> {
        let bytes = serde_json::to_vec(plan)?;
        self.kv
            .set(&plan.object_id, bytes)
            .await
            .map_err(store_unavailable)
    }

    /// Unconditional removal.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.kv.delete(id).await.map_err(store_unavailable)
    }
}

fn store_unavailable(err: KvError) -> Error {
    match err {
        KvError::Unavailable(message) => Error::StoreUnavailable(message),
    }
}
