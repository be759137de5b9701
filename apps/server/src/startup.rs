//! One-time startup tasks.

use crate::{db::SearchBackend, services::projection, Error, Result};

/// Provision the search index with the join-relation mapping. Idempotent;
/// must complete before the projector handles its first operation.
pub async fn ensure_search_index(backend: &dyn SearchBackend, index: &str) -> Result<()> {
    backend
        .ensure_index(index, &projection::index_mapping())
        .await
        .map_err(|e| Error::Internal(format!("search index provisioning failed: {e}")))
}
