//! Content fingerprint: the concurrency and cache-validation token.
//!
//! A token is the SHA-256 digest of the aggregate's canonical serialization,
//! wrapped in double quotes (ETag form). The typed model fixes field order,
//! so two reads of logically identical content always produce the same token.

use crate::{models::Plan, Result};
use sha2::{Digest, Sha256};

/// Compute the opaque token for an aggregate.
pub fn fingerprint(plan: &Plan) -> Result<String> {
    let bytes = serde_json::to_vec(plan)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("\"{}\"", hex::encode(digest)))
}

/// Whether a caller-supplied token matches the current one.
pub fn token_matches(supplied: Option<&str>, current: &str) -> bool {
    supplied.map(str::trim) == Some(current)
}
