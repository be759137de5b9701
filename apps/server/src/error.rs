//! Application error taxonomy.
//!
//! Every failure a caller can observe maps to exactly one variant, so the API
//! layer can translate each into a stable response category. Notifier failures
//! deliberately have no variant here: they are absorbed and logged at the
//! source, never surfaced.

use planvault_schema::ValidationIssue;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The aggregate (or a partial update) failed schema validation.
    #[error("schema validation failed ({} issue(s))", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// Create with an `objectId` that is already stored.
    #[error("a plan with objectId '{0}' already exists")]
    Conflict(String),

    #[error("no plan found for id '{0}'")]
    NotFound(String),

    /// Conditional update issued without a concurrency token.
    #[error("precondition required: no concurrency token supplied")]
    PreconditionRequired,

    /// Supplied token does not match the stored content. Carries the current
    /// token so the caller can refresh and retry.
    #[error("precondition failed: token does not match current content")]
    PreconditionFailed { current_token: String },

    /// Secondary-index write failed after the primary store committed. The
    /// primary write is not rolled back.
    #[error("search projection failed: {0}")]
    ProjectionFailed(String),

    /// Primary key/value backend unreachable. Aborts before any state change;
    /// retryable.
    #[error("primary store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(format!("serialization failed: {err}"))
    }
}
