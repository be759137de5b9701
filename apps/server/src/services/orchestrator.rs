//! Plan orchestrator: the per-operation protocol over repository, projector,
//! and notifier.
//!
//! Failure severity is differentiated per step: a primary-store failure
//! aborts before any write, a projection failure is surfaced after the
//! primary store has already committed (no rollback), and notifier failures
//! never reach the caller at all.
//!
//! The precondition check and the subsequent write are not atomic across the
//! key/value boundary: two racing conditional updates can both observe a
//! matching fingerprint, and the second write wins. Closing that window
//! requires a conditional-write primitive in the backend.

use crate::{
    db::PlanRepository,
    models::{EventAction, LinkedService, Plan},
    services::{
        fingerprint::{fingerprint, token_matches},
        merge::merge,
        notifier::EventNotifier,
        projection::SearchProjector,
    },
    Error, Result,
};
use planvault_schema::{validate_linked_service, PlanValidator, ValidationIssue};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub struct PlanOrchestrator {
    repository: PlanRepository,
    projector: SearchProjector,
    notifier: EventNotifier,
    validator: Arc<dyn PlanValidator>,
}

/// Result of a successful create.
#[derive(Debug)]
pub struct CreateOutcome {
    pub token: String,
}

/// Result of a read, with cache-validation support.
#[derive(Debug)]
pub enum ReadOutcome {
    /// Caller's token matches the current content; no body.
    NotModified { token: String },
    Found { plan: Plan, token: String },
}

/// Result of a conditional update.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Every incoming entry was already present. Nothing was stored or
    /// projected; the token is unchanged.
    NoOp { token: String },
    Updated { plan: Plan, token: String },
}

/// Result of a conditional delete. The primary deletion is final either way.
#[derive(Debug)]
pub struct DeleteOutcome {
    /// False when the search-index cleanup failed and orphaned documents
    /// remain as eventual-consistency debt.
    pub projection_cleaned: bool,
}

impl PlanOrchestrator {
    pub fn new(
        repository: PlanRepository,
        projector: SearchProjector,
        notifier: EventNotifier,
        validator: Arc<dyn PlanValidator>,
    ) -> Self {
        Self {
            repository,
            projector,
            notifier,
            validator,
        }
    }

    /// Create a new plan under its caller-assigned `objectId`.
    pub async fn create(&self, plan: Plan) -> Result<CreateOutcome> {
        self.validator
            .validate(&plan)
            .map_err(Error::Validation)?;

        if self.repository.get(&plan.object_id).await?.is_some() {
            return Err(Error::Conflict(plan.object_id));
        }

        self.repository.put(&plan).await?;
        let token = fingerprint(&plan)?;

        // Primary write is durable at this point; a projection failure is
        // surfaced without rolling it back.
        self.projector.index_plan(&plan).await?;

        self.notifier.notify(EventAction::Create, &plan.object_id);
        Ok(CreateOutcome { token })
    }

    /// Read a plan, honoring a caller-supplied cache-validation token.
    pub async fn read(&self, id: &str, cache_token: Option<&str>) -> Result<ReadOutcome> {
        let plan = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let token = fingerprint(&plan)?;
        if token_matches(cache_token, &token) {
            return Ok(ReadOutcome::NotModified { token });
        }

        self.notifier.notify(EventAction::Access, id);
        Ok(ReadOutcome::Found { plan, token })
    }

    /// Merge new linked services into an existing plan, guarded by the
    /// caller's concurrency token.
    ///
    /// `body` is the raw update document; its shape is only checked after
    /// the existence and precondition steps, so a malformed body against a
    /// missing plan is still NotFound and one without a token is still
    /// PreconditionRequired.
    pub async fn update(
        &self,
        id: &str,
        supplied_token: Option<&str>,
        body: JsonValue,
    ) -> Result<UpdateOutcome> {
        let existing = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let current_token = fingerprint(&existing)?;
        if supplied_token.is_none() {
            return Err(Error::PreconditionRequired);
        }
        if !token_matches(supplied_token, &current_token) {
            return Err(Error::PreconditionFailed { current_token });
        }

        let incoming = linked_services_from_body(body)?;
        let mut issues = Vec::new();
        for (i, service) in incoming.iter().enumerate() {
            validate_linked_service(service, &format!("/linkedPlanServices/{i}"), &mut issues);
        }
        if !issues.is_empty() {
            return Err(Error::Validation(issues));
        }

        let outcome = merge(&existing, incoming);
        if outcome.added == 0 {
            return Ok(UpdateOutcome::NoOp {
                token: current_token,
            });
        }

        let merged = outcome.merged;
        self.validator
            .validate(&merged)
            .map_err(Error::Validation)?;

        self.repository.put(&merged).await?;
        let token = fingerprint(&merged)?;

        self.projector.reindex_plan(&merged).await?;

        self.notifier.notify(EventAction::Update, id);
        Ok(UpdateOutcome::Updated {
            plan: merged,
            token,
        })
    }

    /// Delete a plan, guarded by the caller's concurrency token.
    pub async fn delete(&self, id: &str, supplied_token: Option<&str>) -> Result<DeleteOutcome> {
        let plan = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let current_token = fingerprint(&plan)?;
        if !token_matches(supplied_token, &current_token) {
            return Err(Error::PreconditionFailed { current_token });
        }

        self.repository.delete(id).await?;

        let projection_cleaned = match self.projector.delete_plan(id).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(plan_id = id, "search index cleanup failed: {err}");
                false
            }
        };

        self.notifier.notify(EventAction::Delete, id);
        Ok(DeleteOutcome { projection_cleaned })
    }
}

/// Extract the incoming linked services from an update document, reporting
/// shape problems as validation issues instead of bare deserializer messages.
fn linked_services_from_body(body: JsonValue) -> Result<Vec<LinkedService>> {
    let Some(entries) = body.get("linkedPlanServices") else {
        return Err(Error::Validation(vec![ValidationIssue {
            path: "/linkedPlanServices".to_string(),
            message: "field is required".to_string(),
        }]));
    };
    let Some(entries) = entries.as_array() else {
        return Err(Error::Validation(vec![ValidationIssue {
            path: "/linkedPlanServices".to_string(),
            message: "must be an array".to_string(),
        }]));
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::from_value(entry.clone()).map_err(|e| {
                Error::Validation(vec![ValidationIssue {
                    path: format!("/linkedPlanServices/{i}"),
                    message: e.to_string(),
                }])
            })
        })
        .collect()
}
