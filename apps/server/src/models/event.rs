//! Lifecycle event model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What happened to a plan. Serialized lowercase in the event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Create,
    Update,
    Access,
    Delete,
}

impl EventAction {
    /// Per-action topic the event is published to.
    pub fn topic(self) -> &'static str {
        match self {
            EventAction::Create => "plan.created",
            EventAction::Update => "plan.updated",
            EventAction::Access => "plan.accessed",
            EventAction::Delete => "plan.deleted",
        }
    }
}

/// Message published to the notification channel on every lifecycle change.
#[derive(Debug, Clone, Serialize)]
pub struct PlanEvent {
    pub action: EventAction,
    #[serde(rename = "planId")]
    pub plan_id: String,
    pub timestamp: DateTime<Utc>,
}

impl PlanEvent {
    pub fn now(action: EventAction, plan_id: impl Into<String>) -> Self {
        Self {
            action,
            plan_id: plan_id.into(),
            timestamp: Utc::now(),
        }
    }
}
