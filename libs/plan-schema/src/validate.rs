//! Content validation for Plan aggregates.
//!
//! Structural shape is enforced by deserializing into the typed model; the
//! rules here cover what the type system cannot: empty identifiers, `_org`
//! values that are not hostnames, and duplicate child `objectId`s.

use crate::model::{CostShares, LinkedService, Plan, ServiceRef};
use serde::Serialize;
use std::collections::HashSet;

/// A single validation finding, addressed by a JSON-pointer-like path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The schema predicate consumed by the orchestrator. Injected so tests can
/// substitute a permissive or failing validator.
pub trait PlanValidator: Send + Sync {
    fn validate(&self, plan: &Plan) -> Result<(), Vec<ValidationIssue>>;
}

/// Default validator: the rules in this module, nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl PlanValidator for SchemaValidator {
    fn validate(&self, plan: &Plan) -> Result<(), Vec<ValidationIssue>> {
        validate_plan(plan)
    }
}

/// Validate a full aggregate. Returns every finding, not just the first.
pub fn validate_plan(plan: &Plan) -> Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    check_identity(&plan.object_id, &plan.object_type, &plan.org, "", &mut issues);
    if plan.plan_type.is_empty() {
        issues.push(ValidationIssue::new("/planType", "must not be empty"));
    }
    check_cost_shares(&plan.plan_cost_shares, "/planCostShares", &mut issues);

    let mut seen = HashSet::new();
    for (i, service) in plan.linked_plan_services.iter().enumerate() {
        let path = format!("/linkedPlanServices/{i}");
        validate_linked_service(service, &path, &mut issues);
        if !seen.insert(service.object_id.as_str()) {
            issues.push(ValidationIssue::new(
                format!("{path}/objectId"),
                format!("duplicate linked service objectId '{}'", service.object_id),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate one linked service subtree, prefixing findings with `path`.
pub fn validate_linked_service(
    service: &LinkedService,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    check_identity(
        &service.object_id,
        &service.object_type,
        &service.org,
        path,
        issues,
    );
    check_service_ref(
        &service.linked_service,
        &format!("{path}/linkedService"),
        issues,
    );
    check_cost_shares(
        &service.planservice_cost_shares,
        &format!("{path}/planserviceCostShares"),
        issues,
    );
}

fn check_identity(
    object_id: &str,
    object_type: &str,
    org: &str,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if object_id.is_empty() {
        issues.push(ValidationIssue::new(
            format!("{path}/objectId"),
            "must not be empty",
        ));
    }
    if object_type.is_empty() {
        issues.push(ValidationIssue::new(
            format!("{path}/objectType"),
            "must not be empty",
        ));
    }
    if !is_hostname(org) {
        issues.push(ValidationIssue::new(
            format!("{path}/_org"),
            format!("'{org}' is not a hostname"),
        ));
    }
}

fn check_cost_shares(shares: &CostShares, path: &str, issues: &mut Vec<ValidationIssue>) {
    check_identity(
        &shares.object_id,
        &shares.object_type,
        &shares.org,
        path,
        issues,
    );
}

fn check_service_ref(service: &ServiceRef, path: &str, issues: &mut Vec<ValidationIssue>) {
    check_identity(&service.object_id, &service.object_type, &service.org, path, issues);
    if service.name.is_empty() {
        issues.push(ValidationIssue::new(
            format!("{path}/name"),
            "must not be empty",
        ));
    }
}

/// RFC 1123 hostname shape: dot-separated alphanumeric/hyphen labels of at
/// most 63 characters, no leading or trailing hyphen, 253 characters total.
pub fn is_hostname(value: &str) -> bool {
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    value.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
