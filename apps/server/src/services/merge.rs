//! Additive merge of linked services into an existing aggregate.

use crate::models::{LinkedService, Plan};
use std::collections::HashSet;

/// Result of applying a partial update to an existing plan.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub merged: Plan,
    /// How many incoming entries were actually appended. Zero means the
    /// caller must treat the update as a no-op.
    pub added: usize,
}

/// Append the incoming linked services whose `objectId` is not already
/// present, preserving existing entries and the incoming relative order.
/// Duplicates within `incoming` itself are also collapsed (first wins), so
/// the merged plan never carries two children with the same id.
pub fn merge(existing: &Plan, incoming: Vec<LinkedService>) -> MergeOutcome {
    let mut seen: HashSet<String> = existing
        .linked_plan_services
        .iter()
        .map(|service| service.object_id.clone())
        .collect();

    let mut merged = existing.clone();
    let mut added = 0;
    for service in incoming {
        if seen.insert(service.object_id.clone()) {
            merged.linked_plan_services.push(service);
            added += 1;
        }
    }

    MergeOutcome { merged, added }
}
