//! Search projection: denormalized parent/child documents for one plan.
//!
//! Every plan expands into a join family sharing the plan's `objectId` as the
//! routing value:
//!
//! ```text
//! plan (parent, cost shares embedded)
//! └── linkedPlanServices (one child per service, parent = plan objectId)
//!     ├── linkedService          (grandchild, parent = service objectId)
//!     └── planserviceCostShares  (grandchild, parent = service objectId)
//! ```
//!
//! Document ids are the node `objectId`s, so re-projection overwrites in
//! place and never duplicates already-indexed nodes.

use crate::{
    db::{SearchBackend, SearchError},
    models::{LinkedService, Plan},
    Error, Result,
};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

/// Name of the join-relation field in every projected document.
pub const JOIN_FIELD: &str = "plan_join";

pub struct SearchProjector {
    backend: Arc<dyn SearchBackend>,
    index: String,
}

impl SearchProjector {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
        }
    }

    /// Project a newly created plan into the index.
    pub async fn index_plan(&self, plan: &Plan) -> Result<()> {
        self.write_family(plan).await
    }

    /// Re-project an updated plan. Same writes as [`Self::index_plan`]:
    /// overwrite-by-id for the parent, overwrite/append for children.
    pub async fn reindex_plan(&self, plan: &Plan) -> Result<()> {
        self.write_family(plan).await
    }

    /// Remove the parent document. Children sharing the routing value are
    /// left behind as eventual-consistency debt; without the aggregate body
    /// their ids are unknown here.
    pub async fn delete_plan(&self, id: &str) -> Result<()> {
        self.backend
            .delete(&self.index, id)
            .await
            .map_err(projection_failed)
    }

    async fn write_family(&self, plan: &Plan) -> Result<()> {
        // Children are written sequentially and awaited; a failure anywhere
        // surfaces as ProjectionFailed for the whole operation.
        self.backend
            .index(
                &self.index,
                &plan.object_id,
                &plan.object_id,
                parent_document(plan)?,
            )
            .await
            .map_err(projection_failed)?;

        for service in &plan.linked_plan_services {
            self.backend
                .index(
                    &self.index,
                    &service.object_id,
                    &plan.object_id,
                    service_document(service, &plan.object_id)?,
                )
                .await
                .map_err(projection_failed)?;

            self.backend
                .index(
                    &self.index,
                    &service.linked_service.object_id,
                    &plan.object_id,
                    grandchild_document(
                        serde_json::to_value(&service.linked_service)?,
                        "linkedService",
                        &service.object_id,
                    )?,
                )
                .await
                .map_err(projection_failed)?;

            self.backend
                .index(
                    &self.index,
                    &service.planservice_cost_shares.object_id,
                    &plan.object_id,
                    grandchild_document(
                        serde_json::to_value(&service.planservice_cost_shares)?,
                        "planserviceCostShares",
                        &service.object_id,
                    )?,
                )
                .await
                .map_err(projection_failed)?;
        }

        Ok(())
    }
}

fn projection_failed(err: SearchError) -> Error {
    Error::ProjectionFailed(err.to_string())
}

/// Parent document: the plan's top-level fields with cost shares embedded and
/// the child list stripped (children become their own documents).
fn parent_document(plan: &Plan) -> Result<JsonValue> {
    let mut body = serde_json::to_value(plan)?;
    let object = body
        .as_object_mut()
        .ok_or_else(|| Error::Internal("plan did not serialize to an object".to_string()))?;
    object.remove("linkedPlanServices");
    object.insert(JOIN_FIELD.to_string(), json!("plan"));
    Ok(body)
}

/// Child document: the service's own identity fields, joined to the plan.
fn service_document(service: &LinkedService, plan_id: &str) -> Result<JsonValue> {
    let mut body = serde_json::to_value(service)?;
    let object = body
        .as_object_mut()
        .ok_or_else(|| Error::Internal("service did not serialize to an object".to_string()))?;
    object.remove("linkedService");
    object.remove("planserviceCostShares");
    object.insert(
        JOIN_FIELD.to_string(),
        json!({ "name": "linkedPlanServices", "parent": plan_id }),
    );
    Ok(body)
}

/// Grandchild document: joined to its *service*, not the plan (the routing
/// value still co-locates it with the rest of the family).
fn grandchild_document(mut body: JsonValue, relation: &str, service_id: &str) -> Result<JsonValue> {
    let object = body
        .as_object_mut()
        .ok_or_else(|| Error::Internal("node did not serialize to an object".to_string()))?;
    object.insert(
        JOIN_FIELD.to_string(),
        json!({ "name": relation, "parent": service_id }),
    );
    Ok(body)
}

/// Index mapping the search backend must be provisioned with before first
/// use. Property mappings plus the parent/child join relation.
pub fn index_mapping() -> JsonValue {
    json!({
        "settings": { "number_of_shards": 1, "number_of_replicas": 0 },
        "mappings": {
            "properties": {
                "_org": { "type": "keyword" },
                "objectId": { "type": "keyword" },
                "objectType": { "type": "keyword" },
                "planType": { "type": "keyword" },
                "creationDate": { "type": "date", "format": "yyyy-MM-dd" },
                "name": { "type": "text" },
                "deductible": { "type": "long" },
                "copay": { "type": "long" },
                "planCostShares": {
                    "properties": {
                        "deductible": { "type": "long" },
                        "copay": { "type": "long" },
                        "objectId": { "type": "keyword" },
                        "objectType": { "type": "keyword" },
                        "_org": { "type": "keyword" }
                    }
                },
                JOIN_FIELD: {
                    "type": "join",
                    "relations": {
                        "plan": "linkedPlanServices",
                        "linkedPlanServices": ["linkedService", "planserviceCostShares"]
                    }
                }
            }
        }
    })
}
