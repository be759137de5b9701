//! Typed representation of the Plan aggregate.
//!
//! Struct field order mirrors the original JSON schema declaration. Serializing
//! with `serde_json` therefore produces a canonical, reproducible byte sequence
//! for logically identical content, which is what the concurrency token hashes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// The aggregate root. One `Plan` per `objectId` in the canonical store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "planCostShares")]
    pub plan_cost_shares: CostShares,
    /// Strictly-growing child list; entries are unique by their `objectId`.
    #[serde(rename = "linkedPlanServices")]
    pub linked_plan_services: Vec<LinkedService>,
    #[serde(rename = "_org")]
    pub org: String,
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(rename = "objectType")]
    pub object_type: String,
    #[serde(rename = "planType")]
    pub plan_type: String,
    #[serde(rename = "creationDate")]
    pub creation_date: NaiveDate,
}

/// Cost-share block. Appears directly under the plan and under each linked
/// service (`planserviceCostShares`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShares {
    /// `deductible` and `copay` are kept as raw JSON numbers so that stored
    /// aggregates round-trip byte-identically (no int-to-float rewriting).
    pub deductible: Number,
    #[serde(rename = "_org")]
    pub org: String,
    pub copay: Number,
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(rename = "objectType")]
    pub object_type: String,
}

/// Child of [`Plan`]: one linked service plus its own cost shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedService {
    #[serde(rename = "linkedService")]
    pub linked_service: ServiceRef,
    #[serde(rename = "planserviceCostShares")]
    pub planservice_cost_shares: CostShares,
    #[serde(rename = "_org")]
    pub org: String,
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(rename = "objectType")]
    pub object_type: String,
}

/// Descriptive reference to the service a [`LinkedService`] links to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRef {
    #[serde(rename = "_org")]
    pub org: String,
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(rename = "objectType")]
    pub object_type: String,
    pub name: String,
}
