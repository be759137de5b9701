//! Plan aggregate data model and schema validation.
//!
//! The crate has two halves:
//!
//! - [`model`] — serde-typed structs for the Plan aggregate. Field names match
//!   the JSON wire contract (`objectId`, `_org`, ...) and field order is fixed,
//!   so serializing a `Plan` always yields the same byte sequence for the same
//!   logical content. Downstream code relies on that for content fingerprints.
//! - [`validate`] — the schema predicate. Deserialization already enforces the
//!   structural shape; the validator adds the content rules the shape cannot
//!   express (non-empty identifiers, hostname-shaped `_org`, unique child ids).

mod model;
mod validate;

pub use model::{CostShares, LinkedService, Plan, ServiceRef};
pub use validate::{
    is_hostname, validate_linked_service, validate_plan, PlanValidator, SchemaValidator,
    ValidationIssue,
};
