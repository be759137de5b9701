//! Domain models.
//!
//! The Plan aggregate itself lives in `planvault-schema`; this module
//! re-exports it and adds the server-side event model.

mod event;

pub use event::{EventAction, PlanEvent};
pub use planvault_schema::{CostShares, LinkedService, Plan, ServiceRef};
