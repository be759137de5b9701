//! Business logic: fingerprinting, merge policy, search projection, event
//! notification, and the orchestrator tying them together.

pub mod fingerprint;
pub mod merge;
pub mod notifier;
pub mod orchestrator;
pub mod projection;

pub use notifier::EventNotifier;
pub use orchestrator::{
    CreateOutcome, DeleteOutcome, PlanOrchestrator, ReadOutcome, UpdateOutcome,
};
pub use projection::SearchProjector;
