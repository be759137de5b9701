//! Storage boundaries: injected backends and the plan repository.

pub mod broker;
pub mod kv;
pub mod search;
pub mod store;

pub use broker::{BrokerError, EventChannel, LogEventChannel, MemoryEventChannel};
pub use kv::{KeyValueStore, KvError, MemoryKeyValueStore};
pub use search::{HttpSearchBackend, MemorySearchBackend, SearchBackend, SearchError};
pub use store::PlanRepository;
