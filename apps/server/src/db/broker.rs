//! Notification channel boundary.
//!
//! One at-most-once publish attempt per event, no acknowledgment. A real AMQP
//! client plugs in behind [`EventChannel`]; the shipped implementations log
//! events (default) or collect them in memory (tests).

use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("broker publish failed: {0}")]
    Publish(String),
}

#[async_trait]
pub trait EventChannel: Send + Sync {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), BrokerError>;
}

/// Default channel: writes each event to the structured log.
#[derive(Debug, Default)]
pub struct LogEventChannel;

#[async_trait]
impl EventChannel for LogEventChannel {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), BrokerError> {
        tracing::info!(topic, payload = %String::from_utf8_lossy(payload), "plan event");
        Ok(())
    }
}

/// Test channel: collects published messages for assertions. Can be told to
/// fail, to exercise the absorb-and-log path.
#[derive(Debug, Default)]
pub struct MemoryEventChannel {
    messages: Mutex<Vec<(String, Vec<u8>)>>,
    fail: Mutex<bool>,
}

impl MemoryEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, Vec<u8>)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl EventChannel for MemoryEventChannel {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), BrokerError> {
        if *self.fail.lock().unwrap() {
            return Err(BrokerError::Publish("injected failure".to_string()));
        }
        self.messages
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }
}
