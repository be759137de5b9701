//! Best-effort lifecycle event notifier.
//!
//! Events go into a bounded in-process queue drained by a background
//! dispatcher task that publishes to the injected channel. The request path
//! never awaits delivery: enqueueing is `try_send`, a full queue drops the
//! event with a warning, and publish failures are logged and absorbed.

use crate::{
    db::EventChannel,
    models::{EventAction, PlanEvent},
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct EventNotifier {
    tx: mpsc::Sender<PlanEvent>,
}

impl EventNotifier {
    /// Create the notifier and spawn its dispatcher task.
    pub fn spawn(channel: Arc<dyn EventChannel>, queue_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(queue_capacity);
        tokio::spawn(dispatch(channel, rx));
        Self { tx }
    }

    /// Hand off one event. Never blocks, never fails the caller.
    pub fn notify(&self, action: EventAction, plan_id: &str) {
        let event = PlanEvent::now(action, plan_id);
        if let Err(err) = self.tx.try_send(event) {
            tracing::warn!(?action, plan_id, "event queue full, dropping event: {err}");
        }
    }
}

async fn dispatch(channel: Arc<dyn EventChannel>, mut rx: mpsc::Receiver<PlanEvent>) {
    while let Some(event) = rx.recv().await {
        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(action = ?event.action, "failed to encode event: {err}");
                continue;
            }
        };

        if let Err(err) = channel.publish(event.action.topic(), &payload).await {
            tracing::warn!(
                action = ?event.action,
                plan_id = %event.plan_id,
                "failed to publish event: {err}"
            );
        }
    }
}
