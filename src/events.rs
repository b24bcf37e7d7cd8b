use serde::Serialize;
use tokio::sync::broadcast;

use crate::{lighting::LightScene, models::CheckinRecord};

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Change notifications for the presentation layer. Payloads are copies; the
/// engine accessors remain the source of truth.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum DashboardEvent {
    #[serde(rename_all = "camelCase")]
    CheckinArrived {
        record: CheckinRecord,
        total_checkins: u64,
    },
    SceneChanged(LightScene),
    ConnectionChanged(bool),
}

/// Lossy fan-out: publishing with no subscribers is not an error, and a slow
/// subscriber just lags.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: DashboardEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
