//! In-memory registry backed by DashMap.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::core::value::PointUpdate;

use super::traits::Registry;

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// In-memory registry: latest update per point plus a broadcast stream of
/// all updates. Lagging subscribers lose old updates, never new ones.
pub struct MemoryRegistry {
    latest: DashMap<String, PointUpdate>,
    events: broadcast::Sender<PointUpdate>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            latest: DashMap::new(),
            events,
        }
    }

    /// Subscribe to the update stream.
    pub fn subscribe(&self) -> broadcast::Receiver<PointUpdate> {
        self.events.subscribe()
    }

    /// Snapshot of the latest update of every point seen so far.
    pub fn snapshot(&self) -> Vec<PointUpdate> {
        self.latest.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn publish(&self, update: PointUpdate) {
        self.latest
            .insert(update.point_id.clone(), update.clone());
        // Best-effort fan-out; no receivers is fine.
        let _ = self.events.send(update);
    }

    fn latest(&self, point_id: &str) -> Option<PointUpdate> {
        self.latest.get(point_id).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::{FaultKind, PointValue};

    #[tokio::test]
    async fn test_publish_and_latest() {
        let registry = MemoryRegistry::new();
        registry
            .publish(PointUpdate::value("boiler_temperature", PointValue::Number(71.5)))
            .await;

        let latest = registry.latest("boiler_temperature").unwrap();
        assert_eq!(latest.value, Some(PointValue::Number(71.5)));
        assert!(registry.latest("missing").is_none());
    }

    #[tokio::test]
    async fn test_latest_tracks_fault_transitions() {
        let registry = MemoryRegistry::new();
        registry
            .publish(PointUpdate::value("boiler_setpoint", PointValue::Number(80.0)))
            .await;
        registry
            .publish(PointUpdate::faulted("boiler_setpoint", FaultKind::Transport))
            .await;

        let latest = registry.latest("boiler_setpoint").unwrap();
        assert!(latest.value.is_none());
        assert_eq!(latest.fault, Some(FaultKind::Transport));
    }

    #[tokio::test]
    async fn test_subscription_receives_updates() {
        let registry = MemoryRegistry::new();
        let mut rx = registry.subscribe();

        registry
            .publish(PointUpdate::unknown("dhw_setpoint"))
            .await;

        let update = rx.recv().await.unwrap();
        assert_eq!(update.point_id, "dhw_setpoint");
        assert!(update.value.is_none());
        assert!(!update.is_fault());
    }
}
