//! Controller channel: configuration to running engines in one object.
//!
//! `S3200Channel` wires a [`Session`], a [`PointTable`] for the enabled
//! groups, both engines and an in-memory registry together, and keeps
//! simple diagnostics counters over their activity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::ControllerConfig;
use crate::core::error::{Error, Result};
use crate::core::value::PointValue;
use crate::engine::{PointTable, PollEngine, PollSummary, WriteEngine, WriteOutcome};
use crate::registry::MemoryRegistry;
use crate::session::Session;

/// Snapshot of channel activity counters.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelDiagnostics {
    pub polls: u64,
    pub reads: u64,
    pub writes: u64,
    pub errors: u64,
    /// Active points in the channel's table.
    pub points: usize,
    /// Free-form extras (host, enabled groups).
    pub extra: serde_json::Value,
}

#[derive(Default)]
struct Counters {
    polls: AtomicU64,
    reads: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
}

/// One configured controller: session, engines, registry.
pub struct S3200Channel {
    config: ControllerConfig,
    table: Arc<PointTable>,
    registry: Arc<MemoryRegistry>,
    poll_engine: PollEngine,
    write_engine: WriteEngine,
    counters: Counters,
}

impl S3200Channel {
    pub fn new(config: ControllerConfig) -> Result<Self> {
        if config.session.host.is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }

        let groups = config.enabled_groups();
        let table = Arc::new(PointTable::for_groups(&groups));
        if table.is_empty() {
            return Err(Error::Config("no groups enabled".to_string()));
        }

        let session = Arc::new(Session::open(&config.session));
        let registry = Arc::new(MemoryRegistry::new());

        info!(
            host = %config.session.host,
            unit_id = config.session.unit_id,
            points = table.len(),
            "channel ready"
        );

        Ok(Self {
            poll_engine: PollEngine::new(session.clone(), table.clone(), registry.clone()),
            write_engine: WriteEngine::new(session, table.clone(), registry.clone()),
            config,
            table,
            registry,
            counters: Counters::default(),
        })
    }

    /// One poll pass over every active point.
    pub async fn poll_once(&self) -> PollSummary {
        let summary = self.poll_engine.poll_once().await;
        self.counters.polls.fetch_add(1, Ordering::Relaxed);
        self.counters
            .reads
            .fetch_add(summary.polled as u64, Ordering::Relaxed);
        self.counters
            .errors
            .fetch_add(summary.failed as u64, Ordering::Relaxed);
        summary
    }

    /// Write a value to a writable point.
    pub async fn set_value(&self, point_id: &str, value: PointValue) -> Result<WriteOutcome> {
        let outcome = self.write_engine.set_value(point_id, value).await;
        match &outcome {
            Ok(_) => {
                self.counters.writes.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
        outcome
    }

    pub fn registry(&self) -> &Arc<MemoryRegistry> {
        &self.registry
    }

    pub fn table(&self) -> &Arc<PointTable> {
        &self.table
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> ChannelDiagnostics {
        let groups: Vec<&str> = self
            .config
            .enabled_groups()
            .into_iter()
            .map(|group| group.key())
            .collect();
        ChannelDiagnostics {
            polls: self.counters.polls.load(Ordering::Relaxed),
            reads: self.counters.reads.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
            points: self.table.len(),
            extra: serde_json::json!({
                "host": self.config.session.host,
                "groups": groups,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupToggles;

    #[test]
    fn test_rejects_empty_host() {
        let config = ControllerConfig::new("");
        assert!(matches!(S3200Channel::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_no_groups() {
        let mut config = ControllerConfig::new("192.168.1.40");
        config.groups = GroupToggles::none();
        assert!(matches!(S3200Channel::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_diagnostics_shape() {
        let config = ControllerConfig::new("192.168.1.40");
        let channel = S3200Channel::new(config).unwrap();
        let diag = channel.diagnostics();
        assert_eq!(diag.polls, 0);
        assert_eq!(diag.points, channel.table().len());
        assert_eq!(diag.extra["host"], "192.168.1.40");
    }
}
