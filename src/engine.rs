//! Poll and write engines.
//!
//! Both engines share a [`PointTable`] of per-point state, one [`Session`]
//! and one [`Registry`]. The poll engine issues one bus transaction per
//! active point per tick and keeps going on errors; the write engine
//! performs single FC06 writes with clamping and quantization handled by
//! the codec. Every state transition is published to the registry,
//! transitions to unknown included.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::catalog;
use crate::codec::{self, Decoded, RawValue};
use crate::core::error::{Error, Result};
use crate::core::point::{Group, PointDefinition};
use crate::core::value::{FaultKind, PointUpdate, PointValue};
use crate::registry::Registry;
use crate::session::Session;

/// Per-point runtime state.
#[derive(Debug, Clone)]
pub struct PointState {
    pub def: &'static PointDefinition,
    /// Last decoded value; `None` after an error or an unknown reading.
    pub value: Option<PointValue>,
    pub fault: Option<FaultKind>,
    last_write: Option<Instant>,
}

impl PointState {
    fn new(def: &'static PointDefinition) -> Self {
        Self {
            def,
            value: None,
            fault: None,
            last_write: None,
        }
    }
}

/// State table for the active points of one controller.
pub struct PointTable {
    // Table order drives the poll order; the map serves lookups.
    points: Vec<&'static PointDefinition>,
    states: DashMap<&'static str, PointState>,
}

impl PointTable {
    pub fn new(points: Vec<&'static PointDefinition>) -> Self {
        let states = points
            .iter()
            .map(|def| (def.id, PointState::new(def)))
            .collect();
        Self { points, states }
    }

    /// Table for the given enabled groups, in catalog order.
    pub fn for_groups(groups: &[Group]) -> Self {
        Self::new(catalog::active_points(groups))
    }

    pub fn points(&self) -> &[&'static PointDefinition] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn definition(&self, point_id: &str) -> Option<&'static PointDefinition> {
        self.states.get(point_id).map(|state| state.def)
    }

    /// Snapshot of a point's state.
    pub fn state(&self, point_id: &str) -> Option<PointState> {
        self.states.get(point_id).map(|state| state.value().clone())
    }

    fn record_value(&self, point_id: &str, value: Option<PointValue>) {
        if let Some(mut state) = self.states.get_mut(point_id) {
            state.value = value;
            state.fault = None;
        }
    }

    fn record_fault(&self, point_id: &str, fault: FaultKind) {
        if let Some(mut state) = self.states.get_mut(point_id) {
            state.value = None;
            state.fault = Some(fault);
        }
    }

    fn record_write(&self, point_id: &str, value: PointValue) {
        if let Some(mut state) = self.states.get_mut(point_id) {
            state.value = Some(value);
            state.fault = None;
            state.last_write = Some(Instant::now());
        }
    }

    fn elapsed_since_write(&self, point_id: &str) -> Option<Duration> {
        self.states
            .get(point_id)
            .and_then(|state| state.last_write)
            .map(|at| at.elapsed())
    }
}

/// Result of one poll pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Points attempted.
    pub polled: usize,
    /// Points that ended the tick with a fault.
    pub failed: usize,
}

/// Polls every active point once per call.
pub struct PollEngine {
    session: Arc<Session>,
    table: Arc<PointTable>,
    registry: Arc<dyn Registry>,
}

impl PollEngine {
    pub fn new(session: Arc<Session>, table: Arc<PointTable>, registry: Arc<dyn Registry>) -> Self {
        Self {
            session,
            table,
            registry,
        }
    }

    /// One tick: one transaction per active point, in table order.
    /// Per-point errors are recorded and published; the pass never aborts.
    pub async fn poll_once(&self) -> PollSummary {
        let mut summary = PollSummary::default();
        for def in self.table.points() {
            let update = self.poll_point(def).await;
            summary.polled += 1;
            if update.is_fault() {
                summary.failed += 1;
            }
            self.registry.publish(update).await;
        }
        debug!(polled = summary.polled, failed = summary.failed, "poll pass done");
        summary
    }

    async fn poll_point(&self, def: &'static PointDefinition) -> PointUpdate {
        let offset = def.wire_offset();
        let raw = if def.space.is_bit() {
            self.session
                .read_bit(def.space, offset)
                .await
                .map(RawValue::Bit)
        } else {
            self.session
                .read_register(def.space, offset)
                .await
                .map(RawValue::Register)
        };

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                warn!(point = def.id, offset, error = %e, "poll failed");
                self.table.record_fault(def.id, FaultKind::Transport);
                return PointUpdate::faulted(def.id, FaultKind::Transport);
            }
        };

        match codec::decode_value(&def.kind, raw) {
            Ok(Decoded::Value(value)) => {
                self.table.record_value(def.id, Some(value.clone()));
                PointUpdate::value(def.id, value)
            }
            Ok(Decoded::Unknown) => {
                self.table.record_value(def.id, None);
                PointUpdate::unknown(def.id)
            }
            Err(e) => {
                warn!(point = def.id, offset, error = %e, "decode failed");
                self.table.record_fault(def.id, FaultKind::Decode);
                PointUpdate::faulted(def.id, FaultKind::Decode)
            }
        }
    }
}

/// Advisory attached to a write that went through anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAdvisory {
    /// The point's minimum rewrite interval had not elapsed yet.
    RewriteTooSoon {
        elapsed: Duration,
        min_interval: Duration,
    },
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// Raw register value written on the wire.
    pub raw: u16,
    /// Value the register holds after clamping and quantization.
    pub applied: PointValue,
    pub advisory: Option<WriteAdvisory>,
}

/// Writes single holding registers.
pub struct WriteEngine {
    session: Arc<Session>,
    table: Arc<PointTable>,
    registry: Arc<dyn Registry>,
}

impl WriteEngine {
    pub fn new(session: Arc<Session>, table: Arc<PointTable>, registry: Arc<dyn Registry>) -> Self {
        Self {
            session,
            table,
            registry,
        }
    }

    /// Write a value to a point. The value is clamped and quantized to
    /// what the register can hold; the outcome reports the applied value.
    /// Writing again before the point's minimum rewrite interval has
    /// elapsed yields an advisory but is not blocked.
    pub async fn set_value(&self, point_id: &str, value: PointValue) -> Result<WriteOutcome> {
        let def = self
            .table
            .definition(point_id)
            .ok_or_else(|| Error::UnknownPoint(point_id.to_string()))?;

        if !def.writable || !def.space.accepts_writes() {
            return Err(Error::NotWritable(point_id.to_string()));
        }

        let encoded = codec::encode_value(&def.kind, &value).map_err(|e| Error::Encode {
            point: point_id.to_string(),
            reason: e.to_string(),
        })?;

        let advisory = self.rewrite_advisory(def);

        self.session
            .write_register(def.wire_offset(), encoded.raw)
            .await?;

        self.table.record_write(def.id, encoded.applied.clone());
        self.registry
            .publish(PointUpdate::value(def.id, encoded.applied.clone()))
            .await;

        Ok(WriteOutcome {
            raw: encoded.raw,
            applied: encoded.applied,
            advisory,
        })
    }

    fn rewrite_advisory(&self, def: &'static PointDefinition) -> Option<WriteAdvisory> {
        let min_interval = Duration::from_secs(def.min_rewrite_secs?);
        let elapsed = self.table.elapsed_since_write(def.id)?;
        if elapsed < min_interval {
            warn!(
                point = def.id,
                elapsed_ms = elapsed.as_millis() as u64,
                min_ms = min_interval.as_millis() as u64,
                "rewrite interval not elapsed, writing anyway"
            );
            Some(WriteAdvisory::RewriteTooSoon {
                elapsed,
                min_interval,
            })
        } else {
            None
        }
    }
}
