//! Exclusive-access session over one bus transport.
//!
//! The controller serves one request at a time; interleaved transactions
//! from several tasks corrupt the exchange. `Session` wraps the transport
//! in a `tokio::sync::Mutex` that is held for the whole transaction,
//! reconnect included, so at most one exchange is ever in flight.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::error::TransportError;
use crate::core::point::RegisterSpace;
use crate::transport::{BusTransport, TcpLink};

fn default_port() -> u16 {
    502
}

fn default_unit_id() -> u8 {
    2
}

fn default_timeout_ms() -> u64 {
    3000
}

/// Connection parameters for one controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Modbus unit id; the S3200 answers on unit 2.
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            unit_id: default_unit_id(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// One controller connection with serialized access.
pub struct Session {
    transport: Mutex<Box<dyn BusTransport>>,
}

impl Session {
    /// Open a session for the given controller. No I/O happens here; the
    /// socket is opened inside the first transaction.
    pub fn open(config: &SessionConfig) -> Self {
        Self::with_transport(Box::new(TcpLink::new(
            &config.host,
            config.port,
            config.unit_id,
            config.timeout(),
        )))
    }

    /// Build a session over an arbitrary transport. Test seam.
    pub fn with_transport(transport: Box<dyn BusTransport>) -> Self {
        Self {
            transport: Mutex::new(transport),
        }
    }

    /// Read a single bit (FC01/FC02).
    pub async fn read_bit(
        &self,
        space: RegisterSpace,
        offset: u16,
    ) -> Result<bool, TransportError> {
        let mut transport = self.transport.lock().await;
        let bits = transport.read_bits(space, offset, 1).await?;
        bits.first()
            .copied()
            .ok_or_else(|| TransportError::Bus("empty bit response".to_string()))
    }

    /// Read a single register (FC03/FC04).
    pub async fn read_register(
        &self,
        space: RegisterSpace,
        offset: u16,
    ) -> Result<u16, TransportError> {
        let mut transport = self.transport.lock().await;
        let registers = transport.read_registers(space, offset, 1).await?;
        registers
            .first()
            .copied()
            .ok_or_else(|| TransportError::Bus("empty register response".to_string()))
    }

    /// Write a single holding register (FC06).
    pub async fn write_register(&self, offset: u16, value: u16) -> Result<(), TransportError> {
        let mut transport = self.transport.lock().await;
        transport.write_register(offset, value).await
    }

    pub async fn close(&self) {
        let mut transport = self.transport.lock().await;
        transport.close().await;
    }
}
