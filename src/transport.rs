//! Bus transport: the Modbus TCP link to the controller.
//!
//! [`TcpLink`] owns one `voltage_modbus` client and connects on demand: the
//! first transaction after construction (or after a bus error) opens the
//! socket. A failed exchange drops the client so the next transaction
//! reconnects transparently.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use voltage_modbus::{ModbusClient, ModbusTcpClient};

use crate::core::error::TransportError;
use crate::core::point::RegisterSpace;

/// The four primitive bus operations the engines need. Implemented by
/// [`TcpLink`] in production and by in-memory fakes in tests.
#[async_trait]
pub trait BusTransport: Send {
    /// FC01 (coils) or FC02 (discrete inputs), by register space.
    async fn read_bits(
        &mut self,
        space: RegisterSpace,
        offset: u16,
        count: u16,
    ) -> Result<Vec<bool>, TransportError>;

    /// FC03 (holding) or FC04 (input registers), by register space.
    async fn read_registers(
        &mut self,
        space: RegisterSpace,
        offset: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError>;

    /// FC06, single holding register.
    async fn write_register(&mut self, offset: u16, value: u16) -> Result<(), TransportError>;

    async fn close(&mut self);
}

/// Modbus TCP link with lazy connect and a fixed unit id.
pub struct TcpLink {
    addr: String,
    unit_id: u8,
    timeout: Duration,
    client: Option<ModbusTcpClient>,
}

impl TcpLink {
    pub fn new(host: &str, port: u16, unit_id: u8, timeout: Duration) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            unit_id,
            timeout,
            client: None,
        }
    }

    async fn ensure_connected(&mut self) -> Result<&mut ModbusTcpClient, TransportError> {
        let connected = matches!(&self.client, Some(client) if client.is_connected());
        if !connected {
            debug!(addr = %self.addr, "connecting");
            let client = ModbusTcpClient::from_address(&self.addr, self.timeout)
                .await
                .map_err(|e| TransportError::Connect {
                    addr: self.addr.clone(),
                    reason: e.to_string(),
                })?;
            self.client = Some(client);
        }
        match self.client.as_mut() {
            Some(client) => Ok(client),
            None => Err(TransportError::Connect {
                addr: self.addr.clone(),
                reason: "no client after connect".to_string(),
            }),
        }
    }

    /// Drop the client so the next transaction reconnects.
    fn reset(&mut self, err: impl ToString) -> TransportError {
        self.client = None;
        TransportError::Bus(err.to_string())
    }
}

#[async_trait]
impl BusTransport for TcpLink {
    async fn read_bits(
        &mut self,
        space: RegisterSpace,
        offset: u16,
        count: u16,
    ) -> Result<Vec<bool>, TransportError> {
        let unit_id = self.unit_id;
        let client = self.ensure_connected().await?;
        let result = match space {
            RegisterSpace::Coil => client.read_01(unit_id, offset, count).await,
            RegisterSpace::DiscreteInput => client.read_02(unit_id, offset, count).await,
            _ => {
                return Err(TransportError::Bus(format!(
                    "register space {space:?} has no bit read"
                )))
            }
        };
        result.map_err(|e| self.reset(e))
    }

    async fn read_registers(
        &mut self,
        space: RegisterSpace,
        offset: u16,
        count: u16,
    ) -> Result<Vec<u16>, TransportError> {
        let unit_id = self.unit_id;
        let client = self.ensure_connected().await?;
        let result = match space {
            RegisterSpace::HoldingRegister => client.read_03(unit_id, offset, count).await,
            RegisterSpace::InputRegister => client.read_04(unit_id, offset, count).await,
            _ => {
                return Err(TransportError::Bus(format!(
                    "register space {space:?} has no register read"
                )))
            }
        };
        result.map_err(|e| self.reset(e))
    }

    async fn write_register(&mut self, offset: u16, value: u16) -> Result<(), TransportError> {
        let unit_id = self.unit_id;
        let client = self.ensure_connected().await?;
        let result = client.write_06(unit_id, offset, value).await;
        result.map_err(|e| self.reset(e))
    }

    async fn close(&mut self) {
        if let Some(mut client) = self.client.take() {
            let _ = client.close().await;
        }
    }
}
