//! # Fröling S3200 Modbus Library
//!
//! Register-level access to Fröling Lambdatronic S3200 / SP-Dual heating
//! controllers over Modbus TCP.
//!
//! The controller exposes its state as 16-bit registers and single bits
//! with fixed-point scaling, sparse enumerations and a handful of packed
//! time formats. This crate maps those registers to typed points and runs
//! a polling and write engine over them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use froeling_s3200::prelude::*;
//!
//! let config = ControllerConfig::new("192.168.1.40");
//! let channel = S3200Channel::new(config)?;
//!
//! // Poll every active point once.
//! let summary = channel.poll_once().await;
//!
//! // Adjust the boiler setpoint; the applied value reflects clamping.
//! let outcome = channel
//!     .set_value("boiler_setpoint", PointValue::Number(80.0))
//!     .await?;
//! ```
//!
//! ## Layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Static register catalog of the controller |
//! | [`codec`] | Raw register/bit to typed value conversions |
//! | [`transport`] / [`session`] | Modbus TCP link with serialized access |
//! | [`engine`] | Poll and write engines |
//! | [`registry`] | Latest-value store and update stream |
//! | [`channel`] | Configured controller facade |

pub mod catalog;
pub mod channel;
pub mod codec;
pub mod config;
pub mod core;
pub mod engine;
pub mod registry;
pub mod session;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::catalog;
    pub use crate::channel::{ChannelDiagnostics, S3200Channel};
    pub use crate::config::{ControllerConfig, GroupToggles};
    pub use crate::core::error::{Error, Result, TransportError};
    pub use crate::core::point::{Group, PointDefinition, RegisterSpace, ValueKind};
    pub use crate::core::value::{FaultKind, PointUpdate, PointValue};
    pub use crate::engine::{PollSummary, WriteAdvisory, WriteOutcome};
    pub use crate::registry::{MemoryRegistry, Registry};
    pub use crate::session::{Session, SessionConfig};
}

// Re-export core types at crate root for convenience
pub use crate::channel::S3200Channel;
pub use crate::config::ControllerConfig;
pub use crate::core::error::{Error, Result, TransportError};
pub use crate::core::point::{Group, PointDefinition, RegisterSpace, ValueKind};
pub use crate::core::value::{FaultKind, PointUpdate, PointValue};
pub use crate::registry::{MemoryRegistry, Registry};
