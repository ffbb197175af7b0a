//! Core abstractions for the S3200 point engine.
//!
//! This module provides the data model shared by the codec, the engines and
//! the registry: point definitions, point values and error types.

pub mod error;
pub mod point;
pub mod value;

pub use error::{Error, Result, TransportError};
pub use point::*;
pub use value::*;
