//! Point registry: latest values plus change fan-out.
//!
//! The engines publish every state transition here; consumers either read
//! the latest value map or subscribe to the update stream.

pub mod memory;
pub mod traits;

pub use memory::MemoryRegistry;
pub use traits::Registry;
