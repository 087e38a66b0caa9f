//! Device image
//!
//! The host keeps the authoritative copy of every coprocessor output and
//! the latest copy of every input. Setters only touch memory; the driver
//! flushes dirty groups on its next transaction.

pub mod bling;
pub mod device;
pub mod groups;

pub use bling::BlingBlock;
pub use device::DeviceState;
pub use groups::{OutputGroup, OutputGroups};
