//! Board-agnostic core logic for the badge UI coprocessor
//!
//! This crate holds everything about the coprocessor that does not touch
//! the bus:
//!
//! - Typed channel indices (LEDs, buttons, supply rails)
//! - The device image: per-LED output state, the bling block, supply
//!   readings, the storage scratch block and per-group dirty tracking
//! - The capacitive touch filter with its edge and level acknowledgement
//!   tracks
//! - The navigation history shift register
//! - Driver configuration

#![no_std]
#![deny(unsafe_code)]

pub mod channels;
pub mod config;
pub mod entropy;
pub mod state;
pub mod touch;

pub use channels::{ButtonId, LedIndex, PowerRail, LED_COUNT};
pub use config::{DriverConfig, FilterMode};
pub use state::{BlingBlock, DeviceState, OutputGroup, OutputGroups};
pub use touch::{NavHistory, TouchFilter};
