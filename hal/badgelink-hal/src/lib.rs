//! Badgelink Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the coprocessor
//! link needs: a synchronous SPI master and a push-pull output pin for the
//! select line. Chip HALs plug in through the [`adapter`] wrappers, which
//! accept any `embedded-hal` 1.0 implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  badgelink-drivers (coprocessor driver) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  badgelink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-hal 1.0 (embassy-rp, mocks)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Select and extra-channel lines
//! - [`spi::SpiBus`] - Full-duplex byte exchange

#![no_std]
#![deny(unsafe_code)]

pub mod adapter;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use adapter::{EhOutputPin, EhSpiBus};
pub use gpio::OutputPin;
pub use spi::{SpiBus, SpiConfig};
