//! Driver for the badge UI coprocessor
//!
//! The coprocessor owns the LEDs, capacitive buttons, supply ADC and
//! secure storage. [`Coprocessor`] keeps a host-side image of its outputs
//! and synchronises it over SPI in bounded transactions:
//!
//! - Output setters only touch the image and mark groups dirty
//! - [`Coprocessor::update`] sends dirty groups, optionally a storage
//!   request, then clocks filler until the requested reports arrive
//! - Button, supply and storage queries read what the last transaction
//!   received
//!
//! Nothing here allocates or blocks beyond the bus itself.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod coprocessor;
pub mod error;
pub mod storage;

pub use coprocessor::{Coprocessor, UpdateReport};
pub use error::{LinkError, NvmError};
