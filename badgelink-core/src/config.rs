//! Driver configuration
//!
//! The configuration is fixed at driver construction. Nothing here changes
//! while the driver runs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channels::DEFAULT_PULSE_LENGTH;

/// Byte-times to wait for requested reports before giving up
pub const DEFAULT_RX_BUDGET: u8 = 96;

/// Where capacitive touch data is turned into presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterMode {
    /// Threshold the capacitive averages on the host with adaptive
    /// thresholds (coprocessor firmware predates the current filter)
    #[default]
    Local,
    /// Trust the coprocessor's own press counters and pressed mask
    Upstream,
}

/// Coprocessor driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// Touch filtering capability of the attached coprocessor
    pub filter_mode: FilterMode,
    /// Maximum filler bytes clocked while waiting for reports
    pub rx_budget: u8,
    /// Pulse length loaded into every LED on reset
    pub default_pulse_length: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverConfig {
    /// Default configuration
    pub const fn new() -> Self {
        Self {
            filter_mode: FilterMode::Local,
            rx_budget: DEFAULT_RX_BUDGET,
            default_pulse_length: DEFAULT_PULSE_LENGTH,
        }
    }

    /// Same configuration with a different filter mode
    pub const fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.filter_mode = mode;
        self
    }

    /// Same configuration with a different receive budget
    pub const fn with_rx_budget(mut self, budget: u8) -> Self {
        self.rx_budget = budget;
        self
    }
}
