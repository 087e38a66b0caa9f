//! Navigation history shift register
//!
//! Every consumed press event shifts a 3-bit code into a 32-bit register,
//! most recent in the low bits. Codes start at one so an empty entry reads
//! as zero.

use crate::channels::ButtonId;

/// Bits per history entry
pub const HISTORY_BITS: u32 = 3;

/// Entries that fit in the register
pub const HISTORY_CAPACITY: usize = 10;

/// Shift register of recent press events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavHistory(u32);

impl NavHistory {
    /// Empty history
    pub const fn new() -> Self {
        Self(0)
    }

    /// Record a consumed press
    pub fn push(&mut self, button: ButtonId) {
        self.0 = (self.0 << HISTORY_BITS) | u32::from(button.history_code());
    }

    /// Whole register
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Most recent `entries` presses, most recent in the low bits
    pub fn recent(&self, entries: usize) -> u32 {
        self.0 & Self::mask(entries)
    }

    /// Register mask covering `entries` entries
    ///
    /// Requests past the register width cover all 32 bits, including the
    /// two bits left over from a partially shifted-out entry.
    pub fn mask(entries: usize) -> u32 {
        if entries > HISTORY_CAPACITY {
            u32::MAX
        } else {
            // entries <= 10 keeps the shift below 32
            (1u32 << (HISTORY_BITS as usize * entries)) - 1
        }
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}
