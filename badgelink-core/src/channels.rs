//! Typed channel indices
//!
//! Raw `u8` indices only enter the system through [`LedIndex::new`] and
//! [`PowerRail::from_index`]; everything past that point is in range by
//! construction.

pub use badgelink_protocol::buttons::{ButtonId, BUTTON_COUNT};
pub use badgelink_protocol::response::POWER_RAIL_COUNT;

/// Number of LEDs driven by the coprocessor
pub const LED_COUNT: usize = 14;

/// Transition length meaning "apply now"
pub const TRANS_IMMEDIATE: u8 = 0x00;

/// Transition length meaning "a transition is already running, leave it"
pub const TRANS_IN_FLIGHT: u8 = 0xff;

/// Pulse length (frames) the coprocessor firmware boots with
pub const DEFAULT_PULSE_LENGTH: u8 = 10;

/// Index of an LED, always below [`LED_COUNT`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedIndex(u8);

impl LedIndex {
    /// Validate a raw index
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < LED_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Raw index
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position in per-LED arrays
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Every LED in index order
    pub fn all() -> impl Iterator<Item = LedIndex> {
        (0..LED_COUNT as u8).map(LedIndex)
    }
}

/// Supply rail sampled by the coprocessor ADC
///
/// Only the first three rails are wired on current boards; the other two
/// slots are reported but read zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerRail {
    /// USB input
    Usb,
    /// LiPo battery
    Lipo,
    /// AA battery pack
    Aa,
    /// Reserved for future use
    Reserved3,
    /// Reserved for future use
    Reserved4,
}

impl PowerRail {
    /// All rails in report order
    pub const ALL: [PowerRail; POWER_RAIL_COUNT] = [
        PowerRail::Usb,
        PowerRail::Lipo,
        PowerRail::Aa,
        PowerRail::Reserved3,
        PowerRail::Reserved4,
    ];

    /// Position in the ADC report
    pub fn index(self) -> usize {
        match self {
            PowerRail::Usb => 0,
            PowerRail::Lipo => 1,
            PowerRail::Aa => 2,
            PowerRail::Reserved3 => 3,
            PowerRail::Reserved4 => 4,
        }
    }

    /// Rail for a report position
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Convert a raw ADC reading to millivolts (× 5.5)
pub fn raw_to_millivolts(raw: u16) -> u16 {
    let raw = raw as u32;
    let mv = (raw << 2) + raw + (raw >> 1);
    mv.min(u16::MAX as u32) as u16
}
