//! Capacitive button identifiers
//!
//! Each button owns one bit of the touch report's inline mask. Slot order
//! follows bit significance from the top: SELECT is slot 0 and is always
//! reported first when several presses are pending.

/// Number of capacitive buttons
pub const BUTTON_COUNT: usize = 5;

/// Mask covering every button bit
pub const ALL_BUTTONS_MASK: u8 = 0x1f;

/// A capacitive touch button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// Center button
    Select,
    /// Up button
    Up,
    /// Right button
    Right,
    /// Down button
    Down,
    /// Left button
    Left,
}

// Wire format bits
const BIT_SELECT: u8 = 0x10;
const BIT_UP: u8 = 0x08;
const BIT_RIGHT: u8 = 0x04;
const BIT_DOWN: u8 = 0x02;
const BIT_LEFT: u8 = 0x01;

impl ButtonId {
    /// All buttons in report priority order
    pub const ALL: [ButtonId; BUTTON_COUNT] = [
        ButtonId::Select,
        ButtonId::Up,
        ButtonId::Right,
        ButtonId::Down,
        ButtonId::Left,
    ];

    /// Bit in the touch report mask
    pub fn bit(self) -> u8 {
        match self {
            ButtonId::Select => BIT_SELECT,
            ButtonId::Up => BIT_UP,
            ButtonId::Right => BIT_RIGHT,
            ButtonId::Down => BIT_DOWN,
            ButtonId::Left => BIT_LEFT,
        }
    }

    /// Parse a single-bit mask
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            BIT_SELECT => Some(ButtonId::Select),
            BIT_UP => Some(ButtonId::Up),
            BIT_RIGHT => Some(ButtonId::Right),
            BIT_DOWN => Some(ButtonId::Down),
            BIT_LEFT => Some(ButtonId::Left),
            _ => None,
        }
    }

    /// Zero-based slot in per-button arrays and report payloads
    pub fn slot(self) -> usize {
        match self {
            ButtonId::Select => 0,
            ButtonId::Up => 1,
            ButtonId::Right => 2,
            ButtonId::Down => 3,
            ButtonId::Left => 4,
        }
    }

    /// Button for a zero-based slot
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// One-based code recorded in the navigation history (never 0)
    ///
    /// Directions are numbered Left, Up, Right, Down going clockwise from
    /// 1; Select takes the last code.
    pub fn history_code(self) -> u8 {
        match self {
            ButtonId::Left => 1,
            ButtonId::Up => 2,
            ButtonId::Right => 3,
            ButtonId::Down => 4,
            ButtonId::Select => 5,
        }
    }
}
