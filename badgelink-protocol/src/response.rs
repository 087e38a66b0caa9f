//! Typed coprocessor reports
//!
//! Multi-byte fields are little-endian on the wire (the coprocessor is an
//! 8-bit AVR and writes its native layout).

use core::ops::{BitOr, BitOrAssign};

use crate::buttons::{ALL_BUTTONS_MASK, BUTTON_COUNT};
use crate::opcodes::{
    OP_ADC_DATA, OP_NAVHASH_RESULT, OP_NVM_RESULT, OP_TOUCH, OP_TOUCH_MASK, PAYLOAD_LEN,
};
use crate::packet::Packet;

/// Number of supply rails reported by the ADC packet
pub const POWER_RAIL_COUNT: usize = 5;

/// Set of report categories a transaction waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseMask(u8);

impl ResponseMask {
    /// Don't wait for anything
    pub const NONE: Self = Self(0x00);
    /// Touch report
    pub const BUTTONS: Self = Self(0x01);
    /// ADC report
    pub const POWER: Self = Self(0x02);
    /// Navigation hash result
    pub const NAVHASH: Self = Self(0x04);
    /// NVM operation result
    pub const NVM_RESULT: Self = Self(0x08);

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if no category is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every category in `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set difference
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for ResponseMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ResponseMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Touch report
///
/// Payload layout: five raw press counters, then five 16-bit capacitive
/// moving averages. Which half is meaningful depends on where filtering
/// happens; both are always parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchReport {
    /// Buttons the coprocessor considers pressed right now
    pub pressed_mask: u8,
    /// Press counters, incremented by the coprocessor on every press
    pub counters: [u8; BUTTON_COUNT],
    /// Capacitive moving averages (lower = touched)
    pub averages: [u16; BUTTON_COUNT],
}

impl TouchReport {
    /// Parse from the opcode byte and payload
    pub fn parse(opcode: u8, payload: &[u8; PAYLOAD_LEN]) -> Self {
        let mut counters = [0u8; BUTTON_COUNT];
        counters.copy_from_slice(&payload[..BUTTON_COUNT]);

        let averages = core::array::from_fn(|i| read_u16_le(payload, BUTTON_COUNT + 2 * i));

        Self {
            pressed_mask: opcode & ALL_BUTTONS_MASK,
            counters,
            averages,
        }
    }

    /// Encode into a packet (for simulation and tests)
    pub fn to_packet(&self) -> Packet {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[..BUTTON_COUNT].copy_from_slice(&self.counters);
        for (i, avg) in self.averages.iter().enumerate() {
            write_u16_le(&mut payload, BUTTON_COUNT + 2 * i, *avg);
        }
        Packet::from_block(OP_TOUCH | (self.pressed_mask & ALL_BUTTONS_MASK), payload)
    }
}

/// Supply voltage report, raw ADC counts per rail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerReport {
    /// Raw readings (multiply by 5.5 for millivolts)
    pub raw: [u16; POWER_RAIL_COUNT],
}

impl PowerReport {
    /// Parse from a payload
    pub fn parse(payload: &[u8; PAYLOAD_LEN]) -> Self {
        Self {
            raw: core::array::from_fn(|i| read_u16_le(payload, 2 * i)),
        }
    }

    /// Encode into a packet (for simulation and tests)
    pub fn to_packet(&self) -> Packet {
        let mut payload = [0u8; PAYLOAD_LEN];
        for (i, raw) in self.raw.iter().enumerate() {
            write_u16_le(&mut payload, 2 * i, *raw);
        }
        Packet::from_block(OP_ADC_DATA, payload)
    }
}

/// Reports parsed from coprocessor packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Button state
    Touch(TouchReport),
    /// Supply voltages
    Power(PowerReport),
    /// Navigation hash result block
    NavHash([u8; PAYLOAD_LEN]),
    /// NVM operation result block
    NvmResult([u8; PAYLOAD_LEN]),
    /// Framed but unused report
    Reserved {
        /// Opcode byte
        opcode: u8,
    },
}

impl Response {
    /// Parse a report from a decoded packet
    pub fn from_packet(packet: &Packet) -> Self {
        if (packet.opcode & OP_TOUCH_MASK) == OP_TOUCH {
            return Response::Touch(TouchReport::parse(packet.opcode, &packet.payload));
        }

        match packet.opcode {
            OP_ADC_DATA => Response::Power(PowerReport::parse(&packet.payload)),
            OP_NAVHASH_RESULT => Response::NavHash(packet.payload),
            OP_NVM_RESULT => Response::NvmResult(packet.payload),
            opcode => Response::Reserved { opcode },
        }
    }

    /// Category this report satisfies
    pub fn category(&self) -> ResponseMask {
        match self {
            Response::Touch(_) => ResponseMask::BUTTONS,
            Response::Power(_) => ResponseMask::POWER,
            Response::NavHash(_) => ResponseMask::NAVHASH,
            Response::NvmResult(_) => ResponseMask::NVM_RESULT,
            Response::Reserved { .. } => ResponseMask::NONE,
        }
    }
}

/// Read a little-endian u16 at `offset`
pub fn read_u16_le(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

/// Write a little-endian u16 at `offset`
pub fn write_u16_le(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Read a little-endian u32 at `offset`
pub fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// Write a little-endian u32 at `offset`
pub fn write_u32_le(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
