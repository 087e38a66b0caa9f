//! Packet encoding and decoding
//!
//! Packet format:
//! - OPCODE (1 byte): command or report identifier
//! - PAYLOAD (15 bytes): command data, zero-padded
//! - PAD (1 byte): always zero, separates packets for the coprocessor
//!
//! There is no length field and no checksum. The decoder frames reports
//! purely by their leading byte and a fixed payload length.

use crate::opcodes::{is_report_start, PACKET_LEN, PAYLOAD_LEN};

/// Errors that can occur while building a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Payload exceeds the fixed 15-byte slot
    PayloadTooLarge,
}

/// A parsed or constructed packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// Opcode byte, including any inline field
    pub opcode: u8,
    /// Payload data, zero-padded
    pub payload: [u8; PAYLOAD_LEN],
}

impl Packet {
    /// Create a packet, zero-padding a short payload
    pub fn new(opcode: u8, payload: &[u8]) -> Result<Self, PacketError> {
        if payload.len() > PAYLOAD_LEN {
            return Err(PacketError::PayloadTooLarge);
        }

        let mut padded = [0u8; PAYLOAD_LEN];
        padded[..payload.len()].copy_from_slice(payload);

        Ok(Self {
            opcode,
            payload: padded,
        })
    }

    /// Create a packet from a full payload block
    pub const fn from_block(opcode: u8, payload: [u8; PAYLOAD_LEN]) -> Self {
        Self { opcode, payload }
    }

    /// Encode into wire bytes, trailing pad included
    pub fn encode(&self) -> [u8; PACKET_LEN] {
        let mut wire = [0u8; PACKET_LEN];
        wire[0] = self.opcode;
        wire[1..1 + PAYLOAD_LEN].copy_from_slice(&self.payload);
        wire
    }
}

/// Encode an opcode and a payload of at most 15 bytes into wire bytes
pub fn encode(opcode: u8, payload: &[u8]) -> Result<[u8; PACKET_LEN], PacketError> {
    Packet::new(opcode, payload).map(|p| p.encode())
}

/// Byte-at-a-time report decoder
///
/// Holds only the opcode of the report in progress and a receive cursor.
/// Truncated reports never complete; the caller notices through its own
/// byte budget.
#[derive(Debug, Clone)]
pub struct PacketDecoder {
    state: DecodeState,
    buffer: [u8; PAYLOAD_LEN],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for a report opcode
    Idle,
    /// Reading payload bytes
    Receiving { opcode: u8, cursor: usize },
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketDecoder {
    /// Create a new decoder
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Idle,
            buffer: [0; PAYLOAD_LEN],
        }
    }

    /// Drop any partial report
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
    }

    /// Returns true while a report is partially received
    pub fn is_receiving(&self) -> bool {
        matches!(self.state, DecodeState::Receiving { .. })
    }

    /// Feed a single inbound byte
    ///
    /// Returns `Some(packet)` when the 15th payload byte of a report
    /// arrives. Bytes that cannot start a report are ignored while idle.
    pub fn feed(&mut self, byte: u8) -> Option<Packet> {
        match self.state {
            DecodeState::Idle => {
                if is_report_start(byte) {
                    self.state = DecodeState::Receiving {
                        opcode: byte,
                        cursor: 0,
                    };
                }
                None
            }
            DecodeState::Receiving { opcode, cursor } => {
                self.buffer[cursor] = byte;
                let cursor = cursor + 1;
                if cursor < PAYLOAD_LEN {
                    self.state = DecodeState::Receiving { opcode, cursor };
                    return None;
                }

                self.state = DecodeState::Idle;
                Some(Packet::from_block(opcode, self.buffer))
            }
        }
    }
}
