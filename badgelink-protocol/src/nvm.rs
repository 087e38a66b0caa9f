//! Storage, crypto and navigation-hash request blocks
//!
//! NVM request layout (15 bytes):
//! - byte 0: operation nibble | length nibble (length ≤ 12)
//! - bytes 1-2: address or key/seed index, little-endian
//! - bytes 3-14: data, zero-padded
//!
//! The reply reuses the same layout. An operation nibble of `0xF` in the
//! reply reports that the coprocessor rejected the request.
//!
//! Navigation-hash layout (15 bytes): three history lengths, then three
//! little-endian 32-bit values at offsets 3, 7 and 11.

use heapless::Vec;

use crate::opcodes::PAYLOAD_LEN;
use crate::response::{read_u16_le, read_u32_le, write_u16_le, write_u32_le};

/// Maximum data bytes carried by one NVM request
pub const NVM_DATA_LEN: usize = 12;

/// Operation nibble mask
pub const NVM_OP_MASK: u8 = 0xf0;

/// Length nibble mask
pub const NVM_LEN_MASK: u8 = 0x0f;

/// Reply status nibble for a failed operation
pub const NVM_STATUS_ERROR: u8 = 0xf0;

/// Offset of the data field
pub const NVM_DATA_OFFSET: usize = 3;

/// Number of values a navigation-hash request can carry
pub const NAVHASH_SLOTS: usize = 3;

/// NVM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum NvmOp {
    /// Read from FLASH
    FlashRead = 0x00,
    /// Write to FLASH (not exposed by the coprocessor firmware)
    FlashWrite = 0x10,
    /// Read from EEPROM
    EepromRead = 0x20,
    /// Write to EEPROM
    EepromWrite = 0x30,
    /// Encrypt with an internal key
    Encrypt = 0x40,
    /// Decrypt with an internal key
    Decrypt = 0x50,
    /// Hash data with an internal seed
    Hash = 0x60,
    /// Query memory sizes
    GetSizes = 0xe0,
}

impl NvmOp {
    /// Operation nibble (upper four bits)
    pub fn nibble(self) -> u8 {
        self as u8
    }

    /// Parse the operation from a request's first byte
    pub fn from_header(byte: u8) -> Option<Self> {
        match byte & NVM_OP_MASK {
            0x00 => Some(NvmOp::FlashRead),
            0x10 => Some(NvmOp::FlashWrite),
            0x20 => Some(NvmOp::EepromRead),
            0x30 => Some(NvmOp::EepromWrite),
            0x40 => Some(NvmOp::Encrypt),
            0x50 => Some(NvmOp::Decrypt),
            0x60 => Some(NvmOp::Hash),
            0xe0 => Some(NvmOp::GetSizes),
            _ => None,
        }
    }
}

/// An NVM request ready to be placed in the scratch block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvmRequest {
    /// Operation
    pub op: NvmOp,
    /// Address, or key / seed index
    pub address: u16,
    /// Requested length (bytes to write, or bytes to read back)
    pub len: u8,
    /// Outgoing data
    pub data: Vec<u8, NVM_DATA_LEN>,
}

impl NvmRequest {
    /// Request that carries data; anything past 12 bytes is dropped
    pub fn with_data(op: NvmOp, address: u16, data: &[u8]) -> Self {
        let take = data.len().min(NVM_DATA_LEN);
        let mut buf = Vec::new();
        // Cannot fail, `take` is within capacity
        let _ = buf.extend_from_slice(&data[..take]);
        Self {
            op,
            address,
            len: take as u8,
            data: buf,
        }
    }

    /// Request that only reads; length is clamped to 12
    pub fn read(op: NvmOp, address: u16, len: usize) -> Self {
        Self {
            op,
            address,
            len: len.min(NVM_DATA_LEN) as u8,
            data: Vec::new(),
        }
    }

    /// Pack into a 15-byte block
    pub fn to_block(&self) -> [u8; PAYLOAD_LEN] {
        let mut block = [0u8; PAYLOAD_LEN];
        block[0] = self.op.nibble() | (self.len & NVM_LEN_MASK);
        write_u16_le(&mut block, 1, self.address);
        block[NVM_DATA_OFFSET..NVM_DATA_OFFSET + self.data.len()].copy_from_slice(&self.data);
        block
    }
}

/// An unpacked NVM reply block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvmReply {
    /// Operation nibble echoed by the coprocessor
    pub status: u8,
    /// Length nibble
    pub len: u8,
    /// Echoed address
    pub address: u16,
    /// Result data
    pub data: [u8; NVM_DATA_LEN],
}

impl NvmReply {
    /// Unpack a reply block
    pub fn from_block(block: &[u8; PAYLOAD_LEN]) -> Self {
        let mut data = [0u8; NVM_DATA_LEN];
        data.copy_from_slice(&block[NVM_DATA_OFFSET..]);
        Self {
            status: block[0] & NVM_OP_MASK,
            len: block[0] & NVM_LEN_MASK,
            address: read_u16_le(block, 1),
            data,
        }
    }

    /// True if the coprocessor reported a failure
    pub fn is_error(&self) -> bool {
        self.status == NVM_STATUS_ERROR
    }
}

/// Navigation-hash request / reply block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavHashBlock {
    /// Number of history entries folded into each value
    pub lens: [u8; NAVHASH_SLOTS],
    /// Initial vectors in, hashes out
    pub values: [u32; NAVHASH_SLOTS],
}

impl NavHashBlock {
    /// Pack into a 15-byte block
    pub fn to_block(&self) -> [u8; PAYLOAD_LEN] {
        let mut block = [0u8; PAYLOAD_LEN];
        block[..NAVHASH_SLOTS].copy_from_slice(&self.lens);
        for (i, value) in self.values.iter().enumerate() {
            write_u32_le(&mut block, NAVHASH_SLOTS + 4 * i, *value);
        }
        block
    }

    /// Unpack from a 15-byte block
    pub fn from_block(block: &[u8; PAYLOAD_LEN]) -> Self {
        let mut lens = [0u8; NAVHASH_SLOTS];
        lens.copy_from_slice(&block[..NAVHASH_SLOTS]);
        Self {
            lens,
            values: core::array::from_fn(|i| read_u32_le(block, NAVHASH_SLOTS + 4 * i)),
        }
    }
}
