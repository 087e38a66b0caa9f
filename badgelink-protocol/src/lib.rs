//! Badge UI Coprocessor Link Protocol
//!
//! This crate defines the SPI protocol between the badge's main controller
//! (host) and the small coprocessor that owns the LEDs, capacitive buttons,
//! supply ADC and secure storage. The link is full duplex at the byte level
//! but half duplex at the packet level: the coprocessor streams its reports
//! back while the host clocks out commands or filler bytes.
//!
//! # Packet Format
//!
//! Every packet has the same shape in both directions:
//! ```text
//! ┌────────┬─────────────────┬─────┐
//! │ OPCODE │ PAYLOAD         │ PAD │
//! │ 1B     │ 15B (0-padded)  │ 1B  │
//! └────────┴─────────────────┴─────┘
//! ```
//!
//! The trailing pad byte is required by the coprocessor firmware to parse
//! back-to-back packets. Inbound bytes that do not start a known report are
//! discarded, which makes the pad (and any other filler) harmless.

#![no_std]
#![deny(unsafe_code)]

pub mod buttons;
pub mod nvm;
pub mod opcodes;
pub mod packet;
pub mod response;

pub use buttons::ButtonId;
pub use nvm::{NavHashBlock, NvmOp, NvmReply, NvmRequest, NVM_DATA_LEN};
pub use opcodes::{Command, PACKET_LEN, PAYLOAD_LEN};
pub use packet::{Packet, PacketDecoder, PacketError};
pub use response::{PowerReport, Response, ResponseMask, TouchReport};
