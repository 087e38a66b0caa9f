//! Wire opcodes
//!
//! Host → coprocessor opcodes are plain bytes. Coprocessor → host reports
//! are recognised by their leading byte; the touch report packs the current
//! pressed-button mask into its low five bits.

/// Number of data bytes that follow an opcode
pub const PAYLOAD_LEN: usize = 15;

/// Bytes on the wire per packet (opcode + payload + pad)
pub const PACKET_LEN: usize = 1 + PAYLOAD_LEN + 1;

// Opcodes: host → coprocessor
pub const OP_DIM: u8 = 0x6c;
pub const OP_PULSE: u8 = 0x69;
pub const OP_TRANSITION: u8 = 0x66;
pub const OP_PULSE_LENGTH: u8 = 0x63;
pub const OP_BLING: u8 = 0x3c;
pub const OP_NAVHASH_REQUEST: u8 = 0x39;
pub const OP_NVM_REQUEST: u8 = 0x36;
pub const OP_RESERVED_33: u8 = 0x33;

// Opcodes: coprocessor → host
pub const OP_TOUCH: u8 = 0x80;
pub const OP_TOUCH_MASK: u8 = 0xe0;
pub const OP_ADC_DATA: u8 = 0xcc;
pub const OP_RESERVED_C9: u8 = 0xc9;
pub const OP_NAVHASH_RESULT: u8 = 0xc6;
pub const OP_NVM_RESULT: u8 = 0xc3;

/// Commands the host can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// LED brightness, one byte per LED
    Dim = OP_DIM,
    /// LED pulse period, one byte per LED
    Pulse = OP_PULSE,
    /// Transition lengths applied to the rest of the transaction
    Transition = OP_TRANSITION,
    /// Pulse lengths, one byte per LED
    PulseLength = OP_PULSE_LENGTH,
    /// Ambient animation block
    Bling = OP_BLING,
    /// Navigation hash request
    NavHashRequest = OP_NAVHASH_REQUEST,
    /// Storage / crypto operation request
    NvmRequest = OP_NVM_REQUEST,
}

impl Command {
    /// Wire value
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Parse a host command opcode
    pub fn from_opcode(byte: u8) -> Option<Self> {
        match byte {
            OP_DIM => Some(Command::Dim),
            OP_PULSE => Some(Command::Pulse),
            OP_TRANSITION => Some(Command::Transition),
            OP_PULSE_LENGTH => Some(Command::PulseLength),
            OP_BLING => Some(Command::Bling),
            OP_NAVHASH_REQUEST => Some(Command::NavHashRequest),
            OP_NVM_REQUEST => Some(Command::NvmRequest),
            _ => None,
        }
    }
}

/// Returns true if `byte` starts a report the host knows how to frame
pub fn is_report_start(byte: u8) -> bool {
    (byte & OP_TOUCH_MASK) == OP_TOUCH
        || matches!(
            byte,
            OP_ADC_DATA | OP_RESERVED_C9 | OP_NAVHASH_RESULT | OP_NVM_RESULT
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_length() {
        assert_eq!(PACKET_LEN, 17);
    }

    #[test]
    fn test_touch_reports_carry_mask() {
        assert!(is_report_start(0x80));
        assert!(is_report_start(0x9f));
        assert!(!is_report_start(0xa0));
        assert!(!is_report_start(0x7f));
    }

    #[test]
    fn test_report_starts() {
        assert!(is_report_start(OP_ADC_DATA));
        assert!(is_report_start(OP_RESERVED_C9));
        assert!(is_report_start(OP_NAVHASH_RESULT));
        assert!(is_report_start(OP_NVM_RESULT));
    }

    #[test]
    fn test_filler_is_not_a_report() {
        assert!(!is_report_start(0x00));
        assert!(!is_report_start(0xff));
        assert!(!is_report_start(Command::Dim.opcode()));
    }

    #[test]
    fn test_command_opcodes() {
        assert_eq!(Command::from_opcode(0x3c), Some(Command::Bling));
        assert_eq!(Command::from_opcode(0x36), Some(Command::NvmRequest));
        assert_eq!(Command::from_opcode(OP_RESERVED_33), None);
        assert_eq!(Command::from_opcode(OP_NVM_RESULT), None);
    }
}
