//! SPI bus abstractions
//!
//! The coprocessor link is a byte-for-byte exchange: every byte clocked
//! out returns one byte clocked in. Only that primitive is required.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Transfer data in place
    ///
    /// Writes data from buffer while reading into the same buffer.
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Exchange a single byte
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.transfer_in_place(&mut buf)?;
        Ok(buf[0])
    }
}

/// SPI configuration
///
/// The coprocessor tolerates about 1 MHz, but some host SPI blocks do not
/// honour the requested divider exactly, so the default is much slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bit order on the wire
    pub bit_order: BitOrder,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 250_000,
            mode: Mode::Mode0,
            bit_order: BitOrder::MsbFirst,
        }
    }
}

impl SpiConfig {
    /// Clock polarity for the configured mode
    pub fn polarity(&self) -> Polarity {
        let (polarity, _) = self.mode.into();
        polarity
    }

    /// Clock phase for the configured mode
    pub fn phase(&self) -> Phase {
        let (_, phase) = self.mode.into();
        phase
    }
}

/// SPI bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loopback bus that returns each byte inverted
    struct InvertingBus;

    impl SpiBus for InvertingBus {
        type Error = ();

        fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), ()> {
            for byte in data.iter_mut() {
                *byte = !*byte;
            }
            Ok(())
        }
    }

    #[test]
    fn test_transfer_byte() {
        let mut bus = InvertingBus;
        assert_eq!(bus.transfer_byte(0x0F), Ok(0xF0));
    }

    #[test]
    fn test_default_config_is_mode0() {
        let config = SpiConfig::default();
        assert_eq!(config.frequency, 250_000);
        assert_eq!(config.polarity(), Polarity::IdleLow);
        assert_eq!(config.phase(), Phase::CaptureOnFirstTransition);
        assert_eq!(config.bit_order, BitOrder::MsbFirst);
    }

    #[test]
    fn test_mode3_split() {
        let config = SpiConfig {
            mode: Mode::Mode3,
            ..SpiConfig::default()
        };
        assert_eq!(config.polarity(), Polarity::IdleHigh);
        assert_eq!(config.phase(), Phase::CaptureOnSecondTransition);
    }
}
