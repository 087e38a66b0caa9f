//! Adapters from `embedded-hal` 1.0 to the badgelink traits
//!
//! Any chip HAL that implements the `embedded-hal` blocking traits can
//! drive the link by wrapping its peripherals here.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin as EhOutput;
use embedded_hal::spi::SpiBus as EhSpi;

use crate::gpio::OutputPin;
use crate::spi::SpiBus;

/// Wraps an `embedded-hal` SPI bus
pub struct EhSpiBus<S> {
    bus: S,
}

impl<S> EhSpiBus<S> {
    /// Wrap a bus
    pub fn new(bus: S) -> Self {
        Self { bus }
    }

    /// Release the wrapped bus
    pub fn release(self) -> S {
        self.bus
    }
}

impl<S: EhSpi<u8>> SpiBus for EhSpiBus<S> {
    type Error = S::Error;

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.transfer_in_place(data)?;
        self.bus.flush()
    }
}

/// Wraps an infallible `embedded-hal` output pin
///
/// The driven level is tracked locally so `is_set_high` does not need
/// `StatefulOutputPin`.
pub struct EhOutputPin<P> {
    pin: P,
    high: bool,
}

impl<P: EhOutput<Error = Infallible>> EhOutputPin<P> {
    /// Wrap a pin and drive it to `initial_high`
    pub fn new(pin: P, initial_high: bool) -> Self {
        let mut wrapped = Self { pin, high: false };
        wrapped.set_state(initial_high);
        wrapped
    }
}

impl<P: EhOutput<Error = Infallible>> OutputPin for EhOutputPin<P> {
    fn set_high(&mut self) {
        if let Err(never) = self.pin.set_high() {
            match never {}
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if let Err(never) = self.pin.set_low() {
            match never {}
        }
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    struct FakePin {
        level: bool,
        writes: u8,
    }

    impl PinErrorType for FakePin {
        type Error = Infallible;
    }

    impl EhOutput for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.level = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.level = true;
            self.writes += 1;
            Ok(())
        }
    }

    /// Echoes every byte back shifted by one transfer
    struct EchoSpi {
        last: u8,
        flushed: bool,
    }

    impl SpiErrorType for EchoSpi {
        type Error = Infallible;
    }

    impl EhSpi<u8> for EchoSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            words.fill(self.last);
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            if let Some(&b) = words.last() {
                self.last = b;
            }
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            for (r, w) in read.iter_mut().zip(write) {
                *r = self.last;
                self.last = *w;
            }
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            for w in words.iter_mut() {
                let out = *w;
                *w = self.last;
                self.last = out;
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_pin_adapter_tracks_level() {
        let mut pin = EhOutputPin::new(FakePin { level: false, writes: 0 }, true);
        assert!(pin.is_set_high());
        assert!(pin.pin.level);

        pin.set_low();
        assert!(pin.is_set_low());
        assert!(!pin.pin.level);
        assert_eq!(pin.pin.writes, 2);
    }

    #[test]
    fn test_spi_adapter_exchanges_and_flushes() {
        let mut bus = EhSpiBus::new(EchoSpi { last: 0xAA, flushed: false });

        assert_eq!(bus.transfer_byte(0x12), Ok(0xAA));
        assert_eq!(bus.transfer_byte(0x34), Ok(0x12));
        assert!(bus.release().flushed);
    }
}
