//! Board wiring
//!
//! The coprocessor sits on SPI0 of a Pico-style RP2040 board:
//!
//! | Signal | GPIO |
//! |---|---|
//! | MISO | 16 |
//! | CS (active low) | 17 |
//! | SCK | 18 |
//! | MOSI | 19 |
//! | Extra channels (active low) | 20 |

use badgelink_hal::spi::{Phase, Polarity};
use badgelink_hal::SpiConfig;
use embassy_rp::spi;

/// Coprocessor link timing
pub fn link_spi_config() -> SpiConfig {
    SpiConfig::default()
}

/// Translate link settings into the RP2040 SPI block configuration
pub fn rp_spi_config(link: &SpiConfig) -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = link.frequency;
    config.polarity = match link.polarity() {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    config.phase = match link.phase() {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    // The RP2040 SPI block is MSB first only
    config
}
