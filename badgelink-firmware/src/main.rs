//! Badgelink - badge UI coprocessor demo firmware
//!
//! Brings up the coprocessor link on an RP2040 and runs a small demo UI on
//! top of it: the buttons drive an LED and the ambient animation, and the
//! supply readings are logged over RTT.

#![no_std]
#![no_main]

use badgelink_core::DriverConfig;
use badgelink_drivers::Coprocessor;
use badgelink_hal::{EhOutputPin, EhSpiBus};
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use {defmt_rtt as _, panic_probe as _};

mod board;
mod channels;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Badgelink firmware starting...");

    let p = embassy_rp::init(Default::default());

    let link_config = board::link_spi_config();
    info!("Coprocessor SPI at {} Hz", link_config.frequency);
    let spi = Spi::new_blocking(
        p.SPI0,
        p.PIN_18,
        p.PIN_19,
        p.PIN_16,
        board::rp_spi_config(&link_config),
    );

    // Both lines idle high until the driver takes them
    let cs = EhOutputPin::new(Output::new(p.PIN_17, Level::High), true);
    let extra = EhOutputPin::new(Output::new(p.PIN_20, Level::High), true);

    let link = Coprocessor::new(EhSpiBus::new(spi), cs, extra, DriverConfig::default());

    spawner.spawn(tasks::link_task(link)).unwrap();
    spawner.spawn(tasks::ui_task()).unwrap();

    info!("All tasks spawned, firmware running");
}
