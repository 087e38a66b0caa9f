//! Coprocessor link task
//!
//! Owns the driver. Runs one transaction per tick, forwards presses to the
//! UI and applies UI commands between ticks so they go out together.

use badgelink_core::PowerRail;
use badgelink_drivers::{Coprocessor, LinkError};
use badgelink_hal::{EhOutputPin, EhSpiBus};
use badgelink_protocol::ResponseMask;
use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Duration, Ticker};

use crate::channels::{BlingPreset, Supplies, UiCommand, BUTTON_EVENTS, SUPPLIES, UI_COMMANDS};

/// Transaction interval in milliseconds
pub const UPDATE_INTERVAL_MS: u64 = 20;

/// Supplies are read every this many transactions
const POWER_EVERY: u32 = 50;

/// Concrete driver type on this board
pub type Link = Coprocessor<
    EhSpiBus<Spi<'static, SPI0, Blocking>>,
    EhOutputPin<Output<'static>>,
    EhOutputPin<Output<'static>>,
>;

#[embassy_executor::task]
pub async fn link_task(mut link: Link) {
    info!("Link task started");

    match link.begin() {
        Ok(report) if report.is_complete() => info!("Coprocessor up"),
        Ok(report) => warn!("Coprocessor slow to answer, missing {}", report.missing),
        Err(LinkError::Bus(_)) => error!("SPI error during bring-up"),
    }

    let mut ticker = Ticker::every(Duration::from_millis(UPDATE_INTERVAL_MS));
    let mut tick: u32 = 0;

    loop {
        if let Either::Second(command) = select(ticker.next(), UI_COMMANDS.receive()).await {
            apply(&mut link, command);
            continue;
        }

        let read_power = tick % POWER_EVERY == 0;
        tick = tick.wrapping_add(1);

        let mut wanted = ResponseMask::BUTTONS;
        if read_power {
            wanted |= ResponseMask::POWER;
        }

        match link.update(wanted) {
            Ok(report) => {
                if !report.sent.is_empty() {
                    trace!("sent {}", report.sent);
                }
                if read_power && report.received.contains(ResponseMask::POWER) {
                    SUPPLIES.signal(Supplies {
                        usb_mv: link.power_millivolts(PowerRail::Usb),
                        battery_mv: link.power_millivolts(PowerRail::Lipo),
                        seed: link.seed_random(),
                    });
                }
            }
            Err(LinkError::Bus(_)) => {
                warn!("SPI error, retrying next tick");
                continue;
            }
        }

        while let Some(button) = link.next_button_event() {
            if BUTTON_EVENTS.try_send(button).is_err() {
                warn!("button channel full, dropped {}", button);
            }
        }
    }
}

fn apply(link: &mut Link, command: UiCommand) {
    debug!("ui command {}", command);
    match command {
        UiCommand::Pixel { led, value, frames: 0 } => link.set_pixel(led, value),
        UiCommand::Pixel { led, value, frames } => link.set_pixel_transition(led, value, frames),
        UiCommand::Pulse { led, period } => link.set_pulse(led, period),
        UiCommand::Feedback(true) => link.button_feedback_on(),
        UiCommand::Feedback(false) => link.button_feedback_off(),
        UiCommand::Bling(preset) => {
            link.bling_off();
            match preset {
                BlingPreset::Off => {}
                BlingPreset::Spin => link.bling_spin(4, 3),
                BlingPreset::Heartbeat => link.bling_heartbeat(6, 60),
                BlingPreset::Sparkle => link.bling_sparkle(2, 24),
            }
        }
    }
}
