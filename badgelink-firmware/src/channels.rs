//! Inter-task communication channels
//!
//! The link task owns the coprocessor driver. Other tasks talk to it only
//! through these statics.

use badgelink_core::ButtonId;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

/// Channel capacity for button presses
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Channel capacity for output commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Output changes requested by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum UiCommand {
    /// Fade LED `led` to `value` over `frames` frames (0 = immediate)
    Pixel { led: u8, value: u8, frames: u8 },
    /// Pulse LED `led` with `period`
    Pulse { led: u8, period: u8 },
    /// Replace the ambient animation
    Bling(BlingPreset),
    /// Coprocessor flashes the LED under a touched button
    Feedback(bool),
}

/// Ambient animations offered by the demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BlingPreset {
    Off,
    Spin,
    Heartbeat,
    Sparkle,
}

/// Supply snapshot published after each power report
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct Supplies {
    pub usb_mv: u16,
    pub battery_mv: u16,
    pub seed: u32,
}

/// Presses consumed from the coprocessor, in report order
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonId, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Output commands for the link task
pub static UI_COMMANDS: Channel<CriticalSectionRawMutex, UiCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Latest supply readings
pub static SUPPLIES: Signal<CriticalSectionRawMutex, Supplies> = Signal::new();
