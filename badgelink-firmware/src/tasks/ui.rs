//! Demo UI task
//!
//! Up and Down step the brightness of LED 0 with a short fade, Left and
//! Right cycle the ambient animation, Select toggles button feedback.

use badgelink_core::ButtonId;
use defmt::*;
use embassy_futures::select::{select, Either};

use crate::channels::{BlingPreset, UiCommand, BUTTON_EVENTS, SUPPLIES, UI_COMMANDS};

const PRESETS: [BlingPreset; 4] = [
    BlingPreset::Off,
    BlingPreset::Spin,
    BlingPreset::Heartbeat,
    BlingPreset::Sparkle,
];

const BRIGHTNESS_STEP: u8 = 32;
const FADE_FRAMES: u8 = 12;

#[embassy_executor::task]
pub async fn ui_task() {
    info!("UI task started");

    let mut brightness: u8 = 0;
    let mut preset: usize = 0;
    let mut feedback = true;
    UI_COMMANDS.send(UiCommand::Feedback(feedback)).await;

    loop {
        let button = match select(BUTTON_EVENTS.receive(), SUPPLIES.wait()).await {
            Either::First(button) => button,
            Either::Second(supplies) => {
                info!(
                    "USB {} mV, battery {} mV, seed {=u32:#x}",
                    supplies.usb_mv, supplies.battery_mv, supplies.seed
                );
                continue;
            }
        };
        info!("Button {}", button);

        let command = match button {
            ButtonId::Up | ButtonId::Down => {
                brightness = if button == ButtonId::Up {
                    brightness.saturating_add(BRIGHTNESS_STEP)
                } else {
                    brightness.saturating_sub(BRIGHTNESS_STEP)
                };
                UiCommand::Pixel {
                    led: 0,
                    value: brightness,
                    frames: FADE_FRAMES,
                }
            }
            ButtonId::Right | ButtonId::Left => {
                preset = if button == ButtonId::Right {
                    (preset + 1) % PRESETS.len()
                } else {
                    (preset + PRESETS.len() - 1) % PRESETS.len()
                };
                UiCommand::Bling(PRESETS[preset])
            }
            ButtonId::Select => {
                feedback = !feedback;
                UiCommand::Feedback(feedback)
            }
        };
        UI_COMMANDS.send(command).await;
    }
}
