//! Touch filter with adaptive thresholds
//!
//! Every touch report feeds the filter. Two independent consumers read its
//! output:
//!
//! - The edge track: a per-button press counter compared against an
//!   acknowledged counter. Each press is reported exactly once through
//!   [`TouchFilter::next_event`].
//! - The level track: a latched pressed mask. A press that begins and ends
//!   between two polls of [`TouchFilter::is_pressed`] is still seen once.
//!
//! In local mode the host decides presses from the capacitive moving
//! averages. Each button keeps a press threshold near 3/4 of its idle
//! reading and a release threshold near 7/8, both tracked with a 1/64
//! exponential average while the button is released. Lower readings mean
//! a finger is closer.

use badgelink_protocol::buttons::ALL_BUTTONS_MASK;
use badgelink_protocol::response::TouchReport;

use crate::channels::{ButtonId, BUTTON_COUNT};
use crate::config::FilterMode;

/// Moving average assumed before the first report
pub const INITIAL_AVERAGE: u16 = 0x3fff;

/// Adaptation rate as a right shift (1/64 per report)
const ADAPT_SHIFT: u32 = 6;

/// Press detection and acknowledgement state for all buttons
#[derive(Debug, Clone)]
pub struct TouchFilter {
    mode: FilterMode,
    raw: [u8; BUTTON_COUNT],
    acked: [u8; BUTTON_COUNT],
    averages: [u16; BUTTON_COUNT],
    press_threshold: [u16; BUTTON_COUNT],
    release_threshold: [u16; BUTTON_COUNT],
    touched: u8,
    level: u8,
    level_ack: u8,
}

impl TouchFilter {
    pub fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            raw: [0; BUTTON_COUNT],
            acked: [0; BUTTON_COUNT],
            averages: [INITIAL_AVERAGE; BUTTON_COUNT],
            press_threshold: [0; BUTTON_COUNT],
            release_threshold: [0; BUTTON_COUNT],
            touched: 0,
            level: 0,
            level_ack: 0,
        }
    }

    /// Filtering mode
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Whether presses are decided on this side of the link
    pub fn is_local(&self) -> bool {
        self.mode == FilterMode::Local
    }

    /// Discard pending events and latched levels
    ///
    /// Presses that happened before this call are never reported.
    pub fn sync(&mut self) {
        match self.mode {
            FilterMode::Local => {
                self.raw = [0; BUTTON_COUNT];
                self.acked = [0; BUTTON_COUNT];
            }
            FilterMode::Upstream => self.acked = self.raw,
        }
        self.level = 0;
        self.level_ack = 0;
    }

    /// Feed one touch report
    pub fn apply(&mut self, report: &TouchReport) {
        self.averages = report.averages;

        let current = match self.mode {
            FilterMode::Local => {
                for button in ButtonId::ALL {
                    self.filter_button(button);
                }
                self.touched
            }
            FilterMode::Upstream => {
                self.raw = report.counters;
                report.pressed_mask & ALL_BUTTONS_MASK
            }
        };

        self.level = (self.level & !self.level_ack) | current;
        self.level_ack = 0;
    }

    fn filter_button(&mut self, button: ButtonId) {
        let n = button.slot();
        let bit = button.bit();
        let avg = self.averages[n];

        if avg < self.press_threshold[n] && self.touched & bit == 0 {
            self.touched |= bit;
            self.raw[n] = self.raw[n].wrapping_add(1);
        } else if avg > self.release_threshold[n] {
            self.touched &= !bit;

            let avg = u32::from(avg);
            let press_target = (avg / 2 + avg) / 2;
            let release_target = (press_target + avg) / 2;
            self.press_threshold[n] = adapt(self.press_threshold[n], press_target);
            self.release_threshold[n] = adapt(self.release_threshold[n], release_target);
        }
    }

    /// Next unreported press, highest priority button first
    ///
    /// Consuming a press also clears that button's latched level at the
    /// next report.
    pub fn next_event(&mut self) -> Option<ButtonId> {
        let button = ButtonId::ALL
            .into_iter()
            .find(|b| self.raw[b.slot()] != self.acked[b.slot()])?;
        let n = button.slot();
        self.acked[n] = self.acked[n].wrapping_add(1);
        self.level_ack |= button.bit();
        Some(button)
    }

    /// Whether `button` is held, or was pressed since the last query
    pub fn is_pressed(&mut self, button: ButtonId) -> bool {
        let bit = button.bit();
        self.level_ack |= bit;
        self.level & bit != 0
    }

    /// Press counter
    pub fn raw_count(&self, button: ButtonId) -> u8 {
        self.raw[button.slot()]
    }

    /// Acknowledged press counter
    pub fn acked_count(&self, button: ButtonId) -> u8 {
        self.acked[button.slot()]
    }

    /// Latest capacitive moving average
    pub fn average(&self, button: ButtonId) -> u16 {
        self.averages[button.slot()]
    }

    /// All latest moving averages in slot order
    pub fn averages(&self) -> &[u16; BUTTON_COUNT] {
        &self.averages
    }

    pub fn press_threshold(&self, button: ButtonId) -> u16 {
        self.press_threshold[button.slot()]
    }

    pub fn release_threshold(&self, button: ButtonId) -> u16 {
        self.release_threshold[button.slot()]
    }
}

// threshold += target/64 - threshold/64, in 16-bit wrapping arithmetic
fn adapt(threshold: u16, target: u32) -> u16 {
    let step = (target >> ADAPT_SHIFT) as u16;
    threshold
        .wrapping_add(step)
        .wrapping_sub(threshold >> ADAPT_SHIFT)
}
