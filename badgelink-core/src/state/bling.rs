//! Ambient animation ("bling") block
//!
//! Byte 0 is a mask of active modes. Several modes can run at once. Bit 7
//! is not a mode: it makes the LEDs flash on button presses and survives
//! [`BlingBlock::all_off`].

use badgelink_protocol::PAYLOAD_LEN;

pub const MODE_SPIN: u8 = 0x01;
pub const MODE_HEARTBEAT: u8 = 0x02;
pub const MODE_SPARKLE: u8 = 0x04;
pub const MODE_SWEEP: u8 = 0x08;
pub const MODE_RESERVED: u8 = 0x10;
pub const MODE_CLOCK: u8 = 0x20;
pub const BUTTON_FEEDBACK: u8 = 0x80;

// Parameter offsets
const SPIN_SPEED: usize = 1;
const SPIN_COUNT: usize = 2;
const HEARTBEAT_SPEED: usize = 3;
const HEARTBEAT_PERIOD: usize = 4;
const SPARKLE_SPEED: usize = 5;
const SPARKLE_FREQ: usize = 6;
const SWEEP_SPEED: usize = 7;
const SWEEP_PERIOD: usize = 8;
const CLOCK_HOURS: usize = 12;
const CLOCK_MINUTES: usize = 13;
const CLOCK_SECONDS: usize = 14;

/// The 15-byte bling block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlingBlock {
    bytes: [u8; PAYLOAD_LEN],
}

impl BlingBlock {
    /// Everything off, feedback disabled
    pub const fn new() -> Self {
        Self {
            bytes: [0; PAYLOAD_LEN],
        }
    }

    /// Wire bytes
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.bytes
    }

    /// Active mode mask (feedback bit excluded)
    pub fn modes(&self) -> u8 {
        self.bytes[0] & !BUTTON_FEEDBACK
    }

    /// Flash LEDs when buttons are touched
    pub fn set_button_feedback(&mut self, enabled: bool) {
        if enabled {
            self.bytes[0] |= BUTTON_FEEDBACK;
        } else {
            self.bytes[0] &= !BUTTON_FEEDBACK;
        }
    }

    /// Whether button feedback is enabled
    pub fn button_feedback(&self) -> bool {
        self.bytes[0] & BUTTON_FEEDBACK != 0
    }

    /// Stop every animation, keeping the feedback setting
    pub fn all_off(&mut self) {
        self.bytes[0] &= BUTTON_FEEDBACK;
    }

    /// Spinner with `count` lit LEDs (1-4)
    pub fn spin(&mut self, speed: u8, count: u8) {
        self.enable(MODE_SPIN);
        self.bytes[SPIN_SPEED] = speed;
        self.bytes[SPIN_COUNT] = count;
    }

    /// Fade in and out every `period` frames
    pub fn heartbeat(&mut self, speed: u8, period: u8) {
        self.enable(MODE_HEARTBEAT);
        self.bytes[HEARTBEAT_SPEED] = speed;
        self.bytes[HEARTBEAT_PERIOD] = period;
    }

    /// Random LEDs light and fade; `freq` is the chance out of 255 per frame
    pub fn sparkle(&mut self, speed: u8, freq: u8) {
        self.enable(MODE_SPARKLE);
        self.bytes[SPARKLE_SPEED] = speed;
        self.bytes[SPARKLE_FREQ] = freq;
    }

    /// Sweep across the ring every `period` frames
    pub fn sweep(&mut self, speed: u8, period: u8) {
        self.enable(MODE_SWEEP);
        self.bytes[SWEEP_SPEED] = speed;
        self.bytes[SWEEP_PERIOD] = period;
    }

    /// Clock face (hours 0-23, minutes and seconds 0-59)
    pub fn clock(&mut self, hours: u8, minutes: u8, seconds: u8) {
        self.enable(MODE_CLOCK);
        self.bytes[CLOCK_HOURS] = hours;
        self.bytes[CLOCK_MINUTES] = minutes;
        self.bytes[CLOCK_SECONDS] = seconds;
    }

    fn enable(&mut self, mode: u8) {
        self.bytes[0] |= mode;
    }
}
