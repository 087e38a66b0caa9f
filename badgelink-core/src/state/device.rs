//! Device state: the host-side image of the coprocessor

use badgelink_protocol::response::PowerReport;
use badgelink_protocol::{Packet, PAYLOAD_LEN};

use super::bling::BlingBlock;
use super::groups::{OutputGroup, OutputGroups};
use crate::channels::{
    raw_to_millivolts, LedIndex, PowerRail, LED_COUNT, POWER_RAIL_COUNT, TRANS_IMMEDIATE,
    TRANS_IN_FLIGHT,
};

/// Host-side image of every coprocessor output and the last reported
/// supply readings
///
/// Read-back accessors return the locally requested values, which may not
/// have reached the coprocessor yet.
#[derive(Debug, Clone)]
pub struct DeviceState {
    dim: [u8; LED_COUNT],
    pulse: [u8; LED_COUNT],
    transition: [u8; LED_COUNT],
    pulse_length: [u8; LED_COUNT],
    default_pulse_length: u8,
    bling: BlingBlock,
    power: [u16; POWER_RAIL_COUNT],
    scratch: [u8; PAYLOAD_LEN],
    dirty: OutputGroups,
}

impl DeviceState {
    /// Fresh image with every group dirty so the first transaction pushes
    /// a known state
    pub fn new(default_pulse_length: u8) -> Self {
        Self {
            dim: [0; LED_COUNT],
            pulse: [0; LED_COUNT],
            transition: [TRANS_IMMEDIATE; LED_COUNT],
            pulse_length: [default_pulse_length; LED_COUNT],
            default_pulse_length,
            bling: BlingBlock::new(),
            power: [0; POWER_RAIL_COUNT],
            scratch: [0; PAYLOAD_LEN],
            dirty: OutputGroups::all(),
        }
    }

    /// Restore defaults and mark everything dirty
    pub fn reset(&mut self) {
        *self = Self::new(self.default_pulse_length);
    }

    // ---- LED outputs ----

    /// Set brightness, applied immediately
    pub fn set_pixel(&mut self, led: LedIndex, value: u8) {
        let n = led.as_usize();
        self.dim[n] = value;
        self.transition[n] = TRANS_IMMEDIATE;
        self.dirty.insert(OutputGroup::Dim);
    }

    /// Set brightness, fading over `frames` animation frames
    pub fn set_pixel_transition(&mut self, led: LedIndex, value: u8, frames: u8) {
        let n = led.as_usize();
        self.dim[n] = value;
        self.set_transition(n, frames);
        self.dirty.insert(OutputGroup::Dim);
    }

    /// Set pulse period, applied immediately
    pub fn set_pulse(&mut self, led: LedIndex, period: u8) {
        let n = led.as_usize();
        self.pulse[n] = period;
        self.transition[n] = TRANS_IMMEDIATE;
        self.dirty.insert(OutputGroup::Pulse);
    }

    /// Set pulse period over `frames` animation frames
    pub fn set_pulse_transition(&mut self, led: LedIndex, period: u8, frames: u8) {
        let n = led.as_usize();
        self.pulse[n] = period;
        self.set_transition(n, frames);
        self.dirty.insert(OutputGroup::Pulse);
    }

    /// Set brightness and pulse period together over `frames` frames
    pub fn set_pixel_pulse_transition(&mut self, led: LedIndex, dim: u8, period: u8, frames: u8) {
        let n = led.as_usize();
        self.dim[n] = dim;
        self.pulse[n] = period;
        self.set_transition(n, frames);
        self.dirty.insert(OutputGroup::Dim);
        self.dirty.insert(OutputGroup::Pulse);
    }

    /// Set pulse length in frames (periods shorter than this show solid)
    pub fn set_pulse_length(&mut self, led: LedIndex, frames: u8) {
        self.pulse_length[led.as_usize()] = frames;
        self.dirty.insert(OutputGroup::PulseLength);
    }

    fn set_transition(&mut self, n: usize, frames: u8) {
        self.transition[n] = frames;
        self.dirty.insert(OutputGroup::Transition);
    }

    /// Last requested brightness
    pub fn pixel(&self, led: LedIndex) -> u8 {
        self.dim[led.as_usize()]
    }

    /// Last requested pulse period
    pub fn pulse(&self, led: LedIndex) -> u8 {
        self.pulse[led.as_usize()]
    }

    /// Last requested pulse length
    pub fn pulse_length(&self, led: LedIndex) -> u8 {
        self.pulse_length[led.as_usize()]
    }

    /// Current transition entry (`TRANS_IN_FLIGHT` once sent)
    pub fn transition(&self, led: LedIndex) -> u8 {
        self.transition[led.as_usize()]
    }

    // ---- Bling ----

    /// Bling block
    pub fn bling(&self) -> &BlingBlock {
        &self.bling
    }

    /// Mutable bling block; borrowing it marks the block dirty
    pub fn bling_mut(&mut self) -> &mut BlingBlock {
        self.dirty.insert(OutputGroup::Bling);
        &mut self.bling
    }

    // ---- Inputs ----

    /// Store a supply report
    pub fn apply_power(&mut self, report: &PowerReport) {
        self.power = report.raw;
    }

    /// Raw ADC reading for a rail
    pub fn power_raw(&self, rail: PowerRail) -> u16 {
        self.power[rail.index()]
    }

    /// Rail voltage in millivolts
    pub fn power_millivolts(&self, rail: PowerRail) -> u16 {
        raw_to_millivolts(self.power_raw(rail))
    }

    /// All raw supply readings in report order
    pub fn power_readings(&self) -> &[u16; POWER_RAIL_COUNT] {
        &self.power
    }

    // ---- Storage scratch block ----

    /// Scratch block shared by NVM and navigation-hash requests and replies
    pub fn scratch(&self) -> &[u8; PAYLOAD_LEN] {
        &self.scratch
    }

    /// Replace the scratch block
    pub fn set_scratch(&mut self, block: [u8; PAYLOAD_LEN]) {
        self.scratch = block;
    }

    // ---- Dirty tracking ----

    /// Groups with changes not yet transmitted
    pub fn dirty(&self) -> OutputGroups {
        self.dirty
    }

    /// Packet to transmit for `group`, if it needs transmitting
    ///
    /// The transition table is sent whenever brightness or pulse values are
    /// about to go out and at least one LED is not immediate, because the
    /// coprocessor applies it only within the current transaction. When
    /// every entry is immediate the table is redundant and the group is
    /// settled without a packet.
    pub fn outbound_packet(&mut self, group: OutputGroup) -> Option<Packet> {
        if group == OutputGroup::Transition {
            let wanted = self.dirty.contains(OutputGroup::Transition)
                || self.dirty.contains(OutputGroup::Dim)
                || self.dirty.contains(OutputGroup::Pulse);
            if !wanted {
                return None;
            }
            if self.transition.iter().all(|&t| t == TRANS_IMMEDIATE) {
                self.dirty.remove(OutputGroup::Transition);
                return None;
            }
        } else if !self.dirty.contains(group) {
            return None;
        }

        let block: &[u8] = match group {
            OutputGroup::Bling => self.bling.as_bytes(),
            OutputGroup::PulseLength => &self.pulse_length,
            OutputGroup::Transition => &self.transition,
            OutputGroup::Dim => &self.dim,
            OutputGroup::Pulse => &self.pulse,
        };
        Packet::new(group.opcode(), block).ok()
    }

    /// Record that `group` reached the wire
    ///
    /// Sent transitions become in-flight so later transactions leave them
    /// running until the LED is explicitly set again.
    pub fn mark_sent(&mut self, group: OutputGroup) {
        self.dirty.remove(group);
        if group == OutputGroup::Transition {
            for t in self.transition.iter_mut() {
                if *t != TRANS_IMMEDIATE {
                    *t = TRANS_IN_FLIGHT;
                }
            }
        }
    }
}
