//! Coprocessor driver and transaction orchestrator
//!
//! # Transaction
//!
//! One call to [`Coprocessor::update`] is one chip-select window:
//!
//! 1. Dirty output groups go out in a fixed order: bling, pulse lengths,
//!    transitions, brightness, pulse periods
//! 2. A navigation-hash or storage request follows if one was asked for
//! 3. Filler bytes are clocked until every requested report has arrived or
//!    the receive budget runs out
//!
//! Every byte clocked in, including those received while commands are going
//! out, is fed to the report decoder. Reports update the image as soon as
//! they complete.

use badgelink_core::channels::{LedIndex, PowerRail};
use badgelink_core::{
    entropy, DeviceState, DriverConfig, NavHistory, OutputGroup, OutputGroups, TouchFilter,
};
use badgelink_hal::{OutputPin, SpiBus};
use badgelink_protocol::opcodes::{OP_NAVHASH_REQUEST, OP_NVM_REQUEST};
use badgelink_protocol::{ButtonId, Packet, PacketDecoder, Response, ResponseMask};

use crate::error::LinkError;

/// Filler byte clocked while waiting for reports
const FILLER: u8 = 0x00;

/// Outcome of one transaction
///
/// A missing category is not an error: the coprocessor may simply have
/// been busy. Callers that need the data check [`UpdateReport::missing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UpdateReport {
    /// Report categories decoded during the transaction
    pub received: ResponseMask,
    /// Requested categories that never arrived
    pub missing: ResponseMask,
    /// Output groups transmitted
    pub sent: OutputGroups,
}

impl UpdateReport {
    /// True if every requested category arrived
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Badge UI coprocessor on an SPI bus
///
/// `S` is the bus, `CS` the active-low select line and `X` the active-low
/// line that hands the two auxiliary LEDs to the coprocessor.
pub struct Coprocessor<S, CS, X> {
    spi: S,
    cs: CS,
    extra: X,
    config: DriverConfig,
    pub(crate) state: DeviceState,
    touch: TouchFilter,
    pub(crate) history: NavHistory,
    decoder: PacketDecoder,
    extra_channels: bool,
}

impl<S, CS, X> Coprocessor<S, CS, X>
where
    S: SpiBus,
    CS: OutputPin,
    X: OutputPin,
{
    /// Take ownership of the bus and pins
    ///
    /// Both lines are driven inactive. No bus traffic happens until
    /// [`begin`](Self::begin) or [`update`](Self::update).
    pub fn new(spi: S, mut cs: CS, mut extra: X, config: DriverConfig) -> Self {
        cs.set_high();
        extra.set_high();
        Self {
            spi,
            cs,
            extra,
            config,
            state: DeviceState::new(config.default_pulse_length),
            touch: TouchFilter::new(config.filter_mode),
            history: NavHistory::new(),
            decoder: PacketDecoder::new(),
            extra_channels: false,
        }
    }

    /// Give back the bus and pins
    pub fn release(self) -> (S, CS, X) {
        (self.spi, self.cs, self.extra)
    }

    /// Bring the coprocessor to a known state
    ///
    /// Resets every output to its default, pushes the full image, reads
    /// buttons and supplies once, then forgets any presses that happened
    /// before this call.
    pub fn begin(&mut self) -> Result<UpdateReport, LinkError<S::Error>> {
        self.disable_extra_channels();
        self.state.reset();
        self.touch = TouchFilter::new(self.config.filter_mode);
        self.history.clear();

        let report = self.update(ResponseMask::BUTTONS | ResponseMask::POWER)?;
        self.touch.sync();
        debug!("coprocessor link up, received {=u8:#x}", report.received.bits());
        Ok(report)
    }

    /// Run one transaction, waiting for the `requested` report categories
    ///
    /// The select line is released on every path, including bus errors.
    /// Groups that failed to go out stay dirty for the next transaction.
    pub fn update(&mut self, requested: ResponseMask) -> Result<UpdateReport, LinkError<S::Error>> {
        let mut report = UpdateReport {
            missing: requested,
            ..UpdateReport::default()
        };

        self.decoder.reset();
        self.cs.set_low();
        let result = self.transact(requested, &mut report);
        self.cs.set_high();
        result.map_err(LinkError::Bus)?;

        if !report.missing.is_empty() {
            warn!("update timed out, missing {=u8:#x}", report.missing.bits());
        }
        Ok(report)
    }

    fn transact(
        &mut self,
        requested: ResponseMask,
        report: &mut UpdateReport,
    ) -> Result<(), S::Error> {
        for group in OutputGroup::TX_ORDER {
            if let Some(packet) = self.state.outbound_packet(group) {
                self.send(&packet, report)?;
                self.state.mark_sent(group);
                report.sent.insert(group);
            }
        }

        if requested.contains(ResponseMask::NAVHASH) {
            let packet = Packet::from_block(OP_NAVHASH_REQUEST, *self.state.scratch());
            self.send(&packet, report)?;
        } else if requested.contains(ResponseMask::NVM_RESULT) {
            let packet = Packet::from_block(OP_NVM_REQUEST, *self.state.scratch());
            self.send(&packet, report)?;
        }

        let mut budget = self.config.rx_budget;
        while !report.missing.is_empty() && budget > 0 {
            self.exchange(FILLER, report)?;
            budget -= 1;
        }
        Ok(())
    }

    fn send(&mut self, packet: &Packet, report: &mut UpdateReport) -> Result<(), S::Error> {
        trace!("tx opcode {=u8:#x}", packet.opcode);
        for byte in packet.encode() {
            self.exchange(byte, report)?;
        }
        Ok(())
    }

    fn exchange(&mut self, byte: u8, report: &mut UpdateReport) -> Result<(), S::Error> {
        let rx = self.spi.transfer_byte(byte)?;
        if let Some(packet) = self.decoder.feed(rx) {
            let category = self.absorb(&packet);
            report.received |= category;
            report.missing = report.missing.without(category);
        }
        Ok(())
    }

    fn absorb(&mut self, packet: &Packet) -> ResponseMask {
        let response = Response::from_packet(packet);
        match &response {
            Response::Touch(touch) => self.touch.apply(touch),
            Response::Power(power) => self.state.apply_power(power),
            Response::NavHash(block) | Response::NvmResult(block) => self.state.set_scratch(*block),
            Response::Reserved { opcode } => {
                trace!("ignoring reserved report {=u8:#x}", *opcode);
            }
        }
        response.category()
    }

    // ---- LED outputs ----
    //
    // Raw indices past the last LED are ignored by setters and read back
    // as zero.

    /// Set brightness of LED `n`, applied immediately
    pub fn set_pixel(&mut self, n: u8, value: u8) {
        if let Some(led) = LedIndex::new(n) {
            self.state.set_pixel(led, value);
        }
    }

    /// Set brightness of LED `n`, fading over `frames` frames
    pub fn set_pixel_transition(&mut self, n: u8, value: u8, frames: u8) {
        if let Some(led) = LedIndex::new(n) {
            self.state.set_pixel_transition(led, value, frames);
        }
    }

    /// Set pulse period of LED `n`, applied immediately
    pub fn set_pulse(&mut self, n: u8, period: u8) {
        if let Some(led) = LedIndex::new(n) {
            self.state.set_pulse(led, period);
        }
    }

    /// Set pulse period of LED `n` over `frames` frames
    pub fn set_pulse_transition(&mut self, n: u8, period: u8, frames: u8) {
        if let Some(led) = LedIndex::new(n) {
            self.state.set_pulse_transition(led, period, frames);
        }
    }

    /// Set brightness and pulse period of LED `n` over `frames` frames
    pub fn set_pixel_pulse_transition(&mut self, n: u8, value: u8, period: u8, frames: u8) {
        if let Some(led) = LedIndex::new(n) {
            self.state.set_pixel_pulse_transition(led, value, period, frames);
        }
    }

    /// Set pulse length of LED `n`
    pub fn set_pulse_length(&mut self, n: u8, frames: u8) {
        if let Some(led) = LedIndex::new(n) {
            self.state.set_pulse_length(led, frames);
        }
    }

    /// Brightness last set for LED `n`
    pub fn pixel(&self, n: u8) -> u8 {
        LedIndex::new(n).map_or(0, |led| self.state.pixel(led))
    }

    /// Pulse period last set for LED `n`
    pub fn pulse(&self, n: u8) -> u8 {
        LedIndex::new(n).map_or(0, |led| self.state.pulse(led))
    }

    /// Pulse length of LED `n`, in frames
    pub fn pulse_length(&self, n: u8) -> u8 {
        LedIndex::new(n).map_or(0, |led| self.state.pulse_length(led))
    }

    /// Pending fade length of LED `n`
    ///
    /// Reads back as 0xff once a fade has been handed to the coprocessor.
    pub fn transition(&self, n: u8) -> u8 {
        LedIndex::new(n).map_or(0, |led| self.state.transition(led))
    }

    // ---- Bling ----

    /// Let the coprocessor light LEDs under touched buttons
    pub fn button_feedback_on(&mut self) {
        self.state.bling_mut().set_button_feedback(true);
    }

    /// Stop lighting LEDs under touched buttons
    pub fn button_feedback_off(&mut self) {
        self.state.bling_mut().set_button_feedback(false);
    }

    pub fn button_feedback_enabled(&self) -> bool {
        self.state.bling().button_feedback()
    }

    /// Stop every animation; button feedback is left as it is
    pub fn bling_off(&mut self) {
        self.state.bling_mut().all_off();
    }

    /// Rotate `count` lit LEDs around the ring
    pub fn bling_spin(&mut self, speed: u8, count: u8) {
        self.state.bling_mut().spin(speed, count);
    }

    /// Double pulse of the whole ring every `period`
    pub fn bling_heartbeat(&mut self, speed: u8, period: u8) {
        self.state.bling_mut().heartbeat(speed, period);
    }

    /// Random twinkles, `frequency` sets how often one starts
    pub fn bling_sparkle(&mut self, speed: u8, frequency: u8) {
        self.state.bling_mut().sparkle(speed, frequency);
    }

    /// Light sweeping across the ring
    pub fn bling_sweep(&mut self, speed: u8, period: u8) {
        self.state.bling_mut().sweep(speed, period);
    }

    /// Clock face showing the given time
    ///
    /// The coprocessor keeps the clock running from here.
    pub fn bling_clock(&mut self, hours: u8, minutes: u8, seconds: u8) {
        self.state.bling_mut().clock(hours, minutes, seconds);
    }

    // ---- Extra channels ----

    /// Hand the auxiliary LEDs to the coprocessor
    pub fn enable_extra_channels(&mut self) {
        self.extra.set_low();
        self.extra_channels = true;
    }

    /// Take the auxiliary LEDs back
    pub fn disable_extra_channels(&mut self) {
        self.extra.set_high();
        self.extra_channels = false;
    }

    /// Whether the auxiliary LEDs belong to the coprocessor
    pub fn extra_channels_enabled(&self) -> bool {
        self.extra_channels
    }

    // ---- Buttons ----

    /// Next unreported press, highest priority first
    ///
    /// Each press is returned exactly once and recorded in the navigation
    /// history.
    pub fn next_button_event(&mut self) -> Option<ButtonId> {
        let button = self.touch.next_event()?;
        self.history.push(button);
        Some(button)
    }

    /// Whether `button` is held, or was briefly pressed since last asked
    pub fn is_currently_pressed(&mut self, button: ButtonId) -> bool {
        self.touch.is_pressed(button)
    }

    /// Most recent `entries` consumed presses, 3 bits each
    pub fn nav_history(&self, entries: usize) -> u32 {
        self.history.recent(entries)
    }

    /// Whether presses are decided from raw capacitance on this side
    pub fn is_local_filtering(&self) -> bool {
        self.touch.is_local()
    }

    /// Touch filter, for raw counters, averages and thresholds
    pub fn touch(&self) -> &TouchFilter {
        &self.touch
    }

    // ---- Supplies ----

    /// Supply voltage from the last power report
    pub fn power_millivolts(&self, rail: PowerRail) -> u16 {
        self.state.power_millivolts(rail)
    }

    /// Seed for a pseudo-random generator from sensor noise
    pub fn seed_random(&self) -> u32 {
        let averages = self.touch.averages().iter().copied();
        let power = self.state.power_readings().iter().copied();
        entropy::fold_all(averages.chain(power))
    }

    // ---- Accessors ----

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Host-side image of the coprocessor outputs
    pub fn state(&self) -> &DeviceState {
        &self.state
    }
}
