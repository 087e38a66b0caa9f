//! Scripted coprocessor for integration tests
//!
//! `MockLink` records every packet the host sends and replays queued
//! response bytes, clocking zeros once the queue runs dry. A responder
//! closure can answer host packets as they complete, which is how storage
//! requests get their replies within the same transaction.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use badgelink_core::DriverConfig;
use badgelink_drivers::Coprocessor;
use badgelink_hal::{OutputPin, SpiBus};
use badgelink_protocol::{Command, Packet, PAYLOAD_LEN};

type Responder = Box<dyn FnMut(&Packet) -> Option<Packet>>;

#[derive(Default)]
struct LinkState {
    sent: Vec<Packet>,
    raw: Vec<u8>,
    partial: Option<(u8, Vec<u8>)>,
    replies: VecDeque<u8>,
    responder: Option<Responder>,
    fail_after: Option<usize>,
}

impl LinkState {
    fn observe(&mut self, byte: u8) {
        match self.partial.take() {
            None => {
                if Command::from_opcode(byte).is_some() {
                    self.partial = Some((byte, Vec::with_capacity(PAYLOAD_LEN)));
                }
            }
            Some((opcode, mut payload)) => {
                payload.push(byte);
                if payload.len() < PAYLOAD_LEN {
                    self.partial = Some((opcode, payload));
                    return;
                }
                let packet = Packet::new(opcode, &payload).expect("15-byte payload");
                if let Some(responder) = self.responder.as_mut() {
                    if let Some(reply) = responder(&packet) {
                        self.replies.extend(reply.encode());
                    }
                }
                self.sent.push(packet);
            }
        }
    }
}

/// Bus fault injected by [`MockLink::fail_after`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// Shared handle to a scripted coprocessor
#[derive(Clone, Default)]
pub struct MockLink {
    state: Rc<RefCell<LinkState>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a report to be clocked back starting with the next byte
    pub fn queue(&self, packet: &Packet) {
        self.state.borrow_mut().replies.extend(packet.encode());
    }

    /// Answer host packets as they complete
    pub fn respond_with(&self, responder: impl FnMut(&Packet) -> Option<Packet> + 'static) {
        self.state.borrow_mut().responder = Some(Box::new(responder));
    }

    /// Fail every transfer once `bytes` more bytes have been clocked
    pub fn fail_after(&self, bytes: usize) {
        let clocked = self.state.borrow().raw.len();
        self.state.borrow_mut().fail_after = Some(clocked + bytes);
    }

    /// Packets sent by the host so far
    pub fn sent(&self) -> Vec<Packet> {
        self.state.borrow().sent.clone()
    }

    /// Opcodes sent by the host so far
    pub fn sent_opcodes(&self) -> Vec<u8> {
        self.state.borrow().sent.iter().map(|p| p.opcode).collect()
    }

    /// Total bytes clocked
    pub fn clocked(&self) -> usize {
        self.state.borrow().raw.len()
    }

    /// Forget recorded traffic
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.sent.clear();
        state.raw.clear();
    }
}

impl SpiBus for MockLink {
    type Error = BusFault;

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), BusFault> {
        let mut state = self.state.borrow_mut();
        for byte in data.iter_mut() {
            if state.fail_after.is_some_and(|limit| state.raw.len() >= limit) {
                return Err(BusFault);
            }
            state.raw.push(*byte);
            let host = *byte;
            *byte = state.replies.pop_front().unwrap_or(0);
            state.observe(host);
        }
        Ok(())
    }
}

/// Output pin whose level stays observable after it is moved into the
/// driver
#[derive(Clone)]
pub struct SharedPin {
    high: Rc<Cell<bool>>,
    falls: Rc<Cell<usize>>,
}

impl SharedPin {
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(false)),
            falls: Rc::new(Cell::new(0)),
        }
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    /// Number of high-to-low transitions
    pub fn falls(&self) -> usize {
        self.falls.get()
    }
}

impl OutputPin for SharedPin {
    fn set_high(&mut self) {
        self.high.set(true);
    }

    fn set_low(&mut self) {
        if self.high.get() {
            self.falls.set(self.falls.get() + 1);
        }
        self.high.set(false);
    }

    fn is_set_high(&self) -> bool {
        self.high.get()
    }
}

pub type TestCoprocessor = Coprocessor<MockLink, SharedPin, SharedPin>;

/// A driver on a fresh mock link, plus handles to observe it
pub struct Rig {
    pub link: MockLink,
    pub cs: SharedPin,
    pub extra: SharedPin,
    pub driver: TestCoprocessor,
}

impl Rig {
    pub fn new(config: DriverConfig) -> Self {
        let link = MockLink::new();
        let cs = SharedPin::new();
        let extra = SharedPin::new();
        let driver = Coprocessor::new(link.clone(), cs.clone(), extra.clone(), config);
        Self {
            link,
            cs,
            extra,
            driver,
        }
    }

    /// Driver with the initial image already pushed and traffic forgotten
    pub fn settled(config: DriverConfig) -> Self {
        let mut rig = Self::new(config);
        rig.driver
            .update(badgelink_protocol::ResponseMask::NONE)
            .expect("mock bus");
        rig.link.clear();
        rig
    }
}
