//! Output groups and their dirty set

use badgelink_protocol::opcodes::{OP_BLING, OP_DIM, OP_PULSE, OP_PULSE_LENGTH, OP_TRANSITION};

/// A block of outputs that is always transmitted as one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputGroup {
    /// Ambient animation block
    Bling,
    /// Per-LED pulse lengths
    PulseLength,
    /// Per-LED transition lengths
    Transition,
    /// Per-LED brightness
    Dim,
    /// Per-LED pulse period
    Pulse,
}

impl OutputGroup {
    /// Transmit order within a transaction
    ///
    /// Pulse lengths go before the transition table because transitions do
    /// not apply to them; the transition table must precede the values it
    /// modifies.
    pub const TX_ORDER: [OutputGroup; 5] = [
        OutputGroup::Bling,
        OutputGroup::PulseLength,
        OutputGroup::Transition,
        OutputGroup::Dim,
        OutputGroup::Pulse,
    ];

    /// Wire opcode for this group
    pub fn opcode(self) -> u8 {
        match self {
            OutputGroup::Bling => OP_BLING,
            OutputGroup::PulseLength => OP_PULSE_LENGTH,
            OutputGroup::Transition => OP_TRANSITION,
            OutputGroup::Dim => OP_DIM,
            OutputGroup::Pulse => OP_PULSE,
        }
    }

    fn bit(self) -> u8 {
        match self {
            OutputGroup::Bling => 0x01,
            OutputGroup::PulseLength => 0x02,
            OutputGroup::Transition => 0x04,
            OutputGroup::Dim => 0x08,
            OutputGroup::Pulse => 0x10,
        }
    }
}

/// Set of output groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputGroups(u8);

impl OutputGroups {
    /// Empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every group
    pub const fn all() -> Self {
        Self(0x1f)
    }

    /// Add a group
    pub fn insert(&mut self, group: OutputGroup) {
        self.0 |= group.bit();
    }

    /// Remove a group
    pub fn remove(&mut self, group: OutputGroup) {
        self.0 &= !group.bit();
    }

    /// Membership test
    pub fn contains(self, group: OutputGroup) -> bool {
        self.0 & group.bit() != 0
    }

    /// True if no group is present
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Groups present, in transmit order
    pub fn iter(self) -> impl Iterator<Item = OutputGroup> {
        OutputGroup::TX_ORDER
            .into_iter()
            .filter(move |g| self.contains(*g))
    }
}

impl FromIterator<OutputGroup> for OutputGroups {
    fn from_iter<I: IntoIterator<Item = OutputGroup>>(iter: I) -> Self {
        let mut set = Self::empty();
        for group in iter {
            set.insert(group);
        }
        set
    }
}
