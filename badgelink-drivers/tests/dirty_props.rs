//! Dirty tracking properties over arbitrary setter sequences

mod support;

use badgelink_core::{DriverConfig, OutputGroup};
use badgelink_protocol::ResponseMask;
use proptest::prelude::*;
use support::{Rig, TestCoprocessor};

#[derive(Debug, Clone)]
enum Setter {
    Pixel(u8, u8),
    PixelTransition(u8, u8, u8),
    Pulse(u8, u8),
    PulseLength(u8, u8),
    Sparkle(u8, u8),
}

impl Setter {
    fn apply(&self, driver: &mut TestCoprocessor) {
        match *self {
            Setter::Pixel(n, v) => driver.set_pixel(n, v),
            Setter::PixelTransition(n, v, t) => driver.set_pixel_transition(n, v, t),
            Setter::Pulse(n, v) => driver.set_pulse(n, v),
            Setter::PulseLength(n, v) => driver.set_pulse_length(n, v),
            Setter::Sparkle(s, f) => driver.bling_sparkle(s, f),
        }
    }

    /// Group the setter dirties when its index is in range
    fn group(&self) -> Option<OutputGroup> {
        match *self {
            Setter::Pixel(n, _) | Setter::PixelTransition(n, _, _) if n < 14 => {
                Some(OutputGroup::Dim)
            }
            Setter::Pulse(n, _) if n < 14 => Some(OutputGroup::Pulse),
            Setter::PulseLength(n, _) if n < 14 => Some(OutputGroup::PulseLength),
            Setter::Sparkle(..) => Some(OutputGroup::Bling),
            _ => None,
        }
    }
}

fn setter() -> impl Strategy<Value = Setter> {
    // Indices run a little past the last LED to cover the ignore path
    let n = 0u8..18;
    prop_oneof![
        (n.clone(), any::<u8>()).prop_map(|(n, v)| Setter::Pixel(n, v)),
        (n.clone(), any::<u8>(), 1u8..64).prop_map(|(n, v, t)| Setter::PixelTransition(n, v, t)),
        (n.clone(), any::<u8>()).prop_map(|(n, v)| Setter::Pulse(n, v)),
        (n, any::<u8>()).prop_map(|(n, v)| Setter::PulseLength(n, v)),
        (any::<u8>(), any::<u8>()).prop_map(|(s, f)| Setter::Sparkle(s, f)),
    ]
}

proptest! {
    #[test]
    fn second_update_sends_nothing(setters in prop::collection::vec(setter(), 0..24)) {
        let mut rig = Rig::settled(DriverConfig::default());
        for s in &setters {
            s.apply(&mut rig.driver);
        }

        rig.driver.update(ResponseMask::NONE).unwrap();
        prop_assert!(rig.driver.state().dirty().is_empty());

        rig.link.clear();
        let report = rig.driver.update(ResponseMask::NONE).unwrap();
        prop_assert!(report.sent.is_empty());
        prop_assert_eq!(rig.link.clocked(), 0);
    }

    #[test]
    fn setter_dirties_only_its_group(s in setter()) {
        let mut rig = Rig::settled(DriverConfig::default());
        s.apply(&mut rig.driver);

        let dirty = rig.driver.state().dirty();
        let expected: badgelink_core::OutputGroups = s.group().into_iter().collect();
        let transition = matches!(s, Setter::PixelTransition(n, ..) if n < 14);

        for group in OutputGroup::TX_ORDER {
            let wanted = expected.contains(group)
                || (transition && group == OutputGroup::Transition);
            prop_assert_eq!(dirty.contains(group), wanted);
        }
    }
}
