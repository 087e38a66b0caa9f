//! End-to-end transaction behaviour through the public driver API

mod support;

use badgelink_core::channels::TRANS_IN_FLIGHT;
use badgelink_core::{ButtonId, DriverConfig, FilterMode, OutputGroup, PowerRail};
use badgelink_drivers::LinkError;
use badgelink_protocol::opcodes::{
    OP_BLING, OP_DIM, OP_PULSE, OP_PULSE_LENGTH, OP_TRANSITION,
};
use badgelink_protocol::{PowerReport, ResponseMask, TouchReport};
use support::{BusFault, Rig};

fn touch(averages: [u16; 5]) -> TouchReport {
    TouchReport {
        pressed_mask: 0,
        counters: [0; 5],
        averages,
    }
}

#[test]
fn test_fade_in_scenario() {
    let mut rig = Rig::settled(DriverConfig::default());

    rig.driver.set_pixel_transition(0, 255, 16);
    let report = rig.driver.update(ResponseMask::NONE).unwrap();

    assert_eq!(rig.link.sent_opcodes(), vec![OP_TRANSITION, OP_DIM]);
    let sent = rig.link.sent();
    assert_eq!(sent[0].payload[0], 16);
    assert_eq!(sent[1].payload[0], 255);
    assert!(report.sent.contains(OutputGroup::Transition));
    assert_eq!(rig.driver.transition(0), TRANS_IN_FLIGHT);

    rig.link.clear();
    let report = rig.driver.update(ResponseMask::NONE).unwrap();
    assert!(report.sent.is_empty());
    assert!(rig.link.sent().is_empty());
}

#[test]
fn test_update_is_idempotent() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.driver.bling_heartbeat(4, 20);
    rig.driver.set_pulse_transition(5, 40, 8);

    rig.driver.update(ResponseMask::NONE).unwrap();
    assert_eq!(
        rig.link.sent_opcodes(),
        vec![OP_BLING, OP_PULSE_LENGTH, OP_TRANSITION, OP_DIM, OP_PULSE]
    );

    rig.link.clear();
    rig.driver.update(ResponseMask::NONE).unwrap();
    assert!(rig.link.sent_opcodes().is_empty());
}

#[test]
fn test_update_clears_only_what_it_sent() {
    let mut rig = Rig::settled(DriverConfig::default());
    rig.driver.set_pulse_length(3, 25);
    rig.driver.set_pixel(1, 7);

    let report = rig.driver.update(ResponseMask::NONE).unwrap();
    assert_eq!(
        report.sent,
        [OutputGroup::PulseLength, OutputGroup::Dim].into_iter().collect()
    );
    assert!(rig.driver.state().dirty().is_empty());
    assert_eq!(rig.link.sent()[0].payload[3], 25);
}

#[test]
fn test_select_framed_per_update() {
    let mut rig = Rig::settled(DriverConfig::default());
    assert!(rig.cs.is_high());
    let before = rig.cs.falls();

    rig.driver.update(ResponseMask::NONE).unwrap();
    rig.driver.update(ResponseMask::NONE).unwrap();
    assert_eq!(rig.cs.falls(), before + 2);
    assert!(rig.cs.is_high());
}

#[test]
fn test_bus_fault_mid_packet() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.link.fail_after(20);

    let err = rig.driver.update(ResponseMask::NONE).unwrap_err();
    assert_eq!(err, LinkError::Bus(BusFault));
    assert!(rig.cs.is_high());
    // Bling got out, pulse lengths did not
    assert_eq!(rig.link.sent_opcodes(), vec![OP_BLING]);
    assert!(!rig.driver.state().dirty().contains(OutputGroup::Bling));
    assert!(rig.driver.state().dirty().contains(OutputGroup::PulseLength));
}

#[test]
fn test_reports_arrive_during_commands() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.link.queue(&PowerReport {
        raw: [900, 700, 0, 0, 0],
    }
    .to_packet());

    let report = rig.driver.update(ResponseMask::POWER).unwrap();
    assert!(report.is_complete());
    assert_eq!(rig.driver.power_millivolts(PowerRail::Usb), 4950);
    assert_eq!(rig.driver.power_millivolts(PowerRail::Lipo), 3850);
    // No filler needed after the four initial groups
    assert_eq!(rig.link.clocked(), 4 * 17);
}

#[test]
fn test_noise_between_reports_is_dropped() {
    let mut rig = Rig::settled(DriverConfig::default());
    rig.link.queue(&badgelink_protocol::Packet::from_block(0x55, [0x11; 15]));
    rig.link.queue(&PowerReport { raw: [10; 5] }.to_packet());

    let report = rig.driver.update(ResponseMask::POWER).unwrap();
    assert!(report.is_complete());
    assert_eq!(rig.driver.power_millivolts(PowerRail::Aa), 55);
}

#[test]
fn test_missing_report_times_out_softly() {
    let mut rig = Rig::settled(DriverConfig::default().with_rx_budget(40));
    let report = rig
        .driver
        .update(ResponseMask::BUTTONS | ResponseMask::POWER)
        .unwrap();
    assert_eq!(report.missing, ResponseMask::BUTTONS | ResponseMask::POWER);
    assert_eq!(rig.link.clocked(), 40);
}

#[test]
fn test_local_press_and_release_through_link() {
    let mut rig = Rig::settled(DriverConfig::default());
    for _ in 0..1000 {
        rig.link.queue(&touch([16000; 5]).to_packet());
        rig.driver.update(ResponseMask::BUTTONS).unwrap();
    }

    let mut down = [16000; 5];
    down[ButtonId::Right.slot()] = 4000;
    rig.link.queue(&touch(down).to_packet());
    rig.driver.update(ResponseMask::BUTTONS).unwrap();
    rig.link.queue(&touch([16000; 5]).to_packet());
    rig.driver.update(ResponseMask::BUTTONS).unwrap();

    assert!(rig.driver.is_currently_pressed(ButtonId::Right));
    assert_eq!(rig.driver.next_button_event(), Some(ButtonId::Right));
    assert_eq!(rig.driver.next_button_event(), None);
    assert_eq!(
        rig.driver.touch().acked_count(ButtonId::Right),
        rig.driver.touch().raw_count(ButtonId::Right)
    );
}

#[test]
fn test_navigation_history_packing() {
    let mut rig = Rig::settled(DriverConfig::default().with_filter_mode(FilterMode::Upstream));
    let mut counters = [0u8; 5];

    for button in [ButtonId::Up, ButtonId::Select, ButtonId::Left] {
        counters[button.slot()] += 1;
        rig.link.queue(
            &TouchReport {
                pressed_mask: button.bit(),
                counters,
                averages: [0; 5],
            }
            .to_packet(),
        );
        rig.driver.update(ResponseMask::BUTTONS).unwrap();
        assert_eq!(rig.driver.next_button_event(), Some(button));
    }

    let history = rig.driver.nav_history(3);
    assert_eq!(history & 0b111, 1);
    assert_eq!((history >> 3) & 0b111, 5);
    assert_eq!((history >> 6) & 0b111, 2);
}

#[test]
fn test_upstream_level_latch() {
    let mut rig = Rig::settled(DriverConfig::default().with_filter_mode(FilterMode::Upstream));
    assert!(!rig.driver.is_local_filtering());

    rig.link.queue(
        &TouchReport {
            pressed_mask: ButtonId::Down.bit(),
            counters: [0, 0, 0, 1, 0],
            averages: [0; 5],
        }
        .to_packet(),
    );
    rig.driver.update(ResponseMask::BUTTONS).unwrap();
    rig.link.queue(&touch([0; 5]).to_packet());
    rig.driver.update(ResponseMask::BUTTONS).unwrap();

    // Released before the query, still reported once
    assert!(rig.driver.is_currently_pressed(ButtonId::Down));
    rig.link.queue(&touch([0; 5]).to_packet());
    rig.driver.update(ResponseMask::BUTTONS).unwrap();
    assert!(!rig.driver.is_currently_pressed(ButtonId::Down));
}

#[test]
fn test_begin_pushes_defaults() {
    let mut rig = Rig::new(DriverConfig::default());
    rig.driver.enable_extra_channels();
    rig.driver.set_pixel(4, 90);
    rig.link.queue(&touch([16000; 5]).to_packet());
    rig.link.queue(&PowerReport { raw: [1; 5] }.to_packet());

    let report = rig.driver.begin().unwrap();
    assert!(report.is_complete());
    assert!(rig.extra.is_high());
    assert!(!rig.driver.extra_channels_enabled());
    assert_eq!(rig.driver.pixel(4), 0);
    assert_eq!(rig.driver.pulse_length(4), 10);

    let sent = rig.link.sent();
    assert_eq!(sent.len(), 4);
    assert!(sent.iter().find(|p| p.opcode == OP_DIM).unwrap().payload.iter().all(|&b| b == 0));
}
