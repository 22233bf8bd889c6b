//! Screen-by-screen wizard behavior.

use planter_core::wizard::{self, Effect};
use planter_core::{CalibrationSession, Command, InputEvent, Screen};
use rstest::rstest;

fn connected() -> CalibrationSession {
    let mut s = CalibrationSession::new(130, 7);
    s.on_connected();
    s
}

fn sent(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Send(cmd) => Some(cmd.encode()),
            _ => None,
        })
        .collect()
}

fn press(s: &mut CalibrationSession) -> Vec<Effect> {
    wizard::transition(s, InputEvent::ButtonPress)
}

fn spin(s: &mut CalibrationSession, ev: InputEvent, times: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for _ in 0..times {
        lines.extend(sent(&wizard::transition(s, ev)));
    }
    lines
}

#[rstest]
#[case(InputEvent::RotateUp, 1)]
#[case(InputEvent::RotateDown, 1)]
fn menu_rotation_toggles_between_two_entries(#[case] ev: InputEvent, #[case] expected: u32) {
    let mut s = connected();
    assert_eq!(s.option(), 0);
    wizard::transition(&mut s, ev);
    assert_eq!(s.option(), expected);
    wizard::transition(&mut s, ev);
    assert_eq!(s.option(), 0);
}

#[test]
fn menu_press_enters_calibration_with_defaults() {
    let mut s = connected();
    let effects = press(&mut s);
    assert_eq!(s.screen, Screen::CalClose);
    assert_eq!(s.close_value, 1000);
    assert!(!s.open_is_seeded());
    assert!(sent(&effects).is_empty());
}

#[test]
fn menu_flash_entry_requests_firmware_write() {
    let mut s = connected();
    wizard::transition(&mut s, InputEvent::RotateUp);
    let effects = press(&mut s);
    assert_eq!(s.screen, Screen::Flash);
    assert!(effects.iter().any(|e| matches!(e, Effect::FlashFirmware)));
}

#[test]
fn close_value_saturates_at_both_ends() {
    let mut s = connected();
    press(&mut s);

    // 1000 -> 2000 takes 100 steps; 50 extra turns must not overshoot
    spin(&mut s, InputEvent::RotateUp, 150);
    assert_eq!(s.close_value, 2000);
    let at_max = spin(&mut s, InputEvent::RotateUp, 1);
    assert_eq!(at_max, vec!["C2000\n"]);

    spin(&mut s, InputEvent::RotateDown, 200);
    assert_eq!(s.close_value, 600);
}

#[test]
fn every_close_adjustment_is_sent_live() {
    let mut s = connected();
    press(&mut s);
    let lines = spin(&mut s, InputEvent::RotateUp, 3);
    assert_eq!(lines, vec!["C1010\n", "C1020\n", "C1030\n"]);
}

#[test]
fn open_is_seeded_above_close_and_capped() {
    let mut s = connected();
    press(&mut s);
    spin(&mut s, InputEvent::RotateUp, 80); // close = 1800
    press(&mut s);
    assert_eq!(s.screen, Screen::CalOpen);
    assert_eq!(s.open_value, 2000); // 1800 + 500 capped
}

#[test]
fn open_value_never_drops_below_close() {
    let mut s = connected();
    press(&mut s); // CalClose, close = 1000
    press(&mut s); // CalOpen, open = 1500
    spin(&mut s, InputEvent::RotateDown, 200);
    assert_eq!(s.open_value, s.close_value);
}

#[test]
fn lowering_close_after_seeding_keeps_open_valid() {
    let mut s = connected();
    press(&mut s);
    spin(&mut s, InputEvent::RotateUp, 100); // close = 2000
    press(&mut s); // open seeded at 2000
    wizard::transition(&mut s, InputEvent::ButtonPress); // -> Verify
    press_back_to_close(&mut s);
    spin(&mut s, InputEvent::RotateDown, 10); // close = 1900
    assert!(s.open_value >= s.close_value);
}

fn press_back_to_close(s: &mut CalibrationSession) {
    // Verify option 3 is "Again"
    wizard::transition(s, InputEvent::RotateDown);
    wizard::transition(s, InputEvent::ButtonPress);
    assert_eq!(s.screen, Screen::CalClose);
}

#[rstest]
#[case(0, Command::close(1000), Screen::Verify)]
#[case(1, Command::open(1500), Screen::Verify)]
#[case(2, Command::close(1000), Screen::SerialNumber)]
fn verify_options_replay_positions(
    #[case] option: u32,
    #[case] expected: Command,
    #[case] after: Screen,
) {
    let mut s = connected();
    press(&mut s); // CalClose
    press(&mut s); // CalOpen, open = 1500
    press(&mut s); // Verify
    for _ in 0..option {
        wizard::transition(&mut s, InputEvent::RotateUp);
    }
    let effects = press(&mut s);
    assert_eq!(sent(&effects), vec![expected.encode()]);
    assert_eq!(s.screen, after);
}

#[test]
fn verify_again_returns_to_close_without_sending() {
    let mut s = connected();
    press(&mut s);
    press(&mut s);
    press(&mut s); // Verify
    wizard::transition(&mut s, InputEvent::RotateDown); // wraps to option 3
    let effects = press(&mut s);
    assert!(sent(&effects).is_empty());
    assert_eq!(s.screen, Screen::CalClose);
}

#[test]
fn serial_number_never_goes_negative() {
    let mut s = CalibrationSession::new(1, 7);
    s.on_connected();
    walk_to_serial(&mut s);
    spin(&mut s, InputEvent::RotateDown, 5);
    assert_eq!(s.serial_number, 0);
}

#[test]
fn hardware_revision_is_clamped() {
    let mut s = connected();
    walk_to_serial(&mut s);
    press(&mut s); // -> HwRevision, rev = 7
    spin(&mut s, InputEvent::RotateUp, 30);
    assert_eq!(s.hardware_revision, 20);
    spin(&mut s, InputEvent::RotateDown, 40);
    assert_eq!(s.hardware_revision, 0);
}

fn walk_to_serial(s: &mut CalibrationSession) {
    press(s); // CalClose
    press(s); // CalOpen
    press(s); // Verify
    wizard::transition(s, InputEvent::RotateUp);
    wizard::transition(s, InputEvent::RotateUp); // option 2: Ok
    press(s); // -> SerialNumber
    assert_eq!(s.screen, Screen::SerialNumber);
}

#[test]
fn confirm_again_loops_back_without_finalizing() {
    let mut s = connected();
    walk_to_serial(&mut s);
    press(&mut s); // -> HwRevision
    press(&mut s); // -> Confirm
    wizard::transition(&mut s, InputEvent::RotateUp); // option 1: Again
    let effects = press(&mut s);
    assert!(sent(&effects).is_empty());
    assert_eq!(s.screen, Screen::CalClose);
    assert_eq!(s.serial_number, 130);
}

#[test]
fn full_calibration_run_emits_commands_in_order() {
    let mut s = connected();
    let mut lines = Vec::new();
    let mut step = |s: &mut CalibrationSession, ev| {
        lines.extend(sent(&wizard::transition(s, ev)));
    };

    step(&mut s, InputEvent::ButtonPress); // calibrate
    step(&mut s, InputEvent::RotateDown); // close 990
    step(&mut s, InputEvent::ButtonPress); // open seeded 1490
    step(&mut s, InputEvent::RotateUp); // open 1500
    step(&mut s, InputEvent::ButtonPress); // verify
    step(&mut s, InputEvent::RotateUp);
    step(&mut s, InputEvent::RotateUp); // option 2: Ok
    step(&mut s, InputEvent::ButtonPress); // -> serial number
    step(&mut s, InputEvent::RotateUp); // 131
    step(&mut s, InputEvent::ButtonPress); // -> hw revision
    step(&mut s, InputEvent::ButtonPress); // -> confirm
    step(&mut s, InputEvent::ButtonPress); // write

    assert_eq!(
        lines,
        vec!["C990\n", "O1500\n", "C990\n", "N131\n", "H7\n", "E0\n"]
    );
    assert_eq!(s.screen, Screen::Disconnect);
    // Next unit continues the numbering.
    assert_eq!(s.serial_number, 132);
}

#[test]
fn reset_keeps_identity_but_restores_positions() {
    let mut s = connected();
    press(&mut s);
    spin(&mut s, InputEvent::RotateUp, 3);
    s.serial_number = 140;
    s.reset();
    assert_eq!(s.screen, Screen::Connect);
    assert_eq!(s.close_value, 1000);
    assert_eq!(s.open_value, 1000);
    assert_eq!(s.option(), 0);
    assert_eq!(s.serial_number, 140);
}

#[rstest]
#[case(Screen::Connect)]
#[case(Screen::Disconnect)]
#[case(Screen::Flash)]
fn passive_screens_ignore_rotation(#[case] screen: Screen) {
    let mut s = connected();
    s.screen = screen;
    let before = s.clone();
    let effects = wizard::transition(&mut s, InputEvent::RotateUp);
    assert!(sent(&effects).is_empty());
    assert_eq!(s.close_value, before.close_value);
    assert_eq!(s.screen, before.screen);
}

#[test]
fn finish_flash_returns_to_menu() {
    let mut s = connected();
    wizard::transition(&mut s, InputEvent::RotateUp);
    press(&mut s); // -> Flash
    let effects = wizard::finish_flash(&mut s);
    assert_eq!(s.screen, Screen::Menu);
    assert_eq!(s.option(), 0);
    assert!(effects.iter().any(|e| matches!(e, Effect::Redraw)));
}
