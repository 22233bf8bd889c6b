//! Pure transition logic for the calibration wizard.
//!
//! Given the current session and one input event, `transition` mutates the
//! session under the value-range invariants and returns the side effects the
//! runner must perform. No I/O happens here, which is what makes the whole
//! wizard table testable without hardware.

use crate::protocol::Command;
use crate::screen::Screen;
use crate::session::{
    CalibrationSession, CLOSE_MIN, HW_REVISION_MAX, OPEN_SEED_OFFSET, POSITION_DEFAULT,
    POSITION_MAX, POSITION_STEP,
};

/// Inputs from the knob: two rotation directions and the push switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    RotateUp,
    RotateDown,
    ButtonPress,
}

/// Side effects a transition asks the runner to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Send(Command),
    Redraw,
    FlashFirmware,
}

/// Apply one input event. Every event ends with a redraw request, matching
/// the device's unconditional redraw after each knob callback.
pub fn transition(session: &mut CalibrationSession, event: InputEvent) -> Vec<Effect> {
    let mut effects = match event {
        InputEvent::RotateUp => rotate(session, 1),
        InputEvent::RotateDown => rotate(session, -1),
        InputEvent::ButtonPress => press(session),
    };
    effects.push(Effect::Redraw);
    debug_assert!(session.invariants_hold());
    effects
}

/// The firmware flash finished; back to the menu.
pub fn finish_flash(session: &mut CalibrationSession) -> Vec<Effect> {
    session.screen = Screen::Menu;
    session.screen_option = 0;
    vec![Effect::Redraw]
}

fn rotate(session: &mut CalibrationSession, direction: i32) -> Vec<Effect> {
    match session.screen {
        Screen::Menu | Screen::Verify | Screen::Confirm => {
            session.screen_option = if direction > 0 {
                session.screen_option.wrapping_add(1)
            } else {
                session.screen_option.wrapping_sub(1)
            };
            Vec::new()
        }
        Screen::CalClose => {
            session.close_value = (session.close_value + direction * POSITION_STEP)
                .clamp(CLOSE_MIN, POSITION_MAX);
            // On the retry path open is already seeded; drag it along so the
            // open >= close invariant survives a raised close.
            if session.open_is_seeded() {
                session.open_value = session.open_value.max(session.close_value);
            }
            vec![Effect::Send(Command::close(session.close_value))]
        }
        Screen::CalOpen => {
            session.open_value = (session.open_value + direction * POSITION_STEP)
                .clamp(session.close_value, POSITION_MAX);
            vec![Effect::Send(Command::open(session.open_value))]
        }
        Screen::SerialNumber => {
            session.serial_number = (session.serial_number + direction).max(0);
            Vec::new()
        }
        Screen::HwRevision => {
            session.hardware_revision =
                (session.hardware_revision + direction).clamp(0, HW_REVISION_MAX);
            Vec::new()
        }
        Screen::Connect | Screen::Disconnect | Screen::Flash => Vec::new(),
    }
}

fn press(session: &mut CalibrationSession) -> Vec<Effect> {
    match session.screen {
        Screen::Menu => match session.option() {
            0 => {
                session.screen = Screen::CalClose;
                session.close_value = POSITION_DEFAULT;
                session.open_value = 0;
                Vec::new()
            }
            _ => {
                session.screen = Screen::Flash;
                vec![Effect::FlashFirmware]
            }
        },
        Screen::CalClose => {
            session.screen = Screen::CalOpen;
            if !session.open_is_seeded() {
                session.open_value =
                    (session.close_value + OPEN_SEED_OFFSET).min(POSITION_MAX);
            }
            Vec::new()
        }
        Screen::CalOpen => {
            session.screen = Screen::Verify;
            session.screen_option = 0;
            Vec::new()
        }
        Screen::Verify => match session.option() {
            0 => vec![Effect::Send(Command::close(session.close_value))],
            1 => vec![Effect::Send(Command::open(session.open_value))],
            2 => {
                session.screen = Screen::SerialNumber;
                vec![Effect::Send(Command::close(session.close_value))]
            }
            _ => {
                session.screen = Screen::CalClose;
                Vec::new()
            }
        },
        Screen::SerialNumber => {
            session.screen = Screen::HwRevision;
            vec![Effect::Send(Command::serial_number(session.serial_number))]
        }
        Screen::HwRevision => {
            session.screen = Screen::Confirm;
            session.screen_option = 0;
            vec![Effect::Send(Command::hw_revision(session.hardware_revision))]
        }
        Screen::Confirm => match session.option() {
            0 => {
                session.screen = Screen::Disconnect;
                // Advance the numbering for the next unit on the bench.
                session.serial_number += 1;
                vec![Effect::Send(Command::finalize())]
            }
            _ => {
                session.screen = Screen::CalClose;
                Vec::new()
            }
        },
        Screen::Connect | Screen::Disconnect | Screen::Flash => Vec::new(),
    }
}
