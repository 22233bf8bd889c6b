#![no_main]
use libfuzzer_sys::fuzz_target;
use planter_core::wizard;
use planter_core::{CalibrationSession, InputEvent, Screen};

fuzz_target!(|data: &[u8]| {
    // Drive the wizard with an arbitrary knob event stream; the session must
    // stay within its documented ranges at every step.
    let mut session = CalibrationSession::new(130, 7);
    session.on_connected();
    for byte in data {
        if session.screen == Screen::Flash {
            wizard::finish_flash(&mut session);
        }
        let event = match byte % 3 {
            0 => InputEvent::RotateUp,
            1 => InputEvent::RotateDown,
            _ => InputEvent::ButtonPress,
        };
        wizard::transition(&mut session, event);
        assert!(session.invariants_hold());
    }
});
