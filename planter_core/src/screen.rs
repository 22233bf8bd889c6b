//! The wizard's screen catalogue and the screen → frame mapping.

use planter_traits::Frame;

use crate::session::CalibrationSession;

/// Every screen the wizard can show. A closed set so that transition and
/// render logic are exhaustive matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Connect,
    Menu,
    CalClose,
    CalOpen,
    Verify,
    SerialNumber,
    HwRevision,
    Confirm,
    Disconnect,
    Flash,
}

impl Screen {
    /// Number of selectable options, 0 for screens without a cursor.
    pub fn option_count(self) -> u32 {
        match self {
            Screen::Menu | Screen::Confirm => 2,
            Screen::Verify => 4,
            _ => 0,
        }
    }
}

/// Decide the text frame for the current screen and session values. The
/// renderer owns layout details beyond the line text and cursor position.
pub fn frame(session: &CalibrationSession) -> Frame {
    match session.screen {
        Screen::Connect => Frame::new("Connect Floower", ""),
        Screen::Menu => {
            let row = session.option() as u8;
            Frame::new(" Calibrate", " Flash firmware").with_cursor(row, 0)
        }
        Screen::CalClose => {
            Frame::new("Closed", session.close_value.to_string()).with_cursor(1, 15)
        }
        Screen::CalOpen => Frame::new("Open", session.open_value.to_string()).with_cursor(1, 15),
        Screen::Verify => {
            let frame = Frame::new(" Close        Ok", " Open      Again");
            match session.option() {
                0 => frame.with_cursor(0, 0),
                1 => frame.with_cursor(1, 0),
                2 => frame.with_cursor(0, 13),
                _ => frame.with_cursor(1, 10),
            }
        }
        Screen::SerialNumber => {
            Frame::new("Serial Number", session.serial_number.to_string()).with_cursor(1, 15)
        }
        Screen::HwRevision => {
            Frame::new("HW Revision", session.hardware_revision.to_string()).with_cursor(1, 15)
        }
        Screen::Confirm => {
            let row = session.option() as u8;
            Frame::new(" Write", " Again").with_cursor(row, 0)
        }
        Screen::Disconnect => Frame::new("Disconnect", ""),
        Screen::Flash => Frame::new("Flashing ...", ""),
    }
}
