//! The mutable calibration data model for one connected device.

use crate::screen::Screen;

/// Lowest closed position the actuator accepts.
pub const CLOSE_MIN: i32 = 600;
/// Highest position value for either direction.
pub const POSITION_MAX: i32 = 2000;
/// Encoder step applied to position values per detent.
pub const POSITION_STEP: i32 = 10;
/// Position both values reset to on connect/disconnect.
pub const POSITION_DEFAULT: i32 = 1000;
/// Offset used to seed the open position from the closed one.
pub const OPEN_SEED_OFFSET: i32 = 500;
/// Highest hardware revision the provisioning protocol knows.
pub const HW_REVISION_MAX: i32 = 20;

/// Calibration state for the unit currently on the bench.
///
/// Mutated exclusively by wizard transitions; one logical session exists per
/// connected device and is reset (not dropped) on disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationSession {
    pub screen: Screen,
    /// Raw cursor; read modulo the active screen's option count. The counts
    /// are powers of two, so u32 wrap-around keeps the modulo consistent
    /// when rotating below zero.
    pub screen_option: u32,
    pub close_value: i32,
    pub open_value: i32,
    pub serial_number: i32,
    pub hardware_revision: i32,
}

impl CalibrationSession {
    /// New session showing the connect prompt. Serial number and hardware
    /// revision come from configuration and persist across resets so that
    /// consecutive units continue the numbering.
    pub fn new(serial_number: i32, hardware_revision: i32) -> Self {
        Self {
            screen: Screen::Connect,
            screen_option: 0,
            close_value: POSITION_DEFAULT,
            open_value: POSITION_DEFAULT,
            serial_number: serial_number.max(0),
            hardware_revision: hardware_revision.clamp(0, HW_REVISION_MAX),
        }
    }

    /// Back to the connect prompt with default positions. Invoked on startup
    /// and whenever the link reports loss.
    pub fn reset(&mut self) {
        self.screen = Screen::Connect;
        self.close_value = POSITION_DEFAULT;
        self.open_value = POSITION_DEFAULT;
        self.screen_option = 0;
    }

    /// Device discovered: show the menu.
    pub fn on_connected(&mut self) {
        self.screen = Screen::Menu;
        self.screen_option = 0;
    }

    /// Effective cursor position on the current screen, or 0 when the screen
    /// has no options.
    pub fn option(&self) -> u32 {
        match self.screen.option_count() {
            0 => 0,
            n => self.screen_option % n,
        }
    }

    /// An open value of 0 is the not-yet-seeded sentinel that exists between
    /// the menu's calibrate action and the close→open handoff.
    pub fn open_is_seeded(&self) -> bool {
        self.open_value != 0
    }

    /// Check the value-range invariants; used by tests and debug assertions.
    pub fn invariants_hold(&self) -> bool {
        let open_ok = !self.open_is_seeded()
            || (self.close_value..=POSITION_MAX).contains(&self.open_value);
        (CLOSE_MIN..=POSITION_MAX).contains(&self.close_value)
            && open_ok
            && (0..=HW_REVISION_MAX).contains(&self.hardware_revision)
            && self.serial_number >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_on_connect_with_defaults() {
        let s = CalibrationSession::new(130, 7);
        assert_eq!(s.screen, Screen::Connect);
        assert_eq!(s.close_value, POSITION_DEFAULT);
        assert_eq!(s.open_value, POSITION_DEFAULT);
        assert!(s.invariants_hold());
    }

    #[test]
    fn new_session_clamps_out_of_range_identity() {
        let s = CalibrationSession::new(-5, 99);
        assert_eq!(s.serial_number, 0);
        assert_eq!(s.hardware_revision, HW_REVISION_MAX);
    }

    #[test]
    fn reset_preserves_identity_fields() {
        let mut s = CalibrationSession::new(130, 7);
        s.screen = Screen::Verify;
        s.close_value = 700;
        s.open_value = 1500;
        s.serial_number = 151;
        s.reset();
        assert_eq!(s.screen, Screen::Connect);
        assert_eq!(s.close_value, POSITION_DEFAULT);
        assert_eq!(s.open_value, POSITION_DEFAULT);
        assert_eq!(s.screen_option, 0);
        assert_eq!(s.serial_number, 151);
        assert_eq!(s.hardware_revision, 7);
    }

    #[test]
    fn option_wraps_under_decrement() {
        let mut s = CalibrationSession::new(0, 0);
        s.screen = Screen::Verify;
        s.screen_option = 0u32.wrapping_sub(1);
        assert_eq!(s.option(), 3);
    }
}
