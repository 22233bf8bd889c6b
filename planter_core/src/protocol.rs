//! The device-bound serial command protocol.
//!
//! ASCII lines of the shape `TAG` + decimal integer + `\n`, no checksum and
//! no acknowledgement. The device applies each value as it arrives.

use std::fmt;

/// Protocol tag for one outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTag {
    /// Set closed position (600-2000).
    Close,
    /// Set open position (close-2000).
    Open,
    /// Set serial number (>= 0).
    SerialNumber,
    /// Set hardware revision (0-20).
    HwRevision,
    /// Finalize calibration; value is always 0.
    Finalize,
}

impl CommandTag {
    pub fn letter(self) -> char {
        match self {
            CommandTag::Close => 'C',
            CommandTag::Open => 'O',
            CommandTag::SerialNumber => 'N',
            CommandTag::HwRevision => 'H',
            CommandTag::Finalize => 'E',
        }
    }
}

/// One immutable outbound protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub tag: CommandTag,
    pub value: i32,
}

impl Command {
    pub fn close(value: i32) -> Self {
        Self {
            tag: CommandTag::Close,
            value,
        }
    }

    pub fn open(value: i32) -> Self {
        Self {
            tag: CommandTag::Open,
            value,
        }
    }

    pub fn serial_number(value: i32) -> Self {
        Self {
            tag: CommandTag::SerialNumber,
            value,
        }
    }

    pub fn hw_revision(value: i32) -> Self {
        Self {
            tag: CommandTag::HwRevision,
            value,
        }
    }

    pub fn finalize() -> Self {
        Self {
            tag: CommandTag::Finalize,
            value: 0,
        }
    }

    /// Wire form, terminator included.
    pub fn encode(&self) -> String {
        format!("{}{}\n", self.tag.letter(), self.value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag.letter(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_terminator() {
        assert_eq!(Command::close(1000).encode(), "C1000\n");
        assert_eq!(Command::open(1500).encode(), "O1500\n");
        assert_eq!(Command::serial_number(130).encode(), "N130\n");
        assert_eq!(Command::hw_revision(7).encode(), "H7\n");
        assert_eq!(Command::finalize().encode(), "E0\n");
    }

    #[test]
    fn display_omits_terminator() {
        assert_eq!(Command::close(1000).to_string(), "C1000");
    }
}
