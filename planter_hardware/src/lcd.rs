//! HD44780 16x2 character display in 4-bit GPIO mode.
//!
//! Just enough of the controller's command set for the wizard frames: init,
//! clear, cursor placement, text. The marker glyph 0x7E is the controller's
//! right-arrow character.

use std::thread::sleep;
use std::time::Duration;

use planter_traits::{BoxError, Frame, Renderer};
use rppal::gpio::{Gpio, OutputPin};

use crate::error::HwError;

const MARKER: u8 = 0x7E;
const COLUMNS: usize = 16;

pub struct CharLcd {
    rs: OutputPin,
    en: OutputPin,
    data: [OutputPin; 4],
    _backlight: Option<OutputPin>,
}

impl CharLcd {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rs: u8,
        en: u8,
        d4: u8,
        d5: u8,
        d6: u8,
        d7: u8,
        backlight: Option<u8>,
    ) -> Result<Self, HwError> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let claim = |pin: u8| -> Result<OutputPin, HwError> {
            Ok(gpio
                .get(pin)
                .map_err(|e| HwError::Gpio(e.to_string()))?
                .into_output_low())
        };
        let backlight = match backlight {
            Some(pin) => {
                let mut p = claim(pin)?;
                p.set_high();
                Some(p)
            }
            None => None,
        };
        let mut lcd = Self {
            rs: claim(rs)?,
            en: claim(en)?,
            data: [claim(d4)?, claim(d5)?, claim(d6)?, claim(d7)?],
            _backlight: backlight,
        };
        lcd.init();
        Ok(lcd)
    }

    fn pulse_enable(&mut self) {
        self.en.set_high();
        sleep(Duration::from_micros(1));
        self.en.set_low();
        sleep(Duration::from_micros(100));
    }

    fn write4(&mut self, nibble: u8) {
        for (i, pin) in self.data.iter_mut().enumerate() {
            if nibble & (1 << i) != 0 {
                pin.set_high();
            } else {
                pin.set_low();
            }
        }
        self.pulse_enable();
    }

    fn send(&mut self, byte: u8, is_data: bool) {
        if is_data {
            self.rs.set_high();
        } else {
            self.rs.set_low();
        }
        self.write4(byte >> 4);
        self.write4(byte & 0x0F);
    }

    fn command(&mut self, cmd: u8) {
        self.send(cmd, false);
        sleep(Duration::from_micros(50));
    }

    fn init(&mut self) {
        // Forced 8-bit resets, then switch to 4-bit mode.
        sleep(Duration::from_millis(50));
        self.write4(0x03);
        sleep(Duration::from_millis(5));
        self.write4(0x03);
        sleep(Duration::from_millis(5));
        self.write4(0x03);
        sleep(Duration::from_millis(1));
        self.write4(0x02);

        self.command(0x28); // 2 lines, 5x8 font
        self.command(0x0C); // display on, cursor off
        self.command(0x06); // entry mode: increment, no shift
        self.clear();
    }

    fn clear(&mut self) {
        self.command(0x01);
        sleep(Duration::from_millis(2));
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        let base = if row == 0 { 0x80 } else { 0xC0 };
        self.command(base + col.min(15));
    }

    fn print(&mut self, text: &str) {
        for b in text.bytes().take(COLUMNS) {
            self.send(b, true);
        }
    }
}

impl Renderer for CharLcd {
    fn draw(&mut self, frame: &Frame) -> Result<(), BoxError> {
        self.clear();
        self.set_cursor(0, 0);
        self.print(&frame.line0);
        self.set_cursor(1, 0);
        self.print(&frame.line1);
        if let Some((row, col)) = frame.cursor {
            self.set_cursor(row, col);
            self.send(MARKER, true);
        }
        Ok(())
    }
}
