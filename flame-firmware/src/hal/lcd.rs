// Serielles LCD (Parallax 2x16) am UART
//
// Das Display versteht einzelne Steuerbytes; alles andere ist Text.

use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::uart::Uart;
use flame_core::{DisplayError, MenuDisplay};

const LCD_CLEAR: u8 = 0x0C;
const LCD_BACKLIGHT_ON: u8 = 0x11;
const LCD_CURSOR_OFF_NO_BLINK: u8 = 0x16;

/// Cursor auf Zeile 0, Spalte 0; jede Zeile ist 20 Adressen lang
const LCD_MOVE_TO: u8 = 0x80;
const LCD_ROW_STRIDE: u8 = 20;

/// Das Display braucht nach dem Löschen eine Pause
const LCD_CLEAR_DELAY_MS: u32 = 5;

pub struct SerialLcd<'d> {
    uart: Uart<'d, Blocking>,
}

impl<'d> SerialLcd<'d> {
    pub fn new(uart: Uart<'d, Blocking>) -> Self {
        Self { uart }
    }

    /// Löscht das Display, Cursor aus, Hintergrundbeleuchtung an
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.send(&[LCD_CLEAR])?;
        Delay::new().delay_millis(LCD_CLEAR_DELAY_MS);
        self.send(&[LCD_CURSOR_OFF_NO_BLINK, LCD_BACKLIGHT_ON])
    }

    fn send(&mut self, mut bytes: &[u8]) -> Result<(), DisplayError> {
        // write() nimmt nur so viel, wie in den FIFO passt
        while !bytes.is_empty() {
            let written = self
                .uart
                .write(bytes)
                .map_err(|_| DisplayError::WriteFailed)?;
            bytes = &bytes[written..];
        }
        self.uart.flush().map_err(|_| DisplayError::WriteFailed)
    }
}

impl MenuDisplay for SerialLcd<'_> {
    fn put_str(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        self.send(&[LCD_MOVE_TO + row * LCD_ROW_STRIDE + col])?;
        self.send(text.as_bytes())
    }
}
