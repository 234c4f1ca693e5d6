//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

use crate::bus::Ack;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Fehler-Typ für Display-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    WriteFailed,
}

/// Eine einzelne Busleitung (SCL oder SDA)
///
/// Die Leitung wird entweder aktiv getrieben (Ausgang) oder freigegeben
/// (Eingang, der externe Pull-up hält sie dann High).
///
/// # Implementierungen
/// - **Production:** FlexLine (ESP32 GPIO im Flex-Modus)
/// - **Testing:** SimLine (simuliertes EEPROM am Bus)
pub trait BusLine {
    /// Treibt die Leitung aktiv auf den gegebenen Pegel
    fn drive(&mut self, high: bool);

    /// Gibt die Leitung frei (hochohmig)
    fn release(&mut self);

    /// Liest den tatsächlichen Pegel der Leitung
    fn is_high(&mut self) -> bool;
}

/// Framing-Primitive eines seriellen Single-Master-Busses
///
/// Wird vom `BitBangedBus` implementiert; der `EepromStore` kennt nur
/// diese Schnittstelle.
pub trait SerialBus {
    /// Start-Bedingung (auch als Repeated Start nutzbar)
    fn start(&mut self);

    /// Stop-Bedingung, gibt beide Leitungen frei
    fn stop(&mut self);

    /// Schreibt ein Byte (MSB zuerst) und liefert das ACK/NAK des Empfängers
    fn write_byte(&mut self, byte: u8) -> Ack;

    /// Liest ein Byte und quittiert es mit `ack`
    fn read_byte(&mut self, ack: Ack) -> u8;

    /// Blockierende Wartezeit in Millisekunden
    fn wait_ms(&mut self, ms: u32);
}

/// Zwei-Bit-Eingang des Drehgebers
///
/// Pin N liefert Bit 0, Pin N+1 liefert Bit 1.
pub trait EncoderInput {
    /// Liest beide Leitungen gleichzeitig als Wert 0..=3
    fn sample(&mut self) -> u8;
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf einen RGB LED-Streifen (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter {
    /// Schreibt alle Pixel auf den Streifen
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}

/// Zeichen-Display für das Menü (2 Zeilen LCD)
pub trait MenuDisplay {
    /// Schreibt `text` ab Zeile `row`, Spalte `col`
    fn put_str(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;
}
