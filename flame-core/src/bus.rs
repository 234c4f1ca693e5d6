//! Bit-Bang I2C Bus
//!
//! Software-getakteter Single-Master-Bus über zwei GPIO-Leitungen.
//! Daten werden MSB zuerst übertragen und sind nur gültig solange SCL High ist.
//!
//! Nach jeder Operation (außer `stop`) gilt: SDA ist Low getrieben, SCL ist Low.
//! Dadurch lassen sich die Primitive ohne externe Buchführung kombinieren.

use embedded_hal::delay::DelayNs;

use crate::traits::{BusLine, SerialBus};

/// Halbe Taktperiode in Nanosekunden (~100 kHz Standard-Mode)
pub const BUS_HALF_PERIOD_NS: u32 = 5_000;

/// Maximale Anzahl Taktpulse um ein hängendes Gerät freizutakten
pub const RECOVERY_PULSES: usize = 9;

/// Quittung des Empfängers nach jedem Byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// SDA Low im neunten Takt
    Ack,
    /// SDA High im neunten Takt
    Nak,
}

impl Ack {
    pub fn is_ack(self) -> bool {
        self == Ack::Ack
    }
}

/// Bit-Bang Bus über zwei Leitungen
///
/// # Parameter
/// - `SCL`: Taktleitung
/// - `SDA`: Datenleitung
/// - `D`: Delay-Provider für das Bit-Timing
pub struct BitBangedBus<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
}

impl<SCL: BusLine, SDA: BusLine, D: DelayNs> BitBangedBus<SCL, SDA, D> {
    pub fn new(scl: SCL, sda: SDA, delay: D) -> Self {
        Self { scl, sda, delay }
    }

    /// Befreit ein Gerät, das nach einem Reset mitten in einer Übertragung
    /// SDA Low hält.
    ///
    /// Gibt bis zu 9 Taktpulse aus und bricht ab sobald SDA High ist.
    pub fn init(&mut self) {
        self.scl.drive(true);
        self.sda.release();
        self.half_period();

        for _ in 0..RECOVERY_PULSES {
            self.scl.drive(false);
            self.half_period();
            self.scl.drive(true);
            self.half_period();
            if self.sda.is_high() {
                break;
            }
        }
    }

    fn half_period(&mut self) {
        self.delay.delay_ns(BUS_HALF_PERIOD_NS);
    }

    /// Ein Taktpuls LOW → HIGH → LOW, gibt den Pegel von SDA während HIGH zurück
    fn clock_pulse(&mut self) -> bool {
        self.half_period();
        self.scl.drive(true);
        self.half_period();
        let level = self.sda.is_high();
        self.scl.drive(false);
        level
    }
}

impl<SCL: BusLine, SDA: BusLine, D: DelayNs> SerialBus for BitBangedBus<SCL, SDA, D> {
    // SDA geht HIGH → LOW während SCL HIGH ist
    fn start(&mut self) {
        // SDA zuerst hoch: bei Repeated Start ist SCL noch Low, sonst
        // entstünde eine Stop-Bedingung
        self.sda.drive(true);
        self.half_period();
        self.scl.drive(true);
        self.half_period();
        self.sda.drive(false);
        self.half_period();
        self.scl.drive(false);
        self.half_period();
    }

    // SDA geht LOW → HIGH während SCL HIGH ist
    fn stop(&mut self) {
        self.scl.drive(true);
        self.half_period();
        self.sda.drive(true);
        self.half_period();
        // Pull-ups halten beide Leitungen HIGH
        self.scl.release();
        self.sda.release();
    }

    fn write_byte(&mut self, byte: u8) -> Ack {
        for bit in (0..8).rev() {
            self.sda.drive(byte & (1 << bit) != 0);
            self.clock_pulse();
        }

        // ACK/NAK: Empfänger zieht SDA im neunten Takt auf Low
        self.sda.release();
        let nak = self.clock_pulse();

        self.half_period();
        self.sda.drive(false);

        if nak { Ack::Nak } else { Ack::Ack }
    }

    fn read_byte(&mut self, ack: Ack) -> u8 {
        self.sda.release();

        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.clock_pulse());
        }

        self.half_period();
        self.sda.drive(!ack.is_ack());
        self.clock_pulse();

        self.half_period();
        self.sda.drive(false);
        byte
    }

    fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
