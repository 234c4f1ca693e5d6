//! Quadratur-Decoder für den Drehgeber
//!
//! Läuft als eigenständiger Worker (eigener CPU-Kern bzw. Thread) in einer
//! Endlosschleife ohne Yield. Jede Wartezeit würde das Entprell-Timing
//! verändern, das in Samples und nicht in Zeit gemessen wird.

use crate::mailbox::EncoderMailbox;
use crate::traits::EncoderInput;

/// Anzahl identischer Samples bevor ein neuer Wert übernommen wird
pub const DEBOUNCE_TARGET: u32 = 2000;

/// Richtung eines Phasenübergangs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Movement {
    None,
    Clockwise,
    CounterClockwise,
}

/// Klassifiziert den Übergang `previous → current` (jeweils 2-Bit Phase)
///
/// Sequenz im Uhrzeigersinn: 00 → 01 → 11 → 10 → 00.
/// Doppelschritte (00 ↔ 11, 01 ↔ 10) sind nicht eindeutig und zählen als
/// keine Bewegung.
pub fn classify(previous: u8, current: u8) -> Movement {
    match (previous & 0b11, current & 0b11) {
        (0b00, 0b01) | (0b01, 0b11) | (0b11, 0b10) | (0b10, 0b00) => Movement::Clockwise,
        (0b00, 0b10) | (0b10, 0b11) | (0b11, 0b01) | (0b01, 0b00) => Movement::CounterClockwise,
        _ => Movement::None,
    }
}

/// Entprellung über aufeinanderfolgende identische Samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    pending: Option<u8>,
    count: u32,
    stable: u8,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            pending: None,
            count: 0,
            stable: 0,
        }
    }

    /// Verarbeitet ein Sample und gibt den (ggf. neuen) stabilen Wert zurück
    ///
    /// Jedes abweichende Sample startet die Zählung von vorn.
    pub fn update(&mut self, sample: u8) -> u8 {
        if self.pending == Some(sample) {
            self.count += 1;
            if self.count >= DEBOUNCE_TARGET {
                self.stable = sample;
                self.count = 0;
            }
        } else {
            self.pending = Some(sample);
            self.count = 0;
        }
        self.stable
    }

    pub fn stable(&self) -> u8 {
        self.stable
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drehgeber-Worker: Eingang sampeln, entprellen, Mailbox aktualisieren
pub struct QuadratureDecoder<I> {
    input: I,
    debouncer: Debouncer,
    previous: u8,
}

impl<I: EncoderInput> QuadratureDecoder<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            debouncer: Debouncer::new(),
            previous: 0,
        }
    }

    /// Ein Schleifendurchlauf
    pub fn poll(&mut self, mailbox: &EncoderMailbox) -> Movement {
        let sample = self.input.sample() & 0b11;
        let stable = self.debouncer.update(sample);

        let movement = classify(self.previous, stable);
        mailbox.step(movement);

        self.previous = stable;
        movement
    }

    /// Endlosschleife, kehrt nie zurück
    pub fn run(mut self, mailbox: &EncoderMailbox) -> ! {
        loop {
            self.poll(mailbox);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Erwartete Klassifikation für alle 16 Codes (previous << 2 | current)
    const TABLE: [Movement; 16] = [
        Movement::None,             // 00 → 00
        Movement::Clockwise,        // 00 → 01
        Movement::CounterClockwise, // 00 → 10
        Movement::None,             // 00 → 11
        Movement::CounterClockwise, // 01 → 00
        Movement::None,             // 01 → 01
        Movement::None,             // 01 → 10
        Movement::Clockwise,        // 01 → 11
        Movement::Clockwise,        // 10 → 00
        Movement::None,             // 10 → 01
        Movement::None,             // 10 → 10
        Movement::CounterClockwise, // 10 → 11
        Movement::None,             // 11 → 00
        Movement::CounterClockwise, // 11 → 01
        Movement::Clockwise,        // 11 → 10
        Movement::None,             // 11 → 11
    ];

    #[test]
    fn test_classify_all_codes() {
        for code in 0u8..16 {
            assert_eq!(
                classify(code >> 2, code & 0b11),
                TABLE[code as usize],
                "code {:04b}",
                code
            );
        }
    }

    #[test]
    fn test_debouncer_needs_full_target() {
        let mut d = Debouncer::new();
        // Erstes Sample setzt nur pending
        assert_eq!(d.update(0b01), 0);
        for _ in 0..DEBOUNCE_TARGET - 1 {
            assert_eq!(d.update(0b01), 0);
        }
        assert_eq!(d.update(0b01), 0b01);
        assert_eq!(d.stable(), 0b01);
    }

    #[test]
    fn test_debouncer_glitch_restarts_count() {
        let mut d = Debouncer::new();
        d.update(0b01);
        for _ in 0..DEBOUNCE_TARGET - 1 {
            d.update(0b01);
        }
        // Ein einzelner Ausreißer kurz vor dem Ziel
        d.update(0b00);
        d.update(0b01);
        assert_eq!(d.stable(), 0);
        for _ in 0..DEBOUNCE_TARGET - 1 {
            assert_eq!(d.update(0b01), 0);
        }
        assert_eq!(d.update(0b01), 0b01);
    }
}
