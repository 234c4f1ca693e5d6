//! Gemeinsame Mailbox zwischen Controller und Drehgeber-Worker
//!
//! Eigentümer pro Feld:
//! - `pin`: einmalig beim Erzeugen gesetzt, danach nur gelesen
//! - `min`, `max`, `wrap`: schreibt nur der Controller
//! - `value`: schreibt der Decoder; der Controller setzt ihn nur beim
//!   Umkonfigurieren der Grenzen neu
//!
//! Alle veränderlichen Felder sind einzelne Maschinenworte (Atomics mit
//! `Relaxed`), keine Locks. Der Decoder schreibt `value` nur per
//! `compare_exchange`: setzt der Controller zwischen Lesen und Schreiben
//! neu, gewinnt die Konfiguration und die Bewegung verfällt.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use crate::decoder::Movement;

pub struct EncoderMailbox {
    pin: u8,
    min: AtomicI32,
    max: AtomicI32,
    value: AtomicI32,
    wrap: AtomicBool,
}

impl EncoderMailbox {
    /// Neue Mailbox für den Drehgeber an Pin `pin` (und `pin + 1`)
    ///
    /// `const` damit die Mailbox als `static` angelegt werden kann.
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            min: AtomicI32::new(0),
            max: AtomicI32::new(0),
            value: AtomicI32::new(0),
            wrap: AtomicBool::new(false),
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    // ------------------------------------------------------------------------
    // Controller-Seite
    // ------------------------------------------------------------------------

    /// Setzt Grenzen, Startwert und Wrap-Verhalten
    pub fn configure(&self, min: i32, max: i32, value: i32, wrap: bool) {
        self.min.store(min, Ordering::Relaxed);
        self.max.store(max, Ordering::Relaxed);
        self.value.store(value, Ordering::Relaxed);
        self.wrap.store(wrap, Ordering::Relaxed);
    }

    pub fn set_value(&self, value: i32) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn value(&self) -> i32 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn bounds(&self) -> (i32, i32) {
        (
            self.min.load(Ordering::Relaxed),
            self.max.load(Ordering::Relaxed),
        )
    }

    pub fn wraps(&self) -> bool {
        self.wrap.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------------
    // Decoder-Seite
    // ------------------------------------------------------------------------

    /// Wendet eine Bewegung auf `value` an (mit Sättigung oder Wrap)
    ///
    /// Gibt den Wert nach dem Schritt zurück.
    pub fn step(&self, movement: Movement) -> i32 {
        let value = self.value.load(Ordering::Relaxed);
        match self.next_value(value, movement) {
            Some(next) if self.commit(value, next) => next,
            _ => self.value(),
        }
    }

    fn next_value(&self, value: i32, movement: Movement) -> Option<i32> {
        let (min, max) = self.bounds();

        match movement {
            Movement::None => None,
            Movement::Clockwise if value < max => Some(value + 1),
            Movement::Clockwise if self.wraps() => Some(min),
            Movement::CounterClockwise if value > min => Some(value - 1),
            Movement::CounterClockwise if self.wraps() => Some(max),
            // Anschlag ohne Wrap: Wert bleibt stehen
            _ => None,
        }
    }

    /// Schreibt `next` nur, wenn `value` seit dem Lesen unverändert ist
    fn commit(&self, seen: i32, next: i32) -> bool {
        self.value
            .compare_exchange(seen, next, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }
}
