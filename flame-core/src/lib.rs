//! Flame Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, das Bit-Bang-Busprotokoll, den EEPROM-Zugriff,
//! den Drehgeber-Decoder und Pure Functions.

#![no_std]

pub mod bus;
pub mod decoder;
pub mod eeprom;
pub mod flame;
pub mod mailbox;
pub mod menu;
pub mod settings;
pub mod traits;

// Re-exports für einfachen Zugriff
pub use bus::{Ack, BitBangedBus};
pub use decoder::{DEBOUNCE_TARGET, Debouncer, Movement, QuadratureDecoder, classify};
pub use eeprom::{AckStage, EepromError, EepromStore};
pub use flame::{FlameParams, StripLayout, frame_delay_ms, render_frame, show_frame};
pub use mailbox::EncoderMailbox;
pub use menu::{ADJUSTERS, Adjuster, Menu, MenuAction, MenuMode, SettingField};
pub use settings::{
    DefaultsReason, RecordError, SaveOutcome, Settings, SettingsSource, SettingsStore,
};
pub use traits::{
    BusLine, DisplayError, EncoderInput, LedError, MenuDisplay, SerialBus, SmartLedWriter,
};
