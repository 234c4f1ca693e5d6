// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use esp_hal::delay::Delay;
use flame_core::{BitBangedBus, FlameParams, SettingsStore};

use crate::hal::FlexLine;

// ============================================================================
// Type-Aliase für geteilte Ressourcen
// ============================================================================
//
// Statt:  Mutex<CriticalSectionRawMutex, SettingsStore<BitBangedBus<...>>>
// Nutze:  FirmwareSettingsStore

/// Bit-Bang Bus an den beiden GPIOs mit blockierendem Delay
pub type FirmwareBus = BitBangedBus<FlexLine<'static>, FlexLine<'static>, Delay>;

/// Einstellungen im EEPROM; nur ein Kontext darf gleichzeitig den Bus treiben
pub type FirmwareSettingsStore = Mutex<CriticalSectionRawMutex, SettingsStore<FirmwareBus>>;

/// Aktuelle Animations-Parameter (Controller → Flammen-Task)
/// Nur der neueste Wert zählt, ältere werden überschrieben.
pub type FlameParamsSignal = Signal<CriticalSectionRawMutex, FlameParams>;
