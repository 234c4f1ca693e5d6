//! Persistente Einstellungen im EEPROM
//!
//! Record-Layout (Little Endian, Version 2):
//!
//! | Offset | Größe | Inhalt        |
//! |--------|-------|---------------|
//! | 0      | 4     | Magic "FIRE"  |
//! | 4      | 4     | Version (i32) |
//! | 8      | 4     | pixel_width   |
//! | 12     | 4     | level         |
//! | 16     | 4     | red           |
//! | 20     | 4     | green         |
//! | 24     | 4     | blue          |
//! | 28     | 4     | depth         |
//! | 32     | 4     | rate          |
//!
//! Passen Magic oder Version nicht, werden alle Felder verworfen und die
//! Defaults verwendet. Es gibt keine Migration einzelner Felder.

use crate::eeprom::{EepromError, EepromStore};
use crate::traits::SerialBus;

pub const SETTINGS_MAGIC: [u8; 4] = *b"FIRE";

/// Aktuelle Schema-Version
pub const SETTINGS_VERSION: i32 = 2;

/// Anzahl der Einstellungs-Felder in Version 2
pub const FIELD_COUNT: usize = 7;

/// Größe des Records in Bytes
pub const RECORD_SIZE: usize = 8 + FIELD_COUNT * 4;

/// Alle einstellbaren Werte der Leuchte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    pub pixel_width: i32,
    pub level: i32,
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub depth: i32,
    pub rate: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pixel_width: 2,
            level: 50,
            red: 88,
            green: 47,
            blue: 14,
            depth: 21,
            rate: 99,
        }
    }
}

/// Warum ein gelesener Record nicht verwendet wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    BadMagic,
    VersionMismatch { found: i32 },
}

impl Settings {
    fn fields(&self) -> [i32; FIELD_COUNT] {
        [
            self.pixel_width,
            self.level,
            self.red,
            self.green,
            self.blue,
            self.depth,
            self.rate,
        ]
    }

    /// Serialisiert die Einstellungen als Record der aktuellen Version
    pub fn to_record(&self) -> [u8; RECORD_SIZE] {
        let mut record = [0u8; RECORD_SIZE];
        record[0..4].copy_from_slice(&SETTINGS_MAGIC);
        record[4..8].copy_from_slice(&SETTINGS_VERSION.to_le_bytes());
        for (chunk, value) in record[8..].chunks_exact_mut(4).zip(self.fields()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        record
    }

    /// Liest einen Record; nur exakt passende Magic und Version sind gültig
    pub fn from_record(record: &[u8; RECORD_SIZE]) -> Result<Self, RecordError> {
        if record[0..4] != SETTINGS_MAGIC {
            return Err(RecordError::BadMagic);
        }
        let version = read_i32(record, 4);
        if version != SETTINGS_VERSION {
            return Err(RecordError::VersionMismatch { found: version });
        }

        Ok(Self {
            pixel_width: read_i32(record, 8),
            level: read_i32(record, 12),
            red: read_i32(record, 16),
            green: read_i32(record, 20),
            blue: read_i32(record, 24),
            depth: read_i32(record, 28),
            rate: read_i32(record, 32),
        })
    }
}

fn read_i32(record: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&record[offset..offset + 4]);
    i32::from_le_bytes(bytes)
}

/// Grund für das Laden der Defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DefaultsReason {
    ReadFailed(EepromError),
    Invalid(RecordError),
}

/// Herkunft der geladenen Einstellungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsSource {
    Stored,
    Defaults(DefaultsReason),
}

/// Ergebnis von `SettingsStore::save`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveOutcome {
    /// Identisch mit der Schattenkopie, kein Buszugriff
    Unchanged,
    Written,
}

/// Einstellungen im EEPROM mit Schattenkopie
///
/// Die Schattenkopie entspricht immer dem zuletzt gelesenen bzw. erfolgreich
/// geschriebenen Stand. Nach einem fehlgeschlagenen Schreibversuch bleibt sie
/// unverändert, damit der nächste `save` es erneut versucht.
pub struct SettingsStore<B> {
    eeprom: EepromStore<B>,
    base: u32,
    shadow: Settings,
}

impl<B: SerialBus> SettingsStore<B> {
    pub fn new(eeprom: EepromStore<B>, base: u32) -> Self {
        Self {
            eeprom,
            base,
            shadow: Settings::default(),
        }
    }

    pub fn shadow(&self) -> &Settings {
        &self.shadow
    }

    /// Liest den Record; bei Lesefehler oder ungültigem Record gelten die Defaults
    pub fn load(&mut self) -> (Settings, SettingsSource) {
        let mut record = [0u8; RECORD_SIZE];

        let (settings, source) = match self.eeprom.read(self.base, &mut record) {
            Err(e) => (
                Settings::default(),
                SettingsSource::Defaults(DefaultsReason::ReadFailed(e)),
            ),
            Ok(()) => match Settings::from_record(&record) {
                Ok(settings) => (settings, SettingsSource::Stored),
                Err(e) => (
                    Settings::default(),
                    SettingsSource::Defaults(DefaultsReason::Invalid(e)),
                ),
            },
        };

        self.shadow = settings;
        (settings, source)
    }

    /// Schreibt nur wenn sich mindestens ein Feld von der Schattenkopie unterscheidet
    pub fn save(&mut self, settings: &Settings) -> Result<SaveOutcome, EepromError> {
        if *settings == self.shadow {
            return Ok(SaveOutcome::Unchanged);
        }

        self.eeprom.write(self.base, &settings.to_record())?;
        self.shadow = *settings;
        Ok(SaveOutcome::Written)
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Settings {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Settings {{ width: {}, level: {}, rgb: ({}, {}, {}), depth: {}, rate: {} }}",
            self.pixel_width,
            self.level,
            self.red,
            self.green,
            self.blue,
            self.depth,
            self.rate
        )
    }
}
