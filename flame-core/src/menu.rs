//! Menü: Auswahl und Einstellung der Regler über den Drehgeber
//!
//! Zwei Modi:
//! - **Auswahl:** Drehgeber wählt einen Regler (mit Wrap)
//! - **Einstellen:** Drehgeber verändert den Wert des Reglers (ohne Wrap)
//!
//! Ein Tastendruck wechselt den Modus. Beim Verlassen des Einstell-Modus
//! soll der Aufrufer die Einstellungen speichern.

use core::fmt::Write;

use heapless::String;

use crate::mailbox::EncoderMailbox;
use crate::settings::Settings;
use crate::traits::{DisplayError, MenuDisplay};

/// Einstellbares Feld der `Settings`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingField {
    PixelWidth,
    Level,
    Red,
    Green,
    Blue,
    Depth,
    Rate,
}

impl SettingField {
    pub fn get(self, s: &Settings) -> i32 {
        match self {
            SettingField::PixelWidth => s.pixel_width,
            SettingField::Level => s.level,
            SettingField::Red => s.red,
            SettingField::Green => s.green,
            SettingField::Blue => s.blue,
            SettingField::Depth => s.depth,
            SettingField::Rate => s.rate,
        }
    }

    pub fn set(self, s: &mut Settings, value: i32) {
        let target = match self {
            SettingField::PixelWidth => &mut s.pixel_width,
            SettingField::Level => &mut s.level,
            SettingField::Red => &mut s.red,
            SettingField::Green => &mut s.green,
            SettingField::Blue => &mut s.blue,
            SettingField::Depth => &mut s.depth,
            SettingField::Rate => &mut s.rate,
        };
        *target = value;
    }
}

/// Ein Regler im Menü mit Wertebereich und Position auf dem LCD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Adjuster {
    /// Beschriftung, immer 5 Zeichen (überschreibt die vorige)
    pub label: &'static str,
    pub field: SettingField,
    pub min: i32,
    pub max: i32,
    pub row: u8,
    pub col: u8,
}

pub static ADJUSTERS: [Adjuster; 7] = [
    Adjuster {
        label: "Level",
        field: SettingField::Level,
        min: 0,
        max: 99,
        row: 0,
        col: 1,
    },
    Adjuster {
        label: "Red  ",
        field: SettingField::Red,
        min: 0,
        max: 99,
        row: 0,
        col: 5,
    },
    Adjuster {
        label: "Green",
        field: SettingField::Green,
        min: 0,
        max: 99,
        row: 0,
        col: 9,
    },
    Adjuster {
        label: "Blue ",
        field: SettingField::Blue,
        min: 0,
        max: 99,
        row: 0,
        col: 13,
    },
    Adjuster {
        label: "Depth",
        field: SettingField::Depth,
        min: 0,
        max: 99,
        row: 1,
        col: 9,
    },
    Adjuster {
        label: "Rate ",
        field: SettingField::Rate,
        min: 0,
        max: 99,
        row: 1,
        col: 13,
    },
    Adjuster {
        label: "Width",
        field: SettingField::PixelWidth,
        min: 1,
        max: 8,
        row: 1,
        col: 6,
    },
];

/// Feste Beschriftung der beiden LCD-Zeilen
pub const LCD_TEMPLATE: [&str; 2] = ["L   R   G   B  ", "     W  D   R  "];

/// Regler zum Index, `None` außerhalb der Tabelle
pub fn adjuster_by_index(index: i32) -> Option<&'static Adjuster> {
    usize::try_from(index).ok().and_then(|i| ADJUSTERS.get(i))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuMode {
    Selecting,
    Adjusting,
}

/// Was der Controller nach einer Eingabe tun muss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Anderer Regler ausgewählt: Beschriftung anzeigen
    Highlight(&'static Adjuster),
    /// Einstell-Modus betreten
    BeginAdjust(&'static Adjuster),
    /// Einstell-Modus verlassen: Einstellungen speichern
    EndAdjust(&'static Adjuster),
    /// Wert geändert: Anzeige und Animation aktualisieren
    ValueChanged(&'static Adjuster),
}

pub struct Menu {
    selected: &'static Adjuster,
    mode: MenuMode,
    button_down: bool,
    last_value: i32,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            selected: &ADJUSTERS[0],
            mode: MenuMode::Selecting,
            button_down: false,
            last_value: 0,
        }
    }

    pub fn mode(&self) -> MenuMode {
        self.mode
    }

    pub fn selected(&self) -> &'static Adjuster {
        self.selected
    }

    fn selected_index(&self) -> i32 {
        ADJUSTERS
            .iter()
            .position(|a| a == self.selected)
            .unwrap_or(0) as i32
    }

    /// Drehgeber auf Reglerauswahl konfigurieren
    pub fn select_menu(&mut self, mailbox: &EncoderMailbox) {
        self.last_value = self.selected_index();
        mailbox.configure(0, ADJUSTERS.len() as i32 - 1, self.last_value, true);
    }

    /// Drehgeber auf den Wertebereich des gewählten Reglers konfigurieren
    pub fn select_adjuster(&mut self, settings: &Settings, mailbox: &EncoderMailbox) {
        let adjuster = self.selected;
        self.last_value = adjuster.field.get(settings);
        mailbox.configure(adjuster.min, adjuster.max, self.last_value, false);
    }

    /// Tasterzustand verarbeiten; reagiert nur auf die steigende Flanke
    pub fn on_button(
        &mut self,
        pressed: bool,
        settings: &Settings,
        mailbox: &EncoderMailbox,
    ) -> Option<MenuAction> {
        let edge = pressed && !self.button_down;
        self.button_down = pressed;
        if !edge {
            return None;
        }

        match self.mode {
            MenuMode::Selecting => {
                self.mode = MenuMode::Adjusting;
                self.select_adjuster(settings, mailbox);
                Some(MenuAction::BeginAdjust(self.selected))
            }
            MenuMode::Adjusting => {
                self.mode = MenuMode::Selecting;
                self.select_menu(mailbox);
                Some(MenuAction::EndAdjust(self.selected))
            }
        }
    }

    /// Drehgeber-Wert verarbeiten; reagiert nur auf Änderungen seit dem
    /// letzten Aufruf bzw. seit dem letzten Umkonfigurieren
    pub fn on_encoder(
        &mut self,
        settings: &mut Settings,
        mailbox: &EncoderMailbox,
    ) -> Option<MenuAction> {
        let value = mailbox.value();
        if value == self.last_value {
            return None;
        }
        self.last_value = value;

        match self.mode {
            MenuMode::Adjusting => {
                self.selected.field.set(settings, value);
                Some(MenuAction::ValueChanged(self.selected))
            }
            MenuMode::Selecting => {
                self.selected = adjuster_by_index(value).unwrap_or(&ADJUSTERS[0]);
                Some(MenuAction::Highlight(self.selected))
            }
        }
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Anzeige
// ============================================================================

/// Zeichnet die feste Beschriftung und alle Werte
pub fn draw_all<D: MenuDisplay>(display: &mut D, settings: &Settings) -> Result<(), DisplayError> {
    for (row, text) in LCD_TEMPLATE.iter().enumerate() {
        display.put_str(row as u8, 0, text)?;
    }
    for adjuster in ADJUSTERS.iter() {
        show_value(display, adjuster, settings)?;
    }
    Ok(())
}

pub fn show_label<D: MenuDisplay>(
    display: &mut D,
    adjuster: &Adjuster,
) -> Result<(), DisplayError> {
    display.put_str(1, 0, adjuster.label)
}

/// Zeigt den Wert zweistellig mit führender Null an
pub fn show_value<D: MenuDisplay>(
    display: &mut D,
    adjuster: &Adjuster,
    settings: &Settings,
) -> Result<(), DisplayError> {
    let mut text: String<12> = String::new();
    write!(text, "{:02}", adjuster.field.get(settings)).map_err(|_| DisplayError::WriteFailed)?;
    display.put_str(adjuster.row, adjuster.col, &text)
}
