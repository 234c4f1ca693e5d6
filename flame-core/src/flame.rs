//! Flammen-Animation: Parameter und Frame-Berechnung
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::settings::Settings;
use crate::traits::{LedError, SmartLedWriter};

/// Maximaler Einstellwert der Regler (0..=99)
const SETTING_MAX: i32 = 99;

/// Minimale Pause zwischen zwei Frames in Millisekunden
pub const MIN_FRAME_DELAY_MS: u32 = 10;

/// Aus den Einstellungen abgeleitete Animations-Parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlameParams {
    /// Grundfarbe, jeweils 0..=255
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    /// Maximales Flackern (wird von allen Kanälen abgezogen)
    pub depth: i32,
    /// Spanne der zufälligen Frame-Pause in Millisekunden
    pub rate: i32,
    /// Breite eines Pixelblocks in LEDs
    pub pixel_width: usize,
}

impl FlameParams {
    /// Skaliert die 0..=99 Einstellwerte auf Farb- und Zeitwerte
    pub fn from_settings(s: &Settings) -> Self {
        let scale = SETTING_MAX * SETTING_MAX;
        Self {
            red: s.level * s.red * 255 / scale,
            green: s.level * s.green * 255 / scale,
            blue: s.level * s.blue * 255 / scale,
            depth: s.depth * 255 / SETTING_MAX,
            rate: (SETTING_MAX - s.rate) * 990 / SETTING_MAX,
            pixel_width: s.pixel_width.max(1) as usize,
        }
    }
}

/// Anordnung der LEDs: Zeilen mit `row_width` LEDs, `pixel_height` Zeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub row_width: usize,
    pub pixel_height: usize,
}

impl StripLayout {
    pub const fn led_count(&self) -> usize {
        self.row_width * self.pixel_height
    }
}

fn channel(base: i32, flicker: i32) -> u8 {
    (base - flicker).clamp(0, 255) as u8
}

/// Berechnet einen Frame in `pixels`
///
/// Jeder Pixelblock bekommt ein eigenes zufälliges Flackern.
pub fn render_frame<R: FnMut() -> u32>(
    params: &FlameParams,
    layout: &StripLayout,
    pixels: &mut [RGB8],
    mut rand: R,
) {
    let width = params.pixel_width.max(1);

    for x in (0..layout.row_width).step_by(width) {
        let flicker = if params.depth > 0 {
            (rand() % params.depth as u32) as i32
        } else {
            0
        };
        let color = RGB8 {
            r: channel(params.red, flicker),
            g: channel(params.green, flicker),
            b: channel(params.blue, flicker),
        };

        for row in 0..layout.pixel_height {
            let start = row * layout.row_width + x;
            // Letzter Block einer Zeile kann schmaler sein
            let end = start + width.min(layout.row_width - x);
            if let Some(block) = pixels.get_mut(start..end) {
                block.fill(color);
            }
        }
    }
}

/// Zufällige Pause bis zum nächsten Frame
pub fn frame_delay_ms<R: FnMut() -> u32>(params: &FlameParams, mut rand: R) -> u32 {
    if params.rate > 0 {
        MIN_FRAME_DELAY_MS + rand() % params.rate as u32
    } else {
        MIN_FRAME_DELAY_MS
    }
}

/// Ein Animationsschritt: Frame berechnen, ausgeben, Pause bestimmen
///
/// Bei einem Schreibfehler bleibt der Frame im Puffer, der Aufrufer
/// entscheidet über die Wartezeit.
pub fn show_frame<L: SmartLedWriter, R: FnMut() -> u32>(
    led: &mut L,
    params: &FlameParams,
    layout: &StripLayout,
    pixels: &mut [RGB8],
    mut rand: R,
) -> Result<u32, LedError> {
    render_frame(params, layout, pixels, &mut rand);
    led.write(pixels)?;
    Ok(frame_delay_ms(params, rand))
}
