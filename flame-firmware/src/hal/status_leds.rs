// Status-LEDs (Low-aktiv): Blau = Auswahl, Rot = Einstellen

use esp_hal::gpio::Output;
use flame_core::MenuMode;

pub struct StatusLeds<'d> {
    red: Output<'d>,
    green: Output<'d>,
    blue: Output<'d>,
}

impl<'d> StatusLeds<'d> {
    /// Erwartet die Ausgänge mit Startpegel High (aus)
    pub fn new(red: Output<'d>, green: Output<'d>, blue: Output<'d>) -> Self {
        Self { red, green, blue }
    }

    pub fn show(&mut self, mode: MenuMode) {
        self.red.set_high();
        self.green.set_high();
        self.blue.set_high();

        match mode {
            MenuMode::Selecting => self.blue.set_low(),
            MenuMode::Adjusting => self.red.set_low(),
        }
    }
}
