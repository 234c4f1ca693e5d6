// Busleitung für den Bit-Bang Bus
//
// Open-Drain Ausgang mit Pull-up: Low wird aktiv getrieben, High heißt
// freigegeben. Der Eingang bleibt aktiv, damit ACK-Bits und Daten des
// EEPROMs gelesen werden können.

use esp_hal::gpio::{DriveMode, Flex, InputConfig, Level, OutputConfig, Pull};
use flame_core::BusLine;

pub struct FlexLine<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexLine<'d> {
    /// Konfiguriert den Pin und gibt die Leitung frei
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.apply_input_config(&InputConfig::default().with_pull(Pull::Up));
        pin.apply_output_config(&OutputConfig::default().with_drive_mode(DriveMode::OpenDrain));
        pin.set_level(Level::High);
        pin.set_input_enable(true);
        pin.set_output_enable(true);
        Self { pin }
    }
}

impl BusLine for FlexLine<'_> {
    fn drive(&mut self, high: bool) {
        self.pin.set_level(Level::from(high));
    }

    fn release(&mut self) {
        self.pin.set_level(Level::High);
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}
