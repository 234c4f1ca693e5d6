// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul implementiert die Traits aus flame-core für die
// ESP32-S3 Peripherie.

pub mod bus_line;
pub mod encoder_pins;
pub mod lcd;
pub mod led_writer;
pub mod status_leds;

pub use bus_line::FlexLine;
pub use encoder_pins::EncoderPins;
pub use lcd::SerialLcd;
pub use led_writer::RmtLedWriter;
pub use status_leds::StatusLeds;
