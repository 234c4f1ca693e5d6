// Drehgeber-Eingänge (Phase A = Bit 0, Phase B = Bit 1)

use esp_hal::gpio::Input;
use flame_core::EncoderInput;

pub struct EncoderPins<'d> {
    a: Input<'d>,
    b: Input<'d>,
}

impl<'d> EncoderPins<'d> {
    pub fn new(a: Input<'d>, b: Input<'d>) -> Self {
        Self { a, b }
    }
}

impl EncoderInput for EncoderPins<'_> {
    fn sample(&mut self) -> u8 {
        u8::from(self.a.is_high()) | (u8::from(self.b.is_high()) << 1)
    }
}
