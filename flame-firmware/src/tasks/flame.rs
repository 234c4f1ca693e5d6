// Flammen-Task - Steuert den LED-Streifen über RMT Peripheral
use defmt::{error, info};
use embassy_time::Timer;
use esp_hal::rng::Rng;
use esp_hal_smartled::smart_led_buffer;
use flame_core::flame::MIN_FRAME_DELAY_MS;
use flame_core::{SmartLedWriter, StripLayout, show_frame};
use rgb::RGB8;

use crate::FlameParamsSignal;
use crate::config::{LED_COUNT, PIXEL_HEIGHT, RMT_CLOCK_MHZ, ROW_WIDTH};
use crate::hal::RmtLedWriter;

const LAYOUT: StripLayout = StripLayout {
    row_width: ROW_WIDTH,
    pixel_height: PIXEL_HEIGHT,
};

/// Flammen-Logik - Testbare Animation ohne Hardware-Abhängigkeit
///
/// Wartet auf die ersten Parameter, danach läuft die Animation endlos.
/// Neue Parameter vom Controller werden vor jedem Frame übernommen.
///
/// # Parameter
/// - `led`: LED Writer (Hardware oder Mock)
/// - `params`: Signal mit den jeweils aktuellen Animations-Parametern
/// - `rng`: Zufallsquelle für Flackern und Frame-Pause
pub async fn flame_logic<L: SmartLedWriter>(
    mut led: L,
    params: &'static FlameParamsSignal,
    rng: Rng,
) {
    let mut pixels = [RGB8::default(); LED_COUNT];

    let mut current = params.wait().await;
    info!("Flame started: {}", current);

    loop {
        if let Some(next) = params.try_take() {
            current = next;
        }

        let frame = show_frame(&mut led, &current, &LAYOUT, &mut pixels, || rng.random());
        let delay_ms = match frame {
            Ok(ms) => ms,
            Err(e) => {
                error!("Failed to write LED strip: {}", e);
                MIN_FRAME_DELAY_MS
            }
        };

        Timer::after_millis(u64::from(delay_ms)).await;
    }
}

/// Flammen-Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann `flame_logic()` auf.
#[embassy_executor::task]
pub async fn flame_task(
    gpio4: esp_hal::peripherals::GPIO4<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    params: &'static FlameParamsSignal,
) {
    // Buffer für SmartLED Daten im Format für RMT
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);

    let led = RmtLedWriter::new(gpio4, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer);

    flame_logic(led, params, Rng::new()).await;
}
