// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

// ESP32-S3 HAL
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Flex, Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::system::{CpuControl, Stack};
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use static_cell::{ConstStaticCell, StaticCell};

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use flame_core::{
    BitBangedBus, EepromStore, EncoderMailbox, FlameParams, QuadratureDecoder, SettingsSource,
    SettingsStore,
};
use flame_steuerung::config::{
    APP_CORE_STACK_SIZE, BUTTON_GPIO_PIN, EEPROM_BASE, ENCODER_BASE_PIN, LCD_BAUD,
    LCD_TX_GPIO_PIN, LED_COUNT, LED_GPIO_PIN, SCL_GPIO_PIN, SDA_GPIO_PIN,
};
use flame_steuerung::hal::{EncoderPins, FlexLine, SerialLcd, StatusLeds};
use flame_steuerung::tasks::{controller_task, flame_task};
use flame_steuerung::{FirmwareSettingsStore, FlameParamsSignal};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Mailbox zwischen Controller (Core 0) und Drehgeber-Decoder (Core 1)
static ENCODER: EncoderMailbox = EncoderMailbox::new(ENCODER_BASE_PIN);

/// Aktuelle Animations-Parameter für den Flammen-Task
static FLAME_PARAMS: FlameParamsSignal = Signal::new();

static APP_CORE_STACK: ConstStaticCell<Stack<APP_CORE_STACK_SIZE>> =
    ConstStaticCell::new(Stack::new());

/// Main Entry Point
///
/// Initialisiert Hardware, startet den Decoder auf Core 1, lädt die
/// Einstellungen und spawnt die Tasks. Danach schläft main().
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // CPU auf maximale Taktfrequenz (240 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Drehgeber-Decoder auf Core 1: Endlosschleife ohne Executor
    // Phase A = ENCODER_BASE_PIN, Phase B = ENCODER_BASE_PIN + 1
    const _: () = assert!(ENCODER_BASE_PIN == 10, "Drehgeber auf GPIO10/11");
    let encoder_cfg = InputConfig::default().with_pull(Pull::Up);
    let decoder = QuadratureDecoder::new(EncoderPins::new(
        Input::new(peripherals.GPIO10, encoder_cfg),
        Input::new(peripherals.GPIO11, encoder_cfg),
    ));

    let mut cpu_control = CpuControl::new(peripherals.CPU_CTRL);
    // Guard muss leben, solange der Decoder läuft (main kehrt nie zurück)
    let _app_core = cpu_control
        .start_app_core(APP_CORE_STACK.take(), move || {
            decoder.run(&ENCODER);
        })
        .expect("Failed to start app core");
    info!("Encoder decoder running on core 1 (GPIO{})", ENCODER.pin());

    // EEPROM am Bit-Bang Bus, Einstellungen laden
    let scl = FlexLine::new(Flex::new(peripherals.GPIO5));
    let sda = FlexLine::new(Flex::new(peripherals.GPIO6));
    let mut bus = BitBangedBus::new(scl, sda, Delay::new());
    bus.init();
    info!("EEPROM bus on SCL=GPIO{} SDA=GPIO{}", SCL_GPIO_PIN, SDA_GPIO_PIN);

    let mut settings_store = SettingsStore::new(EepromStore::new(bus), EEPROM_BASE);
    let (settings, source) = settings_store.load();
    match source {
        SettingsSource::Stored => info!("Settings loaded: {}", settings),
        SettingsSource::Defaults(reason) => {
            warn!("Using default settings ({}): {}", reason, settings)
        }
    }

    static SETTINGS_STORE: StaticCell<FirmwareSettingsStore> = StaticCell::new();
    let settings_store = &*SETTINGS_STORE.init(Mutex::new(settings_store));

    FLAME_PARAMS.signal(FlameParams::from_settings(&settings));

    // Serielles LCD
    let uart = Uart::new(
        peripherals.UART1,
        UartConfig::default().with_baudrate(LCD_BAUD),
    )
    .expect("Failed to initialize UART1")
    .with_tx(peripherals.GPIO17);
    let lcd = SerialLcd::new(uart);
    info!("LCD on GPIO{} at {} baud", LCD_TX_GPIO_PIN, LCD_BAUD);

    // Taster und Status-LEDs (Low-aktiv, starten aus)
    let button = Input::new(
        peripherals.GPIO14,
        InputConfig::default().with_pull(Pull::Down),
    );
    let leds = StatusLeds::new(
        Output::new(peripherals.GPIO12, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO13, Level::High, OutputConfig::default()),
        Output::new(peripherals.GPIO15, Level::High, OutputConfig::default()),
    );
    info!("Button on GPIO{}", BUTTON_GPIO_PIN);

    // Spawn Flammen-Task (LED-Streifen über RMT)
    spawner
        .spawn(flame_task(peripherals.GPIO4, peripherals.RMT, &FLAME_PARAMS))
        .unwrap();
    info!("LED strip: {} LEDs on GPIO{}", LED_COUNT, LED_GPIO_PIN);

    // Spawn Controller-Task (Menü, LCD, Speichern)
    spawner
        .spawn(controller_task(
            lcd,
            button,
            leds,
            &ENCODER,
            settings_store,
            &FLAME_PARAMS,
            settings,
        ))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks und auf Core 1)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
