// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen (ESP32-S3)

// ============================================================================
// LED-Streifen Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des LED-Streifens (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 4;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// LEDs pro Zeile
pub const ROW_WIDTH: usize = 144;

/// Anzahl gleich angesteuerter Zeilen
pub const PIXEL_HEIGHT: usize = 1;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = ROW_WIDTH * PIXEL_HEIGHT;

// ============================================================================
// EEPROM / Bit-Bang Bus
// ============================================================================

/// SCL-Leitung (externer Pull-up)
pub const SCL_GPIO_PIN: u8 = 5;

/// SDA-Leitung (externer Pull-up)
pub const SDA_GPIO_PIN: u8 = 6;

/// Adresse des Einstellungs-Records im EEPROM
pub const EEPROM_BASE: u32 = 0x8000;

// ============================================================================
// Bedienelemente
// ============================================================================

/// Drehgeber Phase A; Phase B liegt auf dem nächsten Pin
pub const ENCODER_BASE_PIN: u8 = 10;

/// Taster (High = gedrückt)
pub const BUTTON_GPIO_PIN: u8 = 14;

/// Status-LEDs, Low-aktiv
pub const RED_LED_GPIO_PIN: u8 = 12;
pub const GREEN_LED_GPIO_PIN: u8 = 13;
pub const BLUE_LED_GPIO_PIN: u8 = 15;

/// Abfrage-Intervall für Taster und Drehgeber-Mailbox
pub const CONTROL_POLL_MS: u64 = 5;

// ============================================================================
// Serielles LCD (2x16, UART)
// ============================================================================

pub const LCD_TX_GPIO_PIN: u8 = 17;

pub const LCD_BAUD: u32 = 19_200;

// ============================================================================
// Zweiter CPU-Kern (Drehgeber-Decoder)
// ============================================================================

/// Stack für den App-Core in Bytes
pub const APP_CORE_STACK_SIZE: usize = 4096;
