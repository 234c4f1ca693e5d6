// Controller-Task - Menü über Drehgeber, Taster und LCD
use defmt::{debug, error, info, warn};
use embassy_time::Timer;
use esp_hal::gpio::Input;
use flame_core::menu::{draw_all, show_label, show_value};
use flame_core::{
    DisplayError, EncoderMailbox, FlameParams, Menu, MenuAction, MenuDisplay, SaveOutcome,
    Settings,
};

use crate::config::CONTROL_POLL_MS;
use crate::hal::{SerialLcd, StatusLeds};
use crate::{FirmwareSettingsStore, FlameParamsSignal};

fn report(result: Result<(), DisplayError>) {
    if let Err(e) = result {
        error!("Failed to write LCD: {}", e);
    }
}

/// Controller-Logik - Menüführung, Anzeige und Speichern
///
/// Fragt zyklisch Taster und Drehgeber-Mailbox ab:
/// - Taster wechselt zwischen Auswahl und Einstellen
/// - Verlassen des Einstell-Modus speichert die Einstellungen
/// - Wertänderungen gehen sofort an den Flammen-Task
///
/// Der generische Parameter `D: MenuDisplay` erlaubt ein Mock-Display.
pub async fn controller_logic<D: MenuDisplay>(
    mut display: D,
    button: Input<'static>,
    mut leds: StatusLeds<'static>,
    mailbox: &'static EncoderMailbox,
    store: &'static FirmwareSettingsStore,
    params: &'static FlameParamsSignal,
    mut settings: Settings,
) {
    let mut menu = Menu::new();

    report(draw_all(&mut display, &settings));
    report(show_label(&mut display, menu.selected()));
    menu.select_menu(mailbox);
    leds.show(menu.mode());

    loop {
        if let Some(action) = menu.on_button(button.is_high(), &settings, mailbox) {
            leds.show(menu.mode());

            match action {
                MenuAction::BeginAdjust(adjuster) => {
                    info!("Adjusting {}", adjuster.label);
                }
                MenuAction::EndAdjust(adjuster) => {
                    info!("Done adjusting {}", adjuster.label);
                    let saved = store.lock().await.save(&settings);
                    match saved {
                        Ok(SaveOutcome::Written) => info!("Settings saved: {}", settings),
                        Ok(SaveOutcome::Unchanged) => debug!("Settings unchanged"),
                        Err(e) => warn!("Failed to save settings: {}", e),
                    }
                }
                _ => {}
            }
        }

        if let Some(action) = menu.on_encoder(&mut settings, mailbox) {
            match action {
                MenuAction::ValueChanged(adjuster) => {
                    report(show_value(&mut display, adjuster, &settings));
                    params.signal(FlameParams::from_settings(&settings));
                }
                MenuAction::Highlight(adjuster) => {
                    report(show_label(&mut display, adjuster));
                }
                _ => {}
            }
        }

        Timer::after_millis(CONTROL_POLL_MS).await;
    }
}

/// Controller-Task - Embassy Task für parallele Ausführung
///
/// Initialisiert das LCD und ruft dann `controller_logic()` auf.
#[embassy_executor::task]
pub async fn controller_task(
    mut lcd: SerialLcd<'static>,
    button: Input<'static>,
    leds: StatusLeds<'static>,
    mailbox: &'static EncoderMailbox,
    store: &'static FirmwareSettingsStore,
    params: &'static FlameParamsSignal,
    settings: Settings,
) {
    if let Err(e) = lcd.init() {
        error!("Failed to initialize LCD: {}", e);
    }

    controller_logic(lcd, button, leds, mailbox, store, params, settings).await;
}
