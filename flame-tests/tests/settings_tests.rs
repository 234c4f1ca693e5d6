//! Integration Tests für das Laden und Speichern der Einstellungen

mod sim;

use std::cell::RefCell;
use std::rc::Rc;

use flame_core::settings::{RECORD_SIZE, SETTINGS_VERSION};
use flame_core::{
    AckStage, DefaultsReason, EepromError, EepromStore, RecordError, SaveOutcome, Settings,
    SettingsSource, SettingsStore,
};

use sim::{SimBus, SimEeprom, bus_for, sim_store};

const BASE: u32 = 0x8000;

fn settings_store() -> (SettingsStore<SimBus>, Rc<RefCell<SimEeprom>>) {
    let (eeprom, sim) = sim_store();
    (SettingsStore::new(eeprom, BASE), sim)
}

fn custom() -> Settings {
    Settings {
        pixel_width: 4,
        level: 99,
        red: 10,
        green: 20,
        blue: 30,
        depth: 40,
        rate: 5,
    }
}

#[test]
fn test_erased_eeprom_loads_defaults() {
    let (mut store, _sim) = settings_store();

    let (settings, source) = store.load();

    assert_eq!(settings, Settings::default());
    assert_eq!(
        source,
        SettingsSource::Defaults(DefaultsReason::Invalid(RecordError::BadMagic))
    );
    assert_eq!(*store.shadow(), Settings::default());
}

#[test]
fn test_saved_settings_survive_restart() {
    let (mut store, sim) = settings_store();
    store.load();

    assert_eq!(store.save(&custom()), Ok(SaveOutcome::Written));

    // Neustart: neuer Bus, gleiches Gerät
    sim.borrow_mut().now_ns += 10_000_000;
    let mut restarted = SettingsStore::new(EepromStore::new(bus_for(&sim)), BASE);
    let (settings, source) = restarted.load();

    assert_eq!(source, SettingsSource::Stored);
    assert_eq!(settings, custom());
}

#[test]
fn test_record_lands_at_base_address() {
    let (mut store, sim) = settings_store();
    store.load();
    store.save(&custom()).unwrap();

    let sim = sim.borrow();
    let base = BASE as usize;
    assert_eq!(&sim.memory[base..base + 4], b"FIRE");
    assert_eq!(
        &sim.memory[base + 4..base + 8],
        &SETTINGS_VERSION.to_le_bytes()
    );
    assert_eq!(&sim.memory[base..base + RECORD_SIZE], &custom().to_record());
}

#[test]
fn test_old_version_record_is_ignored() {
    let (mut store, sim) = settings_store();
    {
        // Version-1-Record: Magic stimmt, nur 6 Felder
        let mut sim = sim.borrow_mut();
        let base = BASE as usize;
        sim.memory[base..base + 4].copy_from_slice(b"FIRE");
        sim.memory[base + 4..base + 8].copy_from_slice(&1i32.to_le_bytes());
        for i in 0..6 {
            let offset = base + 8 + i * 4;
            sim.memory[offset..offset + 4].copy_from_slice(&77i32.to_le_bytes());
        }
    }

    let (settings, source) = store.load();

    assert_eq!(settings, Settings::default());
    assert_eq!(
        source,
        SettingsSource::Defaults(DefaultsReason::Invalid(RecordError::VersionMismatch {
            found: 1
        }))
    );
}

#[test]
fn test_unchanged_settings_are_not_written() {
    let (mut store, sim) = settings_store();
    let (settings, _) = store.load();
    let starts = sim.borrow().starts;

    assert_eq!(store.save(&settings), Ok(SaveOutcome::Unchanged));

    assert_eq!(sim.borrow().starts, starts);
    assert!(sim.borrow().transactions.is_empty());
}

#[test]
fn test_single_field_change_is_written() {
    let (mut store, sim) = settings_store();
    let (mut settings, _) = store.load();

    settings.depth += 1;
    assert_eq!(store.save(&settings), Ok(SaveOutcome::Written));
    assert_eq!(*store.shadow(), settings);
    assert_eq!(sim.borrow().transactions.len(), 1);

    // Zweites Speichern mit gleichem Stand: nichts zu tun
    sim.borrow_mut().now_ns += 10_000_000;
    assert_eq!(store.save(&settings), Ok(SaveOutcome::Unchanged));
    assert_eq!(sim.borrow().transactions.len(), 1);
}

#[test]
fn test_failed_save_keeps_shadow_and_retries() {
    let (mut store, sim) = settings_store();
    store.load();

    sim.borrow_mut().present = false;
    let result = store.save(&custom());
    assert_eq!(
        result,
        Err(EepromError::AckFailure {
            stage: AckStage::DeviceSelect,
            address: BASE,
        })
    );
    assert_eq!(*store.shadow(), Settings::default());

    sim.borrow_mut().present = true;
    assert_eq!(store.save(&custom()), Ok(SaveOutcome::Written));
    assert_eq!(*store.shadow(), custom());
}

#[test]
fn test_missing_device_at_load_uses_defaults() {
    let (mut store, sim) = settings_store();
    sim.borrow_mut().present = false;

    let (settings, source) = store.load();

    assert_eq!(settings, Settings::default());
    assert!(matches!(
        source,
        SettingsSource::Defaults(DefaultsReason::ReadFailed(EepromError::AckFailure {
            stage: AckStage::DeviceSelect,
            ..
        }))
    ));
}
