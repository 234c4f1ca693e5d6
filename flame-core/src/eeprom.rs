//! Serielles EEPROM am Bit-Bang Bus
//!
//! Byte-adressierter Lese-/Schreibzugriff auf ein 128 KiB EEPROM (17-Bit Adressen).
//! Schreibzugriffe werden an 64-Byte-Pages aufgeteilt, Lesezugriffe an
//! 16-Bit-Grenzen (Adressbreite des Geräts).

use crate::bus::Ack;
use crate::traits::SerialBus;

/// Basis des Device-Select-Bytes (7-Bit Adresse 0x50)
pub const DEVICE_SELECT: u8 = 0xA0;

/// Größe einer Schreib-Page in Bytes
pub const PAGE_SIZE: u32 = 64;

/// Größe des Adressraums (17 Bit)
pub const EEPROM_SIZE: u32 = 0x2_0000;

/// Wartezeit nach jedem Page-Write in Millisekunden
///
/// Das Gerät bestätigt während des Schreibzyklus keine neue Übertragung.
pub const WRITE_CYCLE_MS: u32 = 5;

/// Bei welchem Schritt der Übertragung das ACK ausblieb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckStage {
    DeviceSelect,
    AddressHigh,
    AddressLow,
    Data,
}

/// Fehler-Typ für EEPROM-Zugriffe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Erwartetes ACK wurde nicht empfangen, Operation abgebrochen
    AckFailure { stage: AckStage, address: u32 },
    /// Bereich liegt (teilweise) außerhalb des Adressraums
    AddressOutOfRange,
}

/// Device-Select-Byte: `0xA0 | R/W | (Bit 16 << 1)`
pub fn device_select(address: u32, read: bool) -> u8 {
    let block = ((address >> 16) & 1) as u8;
    DEVICE_SELECT | (block << 1) | u8::from(read)
}

/// Länge des Abschnitts ab `address`, der vor der nächsten `boundary` endet
fn run_length(address: u32, remaining: usize, boundary: u32) -> usize {
    let until_boundary = (boundary - (address % boundary)) as usize;
    remaining.min(until_boundary)
}

/// EEPROM-Zugriff über einen `SerialBus`
pub struct EepromStore<B> {
    bus: B,
}

impl<B: SerialBus> EepromStore<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Liest `buf.len()` Bytes ab `address`
    ///
    /// Pro 64 KiB Block eine Übertragung; das letzte Byte jeder Übertragung
    /// wird mit NAK quittiert.
    pub fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<(), EepromError> {
        check_range(address, buf.len())?;

        let mut address = address;
        let mut rest = buf;
        while !rest.is_empty() {
            let len = run_length(address, rest.len(), 0x1_0000);
            let (run, tail) = core::mem::take(&mut rest).split_at_mut(len);

            self.select(address)?;

            // Repeated Start: Richtung auf Lesen umschalten
            self.bus.start();
            self.expect_ack(
            device_select(address, true),
            AckStage::DeviceSelect,
            address,
        )?;

            let last = run.len() - 1;
            for (i, byte) in run.iter_mut().enumerate() {
                let ack = if i == last { Ack::Nak } else { Ack::Ack };
                *byte = self.bus.read_byte(ack);
            }
            self.bus.stop();

            address += len as u32;
            rest = tail;
        }
        Ok(())
    }

    /// Schreibt `data` ab `address`
    ///
    /// Jede Übertragung bleibt innerhalb einer 64-Byte-Page und wird von
    /// `WRITE_CYCLE_MS` Wartezeit gefolgt.
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<(), EepromError> {
        check_range(address, data.len())?;

        let mut address = address;
        let mut rest = data;
        while !rest.is_empty() {
            let len = run_length(address, rest.len(), PAGE_SIZE);
            let (run, tail) = rest.split_at(len);

            self.select(address)?;
            for (i, &byte) in run.iter().enumerate() {
                self.expect_ack(byte, AckStage::Data, address + i as u32)?;
            }
            self.bus.stop();
            self.bus.wait_ms(WRITE_CYCLE_MS);

            address += len as u32;
            rest = tail;
        }
        Ok(())
    }

    /// Start + Device-Select (Schreiben) + Adresse High/Low
    fn select(&mut self, address: u32) -> Result<(), EepromError> {
        self.bus.start();
        self.expect_ack(
            device_select(address, false),
            AckStage::DeviceSelect,
            address,
        )?;
        self.expect_ack((address >> 8) as u8, AckStage::AddressHigh, address)?;
        self.expect_ack(address as u8, AckStage::AddressLow, address)
    }

    /// Schreibt ein Byte; bei NAK wird der Bus mit Stop freigegeben
    fn expect_ack(
        &mut self,
        byte: u8,
        stage: AckStage,
        address: u32,
    ) -> Result<(), EepromError> {
        match self.bus.write_byte(byte) {
            Ack::Ack => Ok(()),
            Ack::Nak => {
                self.bus.stop();
                Err(EepromError::AckFailure { stage, address })
            }
        }
    }
}

fn check_range(address: u32, len: usize) -> Result<(), EepromError> {
    let end = address as u64 + len as u64;
    if end > EEPROM_SIZE as u64 {
        return Err(EepromError::AddressOutOfRange);
    }
    Ok(())
}
