//! Simuliertes serielles EEPROM (128 KiB, 64-Byte Pages) am Bit-Bang Bus
//!
//! Das Gerät sieht nur die Leitungspegel und reagiert auf Flanken:
//! - SDA fällt bei SCL High → Start, SDA steigt bei SCL High → Stop
//! - steigende SCL-Flanke: Bit einlesen bzw. ACK des Masters lesen
//! - fallende SCL-Flanke: ACK ausgeben bzw. nächstes Bit ausgeben
//!
//! Schreibdaten wrappen innerhalb der Page (wie beim echten Baustein),
//! sequentielles Lesen wrappt innerhalb des 64 KiB Blocks. Nach jedem Stop
//! mit Daten ist das Gerät `write_cycle_ns` lang beschäftigt und quittiert
//! sein Device-Select-Byte mit NAK.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use flame_core::{BitBangedBus, BusLine, EepromStore};

pub const MEMORY_SIZE: usize = 0x2_0000;
pub const PAGE: u32 = 64;

/// Abgeschlossene Schreib-Übertragung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteTransaction {
    pub start: u32,
    pub len: usize,
}

impl WriteTransaction {
    pub fn within_one_page(&self) -> bool {
        self.start / PAGE == (self.start + self.len as u32 - 1) / PAGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Receive { bits: u8, byte: u8 },
    AckByDevice,
    Transmit { bit: u8 },
    AckByMaster { acked: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Control,
    AddressHigh,
    AddressLow,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Scl,
    Sda,
}

pub struct SimEeprom {
    pub memory: Vec<u8>,
    pub present: bool,
    pub write_cycle_ns: u64,
    pub now_ns: u64,
    busy_until_ns: u64,

    // Master-Seite: Some(level) = getrieben, None = freigegeben
    master_scl: Option<bool>,
    master_sda: Option<bool>,
    device_sda_low: bool,

    phase: Phase,
    expect: Expect,
    reading: bool,
    block: u32,
    address_high: u8,
    pointer: u32,
    pending: Vec<(u32, u8)>,

    /// Anzahl Start-Bedingungen (inkl. Repeated Start)
    pub starts: usize,
    pub stops: usize,
    pub transactions: Vec<WriteTransaction>,
    pub sda_changes_while_scl_high: usize,
}

impl SimEeprom {
    pub fn new() -> Self {
        Self {
            memory: vec![0xFF; MEMORY_SIZE],
            present: true,
            write_cycle_ns: 5_000_000,
            now_ns: 0,
            busy_until_ns: 0,
            master_scl: None,
            master_sda: None,
            device_sda_low: false,
            phase: Phase::Idle,
            expect: Expect::Control,
            reading: false,
            block: 0,
            address_high: 0,
            pointer: 0,
            pending: Vec::new(),
            starts: 0,
            stops: 0,
            transactions: Vec::new(),
            sda_changes_while_scl_high: 0,
        }
    }

    pub fn scl(&self) -> bool {
        self.master_scl != Some(false)
    }

    pub fn sda(&self) -> bool {
        self.master_sda != Some(false) && !self.device_sda_low
    }

    pub fn is_busy(&self) -> bool {
        self.now_ns < self.busy_until_ns
    }

    fn set_master(&mut self, line: Line, state: Option<bool>) {
        let (scl0, sda0) = (self.scl(), self.sda());
        match line {
            Line::Scl => self.master_scl = state,
            Line::Sda => self.master_sda = state,
        }
        let (scl1, sda1) = (self.scl(), self.sda());

        match line {
            Line::Sda if scl1 && sda0 != sda1 => {
                self.sda_changes_while_scl_high += 1;
                if sda0 {
                    self.on_start();
                } else {
                    self.on_stop();
                }
            }
            Line::Scl if !scl0 && scl1 => self.on_rising(),
            Line::Scl if scl0 && !scl1 => self.on_falling(),
            _ => {}
        }
    }

    fn on_start(&mut self) {
        self.starts += 1;
        // Ungestoppte Schreibdaten verwirft das Gerät
        self.pending.clear();
        self.device_sda_low = false;
        self.expect = Expect::Control;
        self.phase = Phase::Receive { bits: 0, byte: 0 };
    }

    fn on_stop(&mut self) {
        self.stops += 1;
        if !self.pending.is_empty() {
            let start = self.pending[0].0;
            for &(address, byte) in &self.pending {
                self.memory[address as usize] = byte;
            }
            self.transactions.push(WriteTransaction {
                start,
                len: self.pending.len(),
            });
            self.pending.clear();
            self.busy_until_ns = self.now_ns + self.write_cycle_ns;
        }
        self.device_sda_low = false;
        self.phase = Phase::Idle;
    }

    fn on_rising(&mut self) {
        let sda = self.sda();
        match self.phase {
            Phase::Receive { bits, byte } if bits < 8 => {
                self.phase = Phase::Receive {
                    bits: bits + 1,
                    byte: (byte << 1) | u8::from(sda),
                };
            }
            Phase::AckByMaster { .. } => {
                self.phase = Phase::AckByMaster { acked: !sda };
            }
            _ => {}
        }
    }

    fn on_falling(&mut self) {
        match self.phase {
            Phase::Receive { bits: 8, byte } => {
                if self.accept(byte) {
                    self.device_sda_low = true;
                    self.phase = Phase::AckByDevice;
                } else {
                    self.device_sda_low = false;
                    self.phase = Phase::Idle;
                }
            }
            Phase::AckByDevice => {
                self.device_sda_low = false;
                if self.reading {
                    self.phase = Phase::Transmit { bit: 0 };
                    self.present_bit(0);
                } else {
                    self.phase = Phase::Receive { bits: 0, byte: 0 };
                }
            }
            Phase::Transmit { bit } => {
                if bit == 7 {
                    self.device_sda_low = false;
                    self.phase = Phase::AckByMaster { acked: false };
                } else {
                    self.phase = Phase::Transmit { bit: bit + 1 };
                    self.present_bit(bit + 1);
                }
            }
            Phase::AckByMaster { acked } => {
                self.pointer = (self.pointer & 0x1_0000) | ((self.pointer + 1) & 0xFFFF);
                if acked {
                    self.phase = Phase::Transmit { bit: 0 };
                    self.present_bit(0);
                } else {
                    self.device_sda_low = false;
                    self.phase = Phase::Idle;
                }
            }
            _ => {}
        }
    }

    fn present_bit(&mut self, bit: u8) {
        let byte = self.memory[self.pointer as usize];
        self.device_sda_low = byte & (0x80 >> bit) == 0;
    }

    /// Verarbeitet ein empfangenes Byte, `true` = ACK
    fn accept(&mut self, byte: u8) -> bool {
        match self.expect {
            Expect::Control => {
                if !self.present || self.is_busy() || byte & 0xFC != 0xA0 {
                    return false;
                }
                self.block = u32::from((byte >> 1) & 1) << 16;
                self.reading = byte & 1 != 0;
                if self.reading {
                    self.pointer = self.block | (self.pointer & 0xFFFF);
                } else {
                    self.expect = Expect::AddressHigh;
                }
                true
            }
            Expect::AddressHigh => {
                self.address_high = byte;
                self.expect = Expect::AddressLow;
                true
            }
            Expect::AddressLow => {
                self.pointer = self.block | (u32::from(self.address_high) << 8) | u32::from(byte);
                self.expect = Expect::Data;
                true
            }
            Expect::Data => {
                self.pending.push((self.pointer, byte));
                // Page-Wrap: nur die unteren 6 Bit zählen hoch
                self.pointer = (self.pointer & !(PAGE - 1)) | ((self.pointer + 1) & (PAGE - 1));
                true
            }
        }
    }
}

// ============================================================================
// Leitungen und Delay für den BitBangedBus
// ============================================================================

pub struct SimLine {
    sim: Rc<RefCell<SimEeprom>>,
    line: Line,
}

impl BusLine for SimLine {
    fn drive(&mut self, high: bool) {
        self.sim.borrow_mut().set_master(self.line, Some(high));
    }

    fn release(&mut self) {
        self.sim.borrow_mut().set_master(self.line, None);
    }

    fn is_high(&mut self) -> bool {
        let sim = self.sim.borrow();
        match self.line {
            Line::Scl => sim.scl(),
            Line::Sda => sim.sda(),
        }
    }
}

/// Delay, das nur die Simulationszeit weiterzählt
pub struct SimDelay {
    sim: Rc<RefCell<SimEeprom>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sim.borrow_mut().now_ns += u64::from(ns);
    }
}

pub type SimBus = BitBangedBus<SimLine, SimLine, SimDelay>;

/// Neuer Bus am bestehenden Gerät (z.B. nach einem simulierten Neustart)
pub fn bus_for(sim: &Rc<RefCell<SimEeprom>>) -> SimBus {
    let mut bus = BitBangedBus::new(
        SimLine {
            sim: Rc::clone(sim),
            line: Line::Scl,
        },
        SimLine {
            sim: Rc::clone(sim),
            line: Line::Sda,
        },
        SimDelay {
            sim: Rc::clone(sim),
        },
    );
    bus.init();
    bus
}

/// Erzeugt Bus und Zugriff auf den Gerätezustand
pub fn sim_bus() -> (SimBus, Rc<RefCell<SimEeprom>>) {
    let sim = Rc::new(RefCell::new(SimEeprom::new()));
    (bus_for(&sim), sim)
}

pub fn sim_store() -> (EepromStore<SimBus>, Rc<RefCell<SimEeprom>>) {
    let (bus, sim) = sim_bus();
    (EepromStore::new(bus), sim)
}
