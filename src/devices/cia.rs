//! CIA (MOS 6526) I/O-timer register blocks.
//!
//! The C64 has two CIA chips:
//! - CIA1 ($DC00-$DCFF): keyboard matrix, joystick ports, IRQ line
//! - CIA2 ($DD00-$DDFF): serial bus, VIC-II bank selection, NMI line
//!
//! Each block has 16 registers mirrored across its 256-byte page. Timers,
//! the time-of-day clock and the serial shift register are not modeled and
//! read as 0; the interrupt control register always reads 1.
//!
//! On CIA1 the port data and direction registers are live: they read back
//! whatever was last written. No keyboard matrix is scanned, because keys
//! reach the guest through its keyboard buffer instead.

use super::{RegisterBlock, RegisterRead, RegisterWrite};

/// CIA register count (16 registers, mirrored across 256 bytes).
pub const CIA_REGISTER_COUNT: usize = 16;

/// Port A data register.
pub const PORT_A_DATA: u16 = 0x00;
/// Port B data register.
pub const PORT_B_DATA: u16 = 0x01;
/// Port A data direction register.
pub const PORT_A_DIRECTION: u16 = 0x02;
/// Port B data direction register.
pub const PORT_B_DIRECTION: u16 = 0x03;
/// Interrupt control and status register.
pub const INTERRUPT_CONTROL: u16 = 0x0D;

const REGISTER_NAMES: [&str; CIA_REGISTER_COUNT] = [
    "Port A data",
    "Port B data",
    "Port A direction",
    "Port B direction",
    "Timer A low",
    "Timer A high",
    "Timer B low",
    "Timer B high",
    "Real time clock 1/10s",
    "Real time clock seconds",
    "Real time clock minutes",
    "Real time clock hours",
    "Serial shift register",
    "Interrupt control and status",
    "Control timer A",
    "Control timer B",
];

/// Name of the register at `offset` (already folded into 0-15).
pub fn register_name(offset: u16) -> &'static str {
    REGISTER_NAMES[(offset & 0x0F) as usize]
}

/// CIA chip type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiaType {
    /// CIA1, block A: live port registers.
    Cia1,
    /// CIA2, block B: every register stubbed.
    Cia2,
}

/// CIA I/O port state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CiaPort {
    /// Output data register.
    pub data: u8,
    /// Data direction register (0=input, 1=output).
    pub ddr: u8,
}

/// MOS 6526 Complex Interface Adapter register block.
#[derive(Debug, Clone)]
pub struct Cia6526 {
    cia_type: CiaType,
    /// I/O Port A.
    pub port_a: CiaPort,
    /// I/O Port B.
    pub port_b: CiaPort,
}

impl Cia6526 {
    /// Create a new CIA block with all ports cleared.
    pub fn new(cia_type: CiaType) -> Self {
        Self {
            cia_type,
            port_a: CiaPort::default(),
            port_b: CiaPort::default(),
        }
    }

    /// Create CIA1 ($DC00).
    pub fn new_cia1() -> Self {
        Self::new(CiaType::Cia1)
    }

    /// Create CIA2 ($DD00).
    pub fn new_cia2() -> Self {
        Self::new(CiaType::Cia2)
    }

    /// Check if this is CIA1.
    pub fn is_cia1(&self) -> bool {
        self.cia_type == CiaType::Cia1
    }

    fn live_port_mut(&mut self, offset: u16) -> Option<&mut u8> {
        if !self.is_cia1() {
            return None;
        }
        match offset {
            PORT_A_DATA => Some(&mut self.port_a.data),
            PORT_B_DATA => Some(&mut self.port_b.data),
            PORT_A_DIRECTION => Some(&mut self.port_a.ddr),
            PORT_B_DIRECTION => Some(&mut self.port_b.ddr),
            _ => None,
        }
    }
}

impl RegisterBlock for Cia6526 {
    fn name(&self) -> &'static str {
        match self.cia_type {
            CiaType::Cia1 => "CIA1",
            CiaType::Cia2 => "CIA2",
        }
    }

    fn mirror_mask(&self) -> u16 {
        0x0F
    }

    fn read(&self, offset: u16) -> RegisterRead {
        log::trace!("{} read ${:X} {}", self.name(), offset, register_name(offset));
        match (self.cia_type, offset) {
            (CiaType::Cia1, PORT_A_DATA) => RegisterRead::Live(self.port_a.data),
            (CiaType::Cia1, PORT_B_DATA) => RegisterRead::Live(self.port_b.data),
            (CiaType::Cia1, PORT_A_DIRECTION) => RegisterRead::Live(self.port_a.ddr),
            (CiaType::Cia1, PORT_B_DIRECTION) => RegisterRead::Live(self.port_b.ddr),
            (_, INTERRUPT_CONTROL) => RegisterRead::Stub(1),
            _ => RegisterRead::Stub(0),
        }
    }

    fn write(&mut self, offset: u16, value: u8) -> RegisterWrite {
        let name = self.name();
        match self.live_port_mut(offset) {
            Some(port) => {
                *port = value;
                log::debug!("{} {} = ${:02X}", name, register_name(offset), value);
                RegisterWrite::Stored
            }
            None => {
                log::trace!(
                    "{} write ${:02X} to ${:X} {}",
                    name,
                    value,
                    offset,
                    register_name(offset)
                );
                RegisterWrite::Ignored
            }
        }
    }
}
