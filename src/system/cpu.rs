//! The CPU unit driving the bus.
//!
//! Instruction execution is delegated to the `mos6502` crate. The machine
//! only needs a handful of operations on top of it, collected in
//! [`CpuUnit`] so the scheduler can also run against a scripted CPU.

use mos6502::cpu::CPU;
use mos6502::instruction::Nmos6502;
use mos6502::memory::Bus;
use mos6502::registers::{StackPointer, Status};

use super::c64_bus::C64Bus;

/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// Stack pointer after reset.
const RESET_STACK_POINTER: u8 = 0xFD;
/// Base of the hardware stack page.
const STACK_PAGE: u16 = 0x0100;

/// Operations the machine needs from its CPU.
///
/// The CPU owns the bus it drives, so the bus is reached through the CPU.
pub trait CpuUnit {
    /// Load PC from the reset vector and reset the stack pointer and flags.
    fn reset(&mut self);

    /// Execute one instruction.
    fn step(&mut self);

    /// Current program counter.
    fn program_counter(&self) -> u16;

    /// Force the program counter.
    fn set_program_counter(&mut self, pc: u16);

    /// Push a 16-bit value, high byte first.
    fn push_stack16(&mut self, value: u16);

    /// Set the carry flag.
    fn set_carry_flag(&mut self);

    /// Set the zero flag.
    fn set_zero_flag(&mut self);

    /// The bus this CPU drives.
    fn bus(&self) -> &C64Bus;

    /// The bus this CPU drives (mutable).
    fn bus_mut(&mut self) -> &mut C64Bus;
}

/// NMOS 6502 core wired to the C64 bus.
pub type C64Cpu = CPU<C64Bus, Nmos6502>;

/// Build a CPU around `bus`. Call [`CpuUnit::reset`] before stepping it.
///
/// The trait methods are best called through the trait path on the concrete
/// type, since the core has inherent methods of its own.
pub fn new_cpu(bus: C64Bus) -> C64Cpu {
    CPU::new(bus, Nmos6502)
}

impl Bus for C64Bus {
    fn get_byte(&mut self, address: u16) -> u8 {
        self.read(address)
    }

    fn set_byte(&mut self, address: u16, value: u8) {
        self.write(address, value);
    }
}

impl CpuUnit for C64Cpu {
    fn reset(&mut self) {
        let lo = self.memory.read(RESET_VECTOR);
        let hi = self.memory.read(RESET_VECTOR + 1);
        self.registers.program_counter = u16::from_le_bytes([lo, hi]);
        self.registers.stack_pointer = StackPointer(RESET_STACK_POINTER);
        self.registers.status.insert(Status::PS_DISABLE_INTERRUPTS);
        log::debug!("CPU reset, PC=${:04X}", self.registers.program_counter);
    }

    fn step(&mut self) {
        self.single_step();
    }

    fn program_counter(&self) -> u16 {
        self.registers.program_counter
    }

    fn set_program_counter(&mut self, pc: u16) {
        self.registers.program_counter = pc;
    }

    fn push_stack16(&mut self, value: u16) {
        for byte in value.to_be_bytes() {
            let sp = self.registers.stack_pointer.0;
            self.memory.write(STACK_PAGE | u16::from(sp), byte);
            self.registers.stack_pointer = StackPointer(sp.wrapping_sub(1));
        }
    }

    fn set_carry_flag(&mut self) {
        self.registers.status.insert(Status::PS_CARRY);
    }

    fn set_zero_flag(&mut self) {
        self.registers.status.insert(Status::PS_ZERO);
    }

    fn bus(&self) -> &C64Bus {
        &self.memory
    }

    fn bus_mut(&mut self) -> &mut C64Bus {
        &mut self.memory
    }
}
