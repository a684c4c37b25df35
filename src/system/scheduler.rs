//! Execution scheduler.
//!
//! The guest has no working interrupt sources, so the KERNAL would never see
//! a key press on its own. Instead the scheduler:
//!
//! - runs the CPU for a fixed instruction budget per host frame,
//! - stops early and goes idle as soon as the program counter reaches the
//!   entry of the KERNAL "wait for key" loop,
//! - does not step the CPU at all while idle,
//! - places host key presses straight into the KERNAL keyboard buffer and
//!   resumes the CPU,
//! - blinks a stand-in cursor while idle.
//!
//! The STOP key is a special case: it fakes the break the KERNAL would take
//! on a real interrupt by pushing PC, setting carry and zero, and jumping to
//! the BASIC stop routine.

use super::c64_bus::C64Bus;
use super::cpu::CpuUnit;
use super::keyboard::{self, GuestKey};
use super::palette;
use crate::config::{guest, MachineConfig};

/// Frames between cursor visibility toggles while idle.
pub const BLINK_PERIOD: u32 = 7;

/// Whether the guest CPU is being stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Stepping up to the instruction budget each frame.
    Running,
    /// Parked in the keyboard-wait loop until a key arrives.
    Idle,
}

/// Software cursor blink phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBlink {
    visible: bool,
    counter: u32,
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self {
            visible: true,
            counter: 0,
        }
    }
}

impl CursorBlink {
    /// Back to visible with a fresh period.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one frame. Returns true when visibility toggled.
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter == BLINK_PERIOD {
            self.counter = 0;
            self.visible = !self.visible;
            true
        } else {
            false
        }
    }

    /// Whether the cursor is in its visible phase.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Frames since the last toggle.
    pub fn counter(&self) -> u32 {
        self.counter
    }
}

/// What happened to a delivered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDelivery {
    /// Stored in the keyboard buffer at this address.
    Buffered { slot: u16 },
    /// Handled as the STOP key.
    Break,
    /// The keyboard buffer was full.
    Dropped,
}

/// A filled cell-sized rectangle drawn for the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub color: u32,
}

/// Drives the CPU frame by frame and feeds it keys.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: RunState,
    blink: CursorBlink,
    budget: u32,
    sentinel: u16,
    break_vector: u16,
    text_rows: usize,
    text_columns: usize,
}

impl Scheduler {
    /// A running scheduler.
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            state: RunState::Running,
            blink: CursorBlink::default(),
            budget: config.instructions_per_frame,
            sentinel: config.wait_sentinel,
            break_vector: config.break_vector,
            text_rows: config.text_rows,
            text_columns: config.text_columns,
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// True while parked in the keyboard-wait loop.
    pub fn is_idle(&self) -> bool {
        self.state == RunState::Idle
    }

    /// Current cursor blink phase.
    pub fn blink(&self) -> CursorBlink {
        self.blink
    }

    /// Run one frame's worth of instructions.
    ///
    /// Returns the number of instructions executed (0 while idle).
    pub fn run_frame<C: CpuUnit>(&mut self, cpu: &mut C) -> u32 {
        if self.state == RunState::Idle {
            return 0;
        }

        for executed in 1..=self.budget {
            cpu.step();
            if cpu.program_counter() == self.sentinel {
                self.state = RunState::Idle;
                log::debug!("Paused at ${:04X} after {} instructions", self.sentinel, executed);
                return executed;
            }
        }
        self.budget
    }

    /// Deliver one host key press and resume the CPU.
    pub fn deliver_key<C: CpuUnit>(&mut self, cpu: &mut C, host_key: u8) -> KeyDelivery {
        self.blink.reset();

        let delivery = match keyboard::translate(host_key) {
            GuestKey::Break => {
                let pc = cpu.program_counter();
                cpu.push_stack16(pc);
                cpu.set_carry_flag();
                cpu.set_zero_flag();
                cpu.set_program_counter(self.break_vector);
                log::info!("Break at ${:04X}, jumping to ${:04X}", pc, self.break_vector);
                KeyDelivery::Break
            }
            GuestKey::Char(code) => buffer_key(cpu.bus_mut(), code),
        };

        if self.state == RunState::Idle {
            log::debug!("Resuming on key {}", host_key);
        }
        self.state = RunState::Running;
        delivery
    }

    /// Advance the cursor blink for this frame.
    ///
    /// Returns whether the cursor should be drawn; never while running.
    pub fn tick_cursor(&mut self) -> bool {
        if self.state != RunState::Idle {
            return false;
        }
        self.blink.advance();
        self.blink.is_visible()
    }

    /// Where the guest says the cursor is, in its current text color.
    ///
    /// `None` when the cursor cell lies outside the text grid.
    pub fn cursor_rect(&self, bus: &C64Bus) -> Option<CursorRect> {
        let column = bus.peek(guest::CURSOR_COLUMN) as usize;
        let row = bus.peek(guest::CURSOR_ROW) as usize;
        if column >= self.text_columns || row >= self.text_rows {
            return None;
        }
        Some(CursorRect {
            x: column * 8,
            y: row * 8,
            width: 8,
            height: 8,
            color: palette::color(bus.peek(guest::TEXT_COLOR)),
        })
    }
}

/// Append a key to the KERNAL keyboard buffer.
///
/// The KERNAL count at $C6 is both the next free slot and the
/// key-available flag. The limit is the KERNAL's own at $0289, never more
/// than the buffer holds.
fn buffer_key(bus: &mut C64Bus, code: u8) -> KeyDelivery {
    let limit = bus.peek(guest::KEYBOARD_LIMIT).min(guest::KEYBOARD_CAPACITY);
    let count = bus.peek(guest::KEYBOARD_COUNT);
    if count >= limit {
        log::warn!("Keyboard buffer full, dropping key {}", code);
        return KeyDelivery::Dropped;
    }

    let slot = guest::KEYBOARD_BUFFER + u16::from(count);
    bus.poke(slot, code);
    bus.poke(guest::KEYBOARD_COUNT, count + 1);
    KeyDelivery::Buffered { slot }
}
