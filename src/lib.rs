//! # Commodore 64 BASIC machine
//!
//! Runs the stock BASIC V2 and KERNAL ROMs well enough for interactive use,
//! without emulating the interrupt-driven chips behind the keyboard and
//! cursor.
//!
//! ## Architecture
//!
//! - **Bus decoder**: the bank-select cell at $01 picks one of eight
//!   priority chains deciding whether BASIC, KERNAL, character ROM, the
//!   register blocks or RAM answers a read. Writes go to RAM unless the
//!   register window is enabled, in which case they are captured in a
//!   shadow buffer and dispatched to the VIC-II, SID, CIA or color RAM.
//! - **Scheduler**: runs the CPU for a fixed instruction budget per frame
//!   and parks it once it reaches the KERNAL "wait for key" loop. Host keys
//!   go straight into the KERNAL keyboard buffer and wake it up.
//! - **Compositor**: draws the 40x25 text screen from video RAM, color RAM
//!   and the character ROM over a backdrop, plus a blinking cursor.
//!
//! Instruction execution is delegated to the `mos6502` crate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use c64_basic::{C64System, MachineConfig, RomSet};
//! use std::path::Path;
//!
//! let roms = RomSet::from_dir(Path::new("roms"))?;
//! let mut c64 = C64System::new(MachineConfig::default(), roms);
//!
//! // Run frames until BASIC is waiting for input
//! while !c64.is_idle() {
//!     c64.tick(None);
//! }
//! println!("{}", c64.screen_text());
//! ```
//!
//! ## Module Organization
//!
//! - `devices`: bank-select decoding and the register blocks
//! - `system`: bus, CPU adapter, scheduler, compositor and host loop
//! - `config`: tunables and ROM loading

pub mod config;
pub mod devices;
pub mod error;
pub mod system;

// WASM bindings (optional, enabled with "wasm" feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use config::{guest, MachineConfig, RomSet};
pub use devices::{BankSelect, RegisterRead, RegisterWrite, Source};
pub use error::{Error, Result};
pub use system::{
    Backdrop, C64Bus, C64Cpu, C64System, CpuUnit, FramePacer, Framebuffer, HeadlessHost, Host,
    KeyDelivery, RunState, PALETTE,
};
