//! C64 system integration: bus, CPU, scheduling, and display.
//!
//! This module provides the top-level `C64System` that ties the CPU, the
//! bank-switched bus, the execution scheduler and the text compositor
//! together, plus the host-facing frame loop.

mod address_space;
mod c64_bus;
mod c64_system;
pub mod compositor;
mod cpu;
mod framebuffer;
pub mod host;
pub mod keyboard;
pub mod palette;
pub mod scheduler;

pub use address_space::{AddressSpace, IO_SIZE, IO_START};
pub use c64_bus::{Backdrop, C64Bus, IoRegion, BACKDROP_BOTTOM, BACKDROP_TOP};
pub use c64_system::C64System;
pub use compositor::{Compositor, TextSources, DEFAULT_TILE_COLOR};
pub use cpu::{new_cpu, C64Cpu, CpuUnit, RESET_VECTOR};
pub use framebuffer::{blend, Framebuffer};
pub use host::{run, FramePacer, HeadlessHost, Host};
pub use keyboard::{translate, GuestKey};
pub use palette::PALETTE;
pub use scheduler::{CursorBlink, CursorRect, KeyDelivery, RunState, Scheduler, BLINK_PERIOD};
