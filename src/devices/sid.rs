//! SID (MOS 6581) sound register block.
//!
//! Sound is not produced. The block exists so that every access in
//! $D400-$D7FF is named in diagnostics: reads are reported as unimplemented
//! and writes are accepted without effect. The 29 registers repeat every
//! 32 bytes.

use super::{RegisterBlock, RegisterRead, RegisterWrite};

/// Register names, indexed by offset (0-31).
const REGISTER_NAMES: [&str; 32] = [
    "Voice 1 frequency low",
    "Voice 1 frequency high",
    "Voice 1 pulse width low",
    "Voice 1 pulse width high",
    "Voice 1 control register",
    "Voice 1 attack/decay",
    "Voice 1 sustain/release",
    "Voice 2 frequency low",
    "Voice 2 frequency high",
    "Voice 2 pulse width low",
    "Voice 2 pulse width high",
    "Voice 2 control register",
    "Voice 2 attack/decay",
    "Voice 2 sustain/release",
    "Voice 3 frequency low",
    "Voice 3 frequency high",
    "Voice 3 pulse width low",
    "Voice 3 pulse width high",
    "Voice 3 control register",
    "Voice 3 attack/decay",
    "Voice 3 sustain/release",
    "Filter cutoff low",
    "Filter cutoff high",
    "Filter resonance/routing",
    "Volume and filter mode",
    "Paddle X",
    "Paddle Y",
    "Voice 3 oscillator output",
    "Voice 3 envelope output",
    "No register",
    "No register",
    "No register",
];

/// Name of the register at `offset` (already folded into 0-31).
pub fn register_name(offset: u16) -> &'static str {
    REGISTER_NAMES[(offset & 0x1F) as usize]
}

/// MOS 6581 sound register block.
#[derive(Debug, Clone, Default)]
pub struct Sid6581;

impl Sid6581 {
    /// Create the block.
    pub fn new() -> Self {
        Self
    }
}

impl RegisterBlock for Sid6581 {
    fn name(&self) -> &'static str {
        "SID"
    }

    fn mirror_mask(&self) -> u16 {
        0x1F
    }

    fn read(&self, offset: u16) -> RegisterRead {
        log::trace!("SID read ${:02X} {}", offset, register_name(offset));
        RegisterRead::Unimplemented
    }

    fn write(&mut self, offset: u16, value: u8) -> RegisterWrite {
        log::trace!(
            "SID write ${:02X} to ${:02X} {}",
            value,
            offset,
            register_name(offset)
        );
        RegisterWrite::Ignored
    }
}
