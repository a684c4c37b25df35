//! WebAssembly bindings for the C64 BASIC machine.
//!
//! This module provides JavaScript-callable APIs for running the machine in
//! a web browser. The page owns the frame loop: it calls `tick` about every
//! 33ms with the key pressed since the previous call, then draws the ARGB
//! pixels from `framebuffer`.

use wasm_bindgen::prelude::*;

use crate::config::{MachineConfig, RomSet};
use crate::system::{keyboard, C64System, KeyDelivery};

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

/// Route crate diagnostics to the browser console.
///
/// `level` is one of "error", "warn", "info", "debug" or "trace"; anything
/// else keeps the default of "warn". Calling it twice only changes the level.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
    // A second call finds the logger already installed
    let _ = log::set_logger(&CONSOLE_LOGGER);
    log::set_max_level(filter);
}

/// WASM wrapper for the C64 system.
#[wasm_bindgen]
pub struct C64Emulator {
    system: C64System,
}

#[wasm_bindgen]
impl C64Emulator {
    /// Power on a machine from the BASIC, KERNAL and character ROM images.
    #[wasm_bindgen(constructor)]
    pub fn new(basic: &[u8], kernal: &[u8], charrom: &[u8]) -> Result<C64Emulator, JsValue> {
        let roms = RomSet::new(basic, kernal, charrom)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            system: C64System::new(MachineConfig::default(), roms),
        })
    }

    /// Reset the CPU and scheduler.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.system.reset();
    }

    /// Run one frame. `key` is a host key code, 0 for none.
    #[wasm_bindgen]
    pub fn tick(&mut self, key: u8) {
        self.system.tick(Some(key));
    }

    /// Deliver typed text straight into the keyboard buffer.
    ///
    /// Returns how many characters were buffered; the rest were dropped
    /// because the buffer filled up.
    #[wasm_bindgen]
    pub fn type_text(&mut self, text: &str) -> u32 {
        let mut buffered = 0;
        for code in text.chars().filter_map(keyboard::host_code_for_char) {
            if let KeyDelivery::Buffered { .. } = self.system.press_key(code) {
                buffered += 1;
            }
        }
        buffered
    }

    /// The current frame as ARGB32 pixels, row-major.
    #[wasm_bindgen]
    pub fn framebuffer(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(self.system.frame().pixels())
    }

    /// Frame width in pixels.
    #[wasm_bindgen]
    pub fn width(&self) -> u32 {
        self.system.frame().width() as u32
    }

    /// Frame height in pixels.
    #[wasm_bindgen]
    pub fn height(&self) -> u32 {
        self.system.frame().height() as u32
    }

    /// Suggested delay between ticks in milliseconds.
    #[wasm_bindgen]
    pub fn frame_interval_ms(&self) -> u32 {
        self.system.config().frame_interval_ms as u32
    }

    /// Get the current frame count.
    #[wasm_bindgen]
    pub fn frame_count(&self) -> u64 {
        self.system.frame_count()
    }

    /// True while BASIC is waiting for a key.
    #[wasm_bindgen]
    pub fn is_idle(&self) -> bool {
        self.system.is_idle()
    }

    /// Read RAM directly.
    #[wasm_bindgen]
    pub fn peek(&self, addr: u16) -> u8 {
        self.system.peek(addr)
    }

    /// Write RAM directly.
    #[wasm_bindgen]
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.system.poke(addr, value);
    }

    /// Get the program counter.
    #[wasm_bindgen]
    pub fn pc(&self) -> u16 {
        self.system.pc()
    }

    /// The text screen as ASCII lines.
    #[wasm_bindgen]
    pub fn screen_text(&self) -> String {
        self.system.screen_text()
    }
}
