//! C64 system orchestration.
//!
//! `C64System` owns the CPU (and through it the bus), the scheduler, the
//! compositor and the frame. One call to [`C64System::tick`] is one host
//! frame, always in this order:
//!
//! 1. run the CPU for the frame's instruction budget (skipped while idle)
//! 2. deliver the pending host key, if any
//! 3. draw the backdrop, the text layer and the cursor
//!
//! The backdrop is pre-rendered into its own layer and only redrawn when the
//! guest changes it; each frame starts by blitting that layer.
//!
//! The host presents the frame afterwards, so the cursor position drawn
//! always reflects guest state after this frame's CPU burst.

use super::c64_bus::{Backdrop, C64Bus};
use super::compositor::{Compositor, TextSources};
use super::cpu::{new_cpu, C64Cpu, CpuUnit};
use super::framebuffer::Framebuffer;
use super::keyboard;
use super::palette::PALETTE;
use super::scheduler::{KeyDelivery, RunState, Scheduler};
use crate::config::{MachineConfig, RomSet};

/// Commodore 64 running BASIC.
pub struct C64System<C: CpuUnit = C64Cpu> {
    cpu: C,
    config: MachineConfig,
    scheduler: Scheduler,
    compositor: Compositor,
    backdrop_layer: Framebuffer,
    layer_backdrop: Option<Backdrop>,
    frame: Framebuffer,
    frame_count: u64,
}

impl C64System<C64Cpu> {
    /// Power on a machine with the `mos6502` core.
    pub fn new(config: MachineConfig, roms: RomSet) -> Self {
        let bus = C64Bus::new(roms, &config);
        Self::with_cpu(config, new_cpu(bus))
    }
}

impl<C: CpuUnit> C64System<C> {
    /// Power on a machine around an already-built CPU.
    ///
    /// The CPU is reset here, so its bus must already hold the ROMs.
    pub fn with_cpu(config: MachineConfig, mut cpu: C) -> Self {
        cpu.reset();
        log::info!(
            "C64 started at ${:04X}, {} instructions per frame",
            cpu.program_counter(),
            config.instructions_per_frame
        );

        Self {
            cpu,
            scheduler: Scheduler::new(&config),
            compositor: Compositor::new(&config),
            backdrop_layer: Framebuffer::new(config.screen_width(), config.screen_height()),
            layer_backdrop: None,
            frame: Framebuffer::new(config.screen_width(), config.screen_height()),
            frame_count: 0,
            config,
        }
    }

    /// Reset the CPU and scheduler. RAM and register state are kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.scheduler = Scheduler::new(&self.config);
        log::info!("Reset, PC=${:04X}", self.cpu.program_counter());
    }

    /// Run one host frame and return the composed picture.
    ///
    /// `key` is the host key pressed this frame; `None` and `Some(0)` both
    /// mean no key.
    pub fn tick(&mut self, key: Option<u8>) -> &Framebuffer {
        self.scheduler.run_frame(&mut self.cpu);

        if let Some(key) = key.filter(|&k| k != 0) {
            self.scheduler.deliver_key(&mut self.cpu, key);
        }

        let draw_cursor = self.scheduler.tick_cursor();
        self.compose(draw_cursor);
        self.frame_count += 1;
        &self.frame
    }

    fn compose(&mut self, draw_cursor: bool) {
        let bus = self.cpu.bus();

        let backdrop = bus.backdrop();
        if self.layer_backdrop != Some(backdrop) {
            match backdrop {
                Backdrop::Gradient { top, bottom } => {
                    self.backdrop_layer.vertical_gradient(top, bottom)
                }
                Backdrop::Solid(color) => self.backdrop_layer.fill(color),
            }
            self.layer_backdrop = Some(backdrop);
        }
        self.frame.blit(&self.backdrop_layer, 0, 0);

        let space = bus.address_space();
        let sources = TextSources {
            cells: space.ram_range(self.config.video_base, self.compositor.cell_count()),
            foreground: Some(space.color_ram().as_slice()),
            background: None,
            glyphs: space.glyphs(),
            palette: &PALETTE,
        };
        self.compositor.render(&mut self.frame, &sources, 0, 0);

        if draw_cursor {
            if let Some(rect) = self.scheduler.cursor_rect(bus) {
                self.frame
                    .fill_rect(rect.x, rect.y, rect.width, rect.height, rect.color);
            }
        }
    }

    /// Deliver a key outside of `tick`.
    pub fn press_key(&mut self, key: u8) -> KeyDelivery {
        self.scheduler.deliver_key(&mut self.cpu, key)
    }

    /// The last composed frame.
    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    /// Frames ticked since power-on.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current scheduler state.
    pub fn state(&self) -> RunState {
        self.scheduler.state()
    }

    /// True while BASIC is waiting for a key.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Current program counter.
    pub fn pc(&self) -> u16 {
        self.cpu.program_counter()
    }

    /// Read RAM directly, bypassing bank switching.
    pub fn peek(&self, addr: u16) -> u8 {
        self.cpu.bus().peek(addr)
    }

    /// Write RAM directly, bypassing bank switching.
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.cpu.bus_mut().poke(addr, value);
    }

    /// Read a byte as the CPU would see it.
    pub fn read_memory(&self, addr: u16) -> u8 {
        self.cpu.bus().read(addr)
    }

    /// Write a byte as the CPU would.
    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.cpu.bus_mut().write(addr, value);
    }

    /// The memory bus.
    pub fn bus(&self) -> &C64Bus {
        self.cpu.bus()
    }

    /// The CPU.
    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    /// Get mutable access to the CPU.
    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    /// The configuration this machine was built with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The text screen as ASCII, one line per row, trailing blanks removed.
    pub fn screen_text(&self) -> String {
        let columns = self.config.text_columns;
        let cells = self
            .cpu
            .bus()
            .address_space()
            .ram_range(self.config.video_base, self.config.cell_count());

        cells
            .chunks(columns.max(1))
            .map(|row| {
                let line: String = row.iter().map(|&c| keyboard::screen_code_to_char(c)).collect();
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// KERNAL that sets the keyboard limit and enters the wait loop.
    fn idle_roms() -> RomSet {
        let mut kernal = vec![0xEA; 8192];
        // $E000: LDA #$0A / STA $0289 / JMP $E5CD
        kernal[0x0000..0x0008].copy_from_slice(&[0xA9, 0x0A, 0x8D, 0x89, 0x02, 0x4C, 0xCD, 0xE5]);
        // $E5CD: JMP $E5CD
        kernal[0x05CD..0x05D0].copy_from_slice(&[0x4C, 0xCD, 0xE5]);
        kernal[0x1FFC] = 0x00;
        kernal[0x1FFD] = 0xE0;
        RomSet::new(&[0; 8192], &kernal, &[0; 4096]).unwrap()
    }

    #[test]
    fn test_new_system() {
        let c64 = C64System::new(MachineConfig::default(), idle_roms());
        assert_eq!(c64.pc(), 0xE000);
        assert_eq!(c64.state(), RunState::Running);
        assert_eq!(c64.frame_count(), 0);
        assert_eq!(c64.peek(0x0001), 7);
        assert_eq!(c64.frame().width(), 320);
        assert_eq!(c64.frame().height(), 200);
    }

    #[test]
    fn test_tick_goes_idle() {
        let mut c64 = C64System::new(MachineConfig::default(), idle_roms());
        c64.tick(None);
        assert!(c64.is_idle());
        assert_eq!(c64.pc(), 0xE5CD);
        assert_eq!(c64.frame_count(), 1);
    }

    #[test]
    fn test_zero_key_is_no_key() {
        let mut c64 = C64System::new(MachineConfig::default(), idle_roms());
        c64.tick(None);
        c64.tick(Some(0));
        assert!(c64.is_idle());
        assert_eq!(c64.peek(0x00C6), 0);
    }

    #[test]
    fn test_key_is_buffered() {
        let mut c64 = C64System::new(MachineConfig::default(), idle_roms());
        c64.tick(None);
        c64.tick(Some(b'A'));

        assert_eq!(c64.peek(0x0277), b'A');
        assert_eq!(c64.peek(0x00C6), 1);
        assert_eq!(c64.state(), RunState::Running);
    }

    #[test]
    fn test_backdrop_drawn() {
        let mut c64 = C64System::new(MachineConfig::default(), idle_roms());
        let frame = c64.tick(None);
        // Row 0 outside the cursor cell shows the top of the gradient
        assert_eq!(frame.pixel(100, 0), Some(0xFFCC_DD22));

        c64.write_memory(0xD021, 0x06);
        c64.press_key(b' ');
        let frame = c64.tick(None);
        assert_eq!(frame.pixel(319, 199), Some(PALETTE[6]));
        assert_eq!(frame.pixel(100, 0), Some(PALETTE[6]));

        // A later change replaces the cached layer
        c64.write_memory(0xD021, 0x02);
        let frame = c64.tick(None);
        assert_eq!(frame.pixel(319, 199), Some(PALETTE[2]));
    }

    #[test]
    fn test_text_does_not_stick_to_backdrop() {
        let mut c64 = C64System::new(MachineConfig::default(), idle_roms());
        c64.write_memory(0xD021, 0x06);
        c64.tick(None);

        // Cursor cell drawn over the backdrop in one frame is gone once hidden
        let hidden = (0..crate::system::BLINK_PERIOD)
            .map(|_| c64.tick(None).pixel(0, 0))
            .last()
            .flatten();
        assert_eq!(hidden, Some(PALETTE[6]));
    }

    #[test]
    fn test_screen_text() {
        let mut c64 = C64System::new(MachineConfig::default(), idle_roms());
        for addr in 0x0400..0x0400 + 1000 {
            c64.poke(addr, 0x20);
        }
        // "HI" in screen codes, second row "1"
        c64.poke(0x0400, 0x08);
        c64.poke(0x0401, 0x09);
        c64.poke(0x0428, 0x31);

        let text = c64.screen_text();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[0], "HI");
        assert_eq!(lines[1], "1");
        assert_eq!(lines[24], "");
    }
}
