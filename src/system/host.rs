//! Host window/input collaborator and the main loop.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

use super::c64_system::C64System;
use super::cpu::CpuUnit;
use super::framebuffer::Framebuffer;
use super::keyboard;
use crate::error::Result;

/// A window (or stand-in) that shows frames and reports key presses.
pub trait Host {
    /// False once the user has closed the window.
    fn is_open(&self) -> bool;

    /// At most one pending key press per frame, as a host key code.
    fn poll_key(&mut self) -> Option<u8>;

    /// Show a finished frame.
    fn present(&mut self, frame: &Framebuffer) -> Result<()>;
}

/// Blocks the loop so frames are at least a fixed interval apart.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            last: None,
        }
    }

    /// Sleep until one interval has passed since the previous call.
    pub fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runs the machine until the host closes.
///
/// Each iteration polls one key, runs one machine tick, presents the frame
/// and then paces.
pub fn run<H: Host, C: CpuUnit>(
    system: &mut C64System<C>,
    host: &mut H,
    pacer: &mut FramePacer,
) -> Result<()> {
    log::info!("Entering main loop");
    while host.is_open() {
        let key = host.poll_key();
        let frame = system.tick(key);
        host.present(frame)?;
        pacer.wait();
    }
    log::info!("Host closed after {} frames", system.frame_count());
    Ok(())
}

/// A host without a window: keys come from a script, frames are counted.
///
/// Closes itself after a fixed number of frames.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    keys: VecDeque<u8>,
    frames: u64,
    frame_limit: u64,
    last_frame: Option<Framebuffer>,
}

impl HeadlessHost {
    /// A host that stays open for `frame_limit` frames.
    pub fn new(frame_limit: u64) -> Self {
        Self {
            frame_limit,
            ..Self::default()
        }
    }

    /// Queue a host key code.
    pub fn push_key(&mut self, key: u8) {
        self.keys.push_back(key);
    }

    /// Queue typed text; characters the guest cannot type are skipped.
    pub fn type_text(&mut self, text: &str) {
        self.keys
            .extend(text.chars().filter_map(keyboard::host_code_for_char));
    }

    /// Keys not delivered yet.
    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The most recently presented frame.
    pub fn last_frame(&self) -> Option<&Framebuffer> {
        self.last_frame.as_ref()
    }
}

impl Host for HeadlessHost {
    fn is_open(&self) -> bool {
        self.frames < self.frame_limit
    }

    fn poll_key(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<()> {
        self.frames += 1;
        match self.last_frame.as_mut() {
            Some(last) => last.clone_from(frame),
            None => self.last_frame = Some(frame.clone()),
        }
        Ok(())
    }
}
