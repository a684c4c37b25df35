//! C64 BASIC binary.
//!
//! Opens a minifb window showing the text screen, or runs headless for a
//! fixed number of frames and prints the screen as text.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use c64_basic::system::keyboard::{self, keys};
use c64_basic::system::{run, FramePacer, HeadlessHost, Host};
use c64_basic::{C64System, Error, Framebuffer, MachineConfig, Result, RomSet};
use minifb::{InputCallback, Key, KeyRepeat, Scale, Window, WindowOptions};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    rom_dir: PathBuf,
    headless: bool,
    frames: u64,
    type_text: Option<String>,
    lowercase: bool,
    scale: Scale,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        rom_dir: std::env::var_os("C64_ROM_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("roms")),
        headless: false,
        frames: 300,
        type_text: None,
        lowercase: false,
        scale: Scale::X2,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rom-dir" => {
                i += 1;
                if let Some(dir) = args.get(i) {
                    cli.rom_dir = PathBuf::from(dir);
                }
            }
            "--headless" => {
                cli.headless = true;
            }
            "--frames" => {
                i += 1;
                if let Some(s) = args.get(i) {
                    cli.frames = s.parse().unwrap_or(300);
                }
            }
            "--type" => {
                i += 1;
                cli.type_text = args.get(i).map(|s| s.replace("\\n", "\n"));
            }
            "--lowercase" => {
                cli.lowercase = true;
            }
            "--scale" => {
                i += 1;
                cli.scale = match args.get(i).map(String::as_str) {
                    Some("1") => Scale::X1,
                    Some("4") => Scale::X4,
                    _ => Scale::X2,
                };
            }
            "--help" | "-h" => {
                eprintln!("Usage: c64-basic [OPTIONS]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --rom-dir <dir>   Directory holding the ROM images [default: $C64_ROM_DIR or roms]");
                eprintln!("  --headless        Run without a window and print the screen");
                eprintln!("  --frames <n>      Number of frames in headless mode [default: 300]");
                eprintln!("  --type <text>     Type text into BASIC (use \\n for Return)");
                eprintln!("  --lowercase       Use the lower-case character set");
                eprintln!("  --scale <1|2|4>   Window scale [default: 2]");
                eprintln!();
                eprintln!("Keys: Tab acts as RUN/STOP, Escape closes the window.");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

// ---------------------------------------------------------------------------
// Window host (minifb)
// ---------------------------------------------------------------------------

/// Collects typed characters from the window's text input.
struct TypedChars(Rc<RefCell<VecDeque<u8>>>);

impl InputCallback for TypedChars {
    fn add_char(&mut self, uni_char: u32) {
        // Control keys arrive through `get_keys_pressed` instead
        if let Some(code) = char::from_u32(uni_char)
            .filter(|c| !c.is_control())
            .and_then(keyboard::host_code_for_char)
        {
            self.0.borrow_mut().push_back(code);
        }
    }
}

struct WindowHost {
    window: Window,
    keys: Rc<RefCell<VecDeque<u8>>>,
}

impl WindowHost {
    fn open(width: usize, height: usize, scale: Scale) -> Result<Self> {
        let options = WindowOptions {
            scale,
            ..WindowOptions::default()
        };
        let mut window = Window::new("C64 BASIC", width, height, options)
            .map_err(|e| Error::Host(e.to_string()))?;

        let keys = Rc::new(RefCell::new(VecDeque::new()));
        window.set_input_callback(Box::new(TypedChars(Rc::clone(&keys))));

        Ok(Self { window, keys })
    }
}

fn control_key_code(key: Key) -> Option<u8> {
    match key {
        Key::Enter | Key::NumPadEnter => Some(keys::RETURN),
        Key::Backspace | Key::Delete => Some(keys::BACKSPACE),
        Key::Tab => Some(keys::TAB),
        Key::Left => Some(keys::LEFT),
        Key::Right => Some(keys::RIGHT),
        Key::Up => Some(keys::UP),
        Key::Down => Some(keys::DOWN),
        _ => None,
    }
}

impl Host for WindowHost {
    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn poll_key(&mut self) -> Option<u8> {
        let mut queue = self.keys.borrow_mut();
        queue.extend(
            self.window
                .get_keys_pressed(KeyRepeat::Yes)
                .into_iter()
                .filter_map(control_key_code),
        );
        queue.pop_front()
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<()> {
        self.window
            .update_with_buffer(frame.pixels(), frame.width(), frame.height())
            .map_err(|e| Error::Host(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn run_app(cli: &CliArgs) -> Result<()> {
    let config = MachineConfig {
        code_page_offset: if cli.lowercase { 256 } else { 0 },
        ..MachineConfig::default()
    };
    let roms = RomSet::from_dir(&cli.rom_dir)?;
    let mut c64 = C64System::new(config.clone(), roms);

    if cli.headless {
        let mut host = HeadlessHost::new(cli.frames);
        if let Some(text) = &cli.type_text {
            host.type_text(text);
        }
        run(&mut c64, &mut host, &mut FramePacer::new(0))?;
        println!("{}", c64.screen_text());
        return Ok(());
    }

    let mut host = WindowHost::open(config.screen_width(), config.screen_height(), cli.scale)?;
    if let Some(text) = &cli.type_text {
        host.keys
            .borrow_mut()
            .extend(text.chars().filter_map(keyboard::host_code_for_char));
    }
    run(&mut c64, &mut host, &mut FramePacer::new(config.frame_interval_ms))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = parse_args();
    if let Err(e) = run_app(&cli) {
        log::error!("{e}");
        process::exit(1);
    }
}
