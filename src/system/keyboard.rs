//! Host keys and guest text encoding.
//!
//! No keyboard matrix is emulated. A host key press arrives as a single
//! character code, is remapped to the guest's PETSCII encoding, and is then
//! placed directly in the KERNAL keyboard buffer by the scheduler.
//!
//! ## Host code remapping
//!
//! ```text
//! host code        | guest code
//! -----------------|-----------
//!  8  Backspace    |  20  DEL
//!  9  Tab          |  --  STOP (break, never buffered)
//! 24  Cursor left  | 157
//! 25  Cursor right |  29
//! 26  Cursor up    | 145
//! 27  Cursor down  |  17
//! ```
//!
//! Every other code passes through unchanged.

/// Host-side key codes.
pub mod keys {
    pub const BACKSPACE: u8 = 8;
    pub const TAB: u8 = 9;
    pub const RETURN: u8 = 13;
    pub const LEFT: u8 = 24;
    pub const RIGHT: u8 = 25;
    pub const UP: u8 = 26;
    pub const DOWN: u8 = 27;

    /// The host key that acts as the STOP key.
    pub const BREAK: u8 = TAB;
}

/// Guest (PETSCII) control codes.
pub mod petscii {
    pub const RETURN: u8 = 13;
    pub const CURSOR_DOWN: u8 = 17;
    pub const DELETE: u8 = 20;
    pub const CURSOR_RIGHT: u8 = 29;
    pub const CURSOR_UP: u8 = 145;
    pub const CURSOR_LEFT: u8 = 157;
}

/// What a host key press means to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestKey {
    /// A character for the keyboard buffer.
    Char(u8),
    /// The STOP key: handled as a software break.
    Break,
}

/// Remap a host key code to the guest encoding.
pub fn translate(host: u8) -> GuestKey {
    match host {
        keys::BREAK => GuestKey::Break,
        keys::BACKSPACE => GuestKey::Char(petscii::DELETE),
        keys::LEFT => GuestKey::Char(petscii::CURSOR_LEFT),
        keys::RIGHT => GuestKey::Char(petscii::CURSOR_RIGHT),
        keys::UP => GuestKey::Char(petscii::CURSOR_UP),
        keys::DOWN => GuestKey::Char(petscii::CURSOR_DOWN),
        other => GuestKey::Char(other),
    }
}

/// Convert typed host text to a host key code.
///
/// Letters are folded to upper case, which is how the guest encodes
/// unshifted letters. Returns `None` for characters the guest cannot type.
pub fn host_code_for_char(ch: char) -> Option<u8> {
    match ch {
        '\n' | '\r' => Some(keys::RETURN),
        '\u{8}' => Some(keys::BACKSPACE),
        '\t' => Some(keys::TAB),
        'a'..='z' => Some(ch.to_ascii_uppercase() as u8),
        ' '..='_' => Some(ch as u8),
        _ => None,
    }
}

/// Approximate a screen code as printable ASCII.
///
/// Reverse-video codes map like their normal counterparts; graphics
/// characters become `'.'`.
pub fn screen_code_to_char(code: u8) -> char {
    match code & 0x7F {
        0 => '@',
        c @ 1..=26 => (b'A' + c - 1) as char,
        27 => '[',
        28 => '\\',
        29 => ']',
        30 => '^',
        31 => '_',
        c @ 32..=63 => c as char,
        _ => '.',
    }
}
