//! X11 KeySym constants and the symbolic key-name table.
//!
//! RFB `KeyEvent` messages carry X11 KeySyms regardless of the remote OS, so
//! these are the only codes the input engine ever sends.
//! Reference: https://gitlab.freedesktop.org/xorg/proto/xorgproto/-/blob/master/include/X11/keysymdef.h
//!
//! # Why lowercase letter KeySyms?
//!
//! Letters are always sent as their *lowercase* KeySym (e.g. 0x0061 for 'a').
//! Capital letters are produced by holding Shift around the lowercase key, the
//! same way a physical keyboard does it.

pub const XK_BACKSPACE: u32 = 0xFF08;
pub const XK_TAB: u32 = 0xFF09;
pub const XK_RETURN: u32 = 0xFF0D;
pub const XK_PAUSE: u32 = 0xFF13;
pub const XK_SCROLL_LOCK: u32 = 0xFF14;
pub const XK_ESCAPE: u32 = 0xFF1B;
pub const XK_HOME: u32 = 0xFF50;
pub const XK_LEFT: u32 = 0xFF51;
pub const XK_UP: u32 = 0xFF52;
pub const XK_RIGHT: u32 = 0xFF53;
pub const XK_DOWN: u32 = 0xFF54;
pub const XK_PAGE_UP: u32 = 0xFF55;
pub const XK_PAGE_DOWN: u32 = 0xFF56;
pub const XK_END: u32 = 0xFF57;
pub const XK_PRINT: u32 = 0xFF61;
pub const XK_INSERT: u32 = 0xFF63;
pub const XK_MENU: u32 = 0xFF67;
pub const XK_NUM_LOCK: u32 = 0xFF7F;
pub const XK_F1: u32 = 0xFFBE;
pub const XK_SHIFT_L: u32 = 0xFFE1;
pub const XK_SHIFT_R: u32 = 0xFFE2;
pub const XK_CONTROL_L: u32 = 0xFFE3;
pub const XK_CONTROL_R: u32 = 0xFFE4;
pub const XK_CAPS_LOCK: u32 = 0xFFE5;
pub const XK_META_L: u32 = 0xFFE7;
pub const XK_META_R: u32 = 0xFFE8;
pub const XK_ALT_L: u32 = 0xFFE9;
pub const XK_ALT_R: u32 = 0xFFEA;
pub const XK_DELETE: u32 = 0xFFFF;
pub const XK_SPACE: u32 = 0x0020;

/// Offset of the X11 Unicode KeySym range (`0x0100_0000 + scalar`).
pub const UNICODE_KEYSYM_BASE: u32 = 0x0100_0000;

/// Looks up a lowercased, trimmed key name in the symbolic table.
///
/// Returns `None` if the name is not a known key; single-character names are
/// handled by the caller.
pub fn named_keysym(name: &str) -> Option<u32> {
    let keysym = match name {
        // Modifiers. Several surface names collapse onto one canonical code.
        "cmd" | "command" | "meta" | "super" | "win" => XK_META_L,
        "rcmd" | "rmeta" => XK_META_R,
        "opt" | "option" | "alt" => XK_ALT_L,
        "ralt" | "altgr" => XK_ALT_R,
        "ctrl" | "control" => XK_CONTROL_L,
        "rctrl" => XK_CONTROL_R,
        "shift" => XK_SHIFT_L,
        "rshift" => XK_SHIFT_R,
        "capslock" => XK_CAPS_LOCK,

        // Editing and whitespace
        "return" | "enter" => XK_RETURN,
        "tab" => XK_TAB,
        "esc" | "escape" => XK_ESCAPE,
        "backspace" => XK_BACKSPACE,
        "delete" | "del" => XK_DELETE,
        "space" => XK_SPACE,
        "insert" => XK_INSERT,

        // Navigation
        "home" => XK_HOME,
        "end" => XK_END,
        "pageup" | "pgup" => XK_PAGE_UP,
        "pagedown" | "pgdn" => XK_PAGE_DOWN,
        "left" => XK_LEFT,
        "up" => XK_UP,
        "right" => XK_RIGHT,
        "down" => XK_DOWN,

        // Misc
        "printscreen" | "print" => XK_PRINT,
        "scrolllock" => XK_SCROLL_LOCK,
        "pause" => XK_PAUSE,
        "menu" => XK_MENU,
        "numlock" => XK_NUM_LOCK,

        _ => return function_key(name),
    };
    Some(keysym)
}

/// `f1`..`f12` map onto the contiguous XK_F1..XK_F12 range.
fn function_key(name: &str) -> Option<u32> {
    let n: u32 = name.strip_prefix('f')?.parse().ok()?;
    (1..=12).contains(&n).then(|| XK_F1 + (n - 1))
}
