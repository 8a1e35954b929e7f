//! Character → KeySym resolution used when typing text.

use super::x11::{UNICODE_KEYSYM_BASE, XK_RETURN, XK_TAB};
use super::KeyCode;

/// Symbols that sit on the shifted layer of a US keyboard.
///
/// They keep their own KeySym; the flag only tells the typist to hold Shift
/// around the key so the remote side sees the same modifier state a person
/// would produce.
const SHIFTED_SYMBOLS: &[char] = &[
    '~', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '{', '}', '|', ':', '"', '<',
    '>', '?',
];

/// Resolves a single character to a [`KeyCode`].
///
/// Returns `None` for characters that cannot be typed (control codes); callers
/// typing text skip those silently.
///
/// # Examples
///
/// ```rust
/// use pilot_core::keysym::resolve_char;
///
/// let a = resolve_char('A').unwrap();
/// assert_eq!(a.keysym(), 0x61);
/// assert!(a.shift_required());
///
/// assert_eq!(resolve_char('é').unwrap().keysym(), 0x0100_00E9);
/// assert!(resolve_char('\u{7}').is_none());
/// ```
pub fn resolve_char(ch: char) -> Option<KeyCode> {
    let scalar = u32::from(ch);
    match ch {
        'A'..='Z' => Some(KeyCode::new(u32::from(ch.to_ascii_lowercase()), true)),
        c if SHIFTED_SYMBOLS.contains(&c) => Some(KeyCode::new(scalar, true)),
        ' '..='~' => Some(KeyCode::new(scalar, false)),
        '\n' | '\r' => Some(KeyCode::new(XK_RETURN, false)),
        '\t' => Some(KeyCode::new(XK_TAB, false)),
        c if c.is_control() => None,
        _ => Some(KeyCode::new(UNICODE_KEYSYM_BASE + scalar, false)),
    }
}
