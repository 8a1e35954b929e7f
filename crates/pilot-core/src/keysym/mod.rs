//! Key name and character resolution to X11 KeySyms.
//!
//! Every function here is pure: no global state, no I/O.  Callers hand in a
//! key name (`"ctrl"`, `"Return"`, `"a"`) or a character and get back a
//! [`KeyCode`] carrying the KeySym plus whether Shift must be held.
//!
//! # Sub-modules
//!
//! - **`x11`** – KeySym constants and the symbolic name table.
//! - **`chars`** – Character → KeySym mapping used by text typing.

pub mod chars;
pub mod x11;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub use chars::resolve_char;

/// Error returned when a key name cannot be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeysymError {
    #[error("unknown key: {0:?}")]
    UnknownKey(String),
}

/// A resolved key: the X11 KeySym and whether Shift must be held to produce it.
///
/// Only the resolver functions in this module construct `KeyCode`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode {
    keysym: u32,
    shift_required: bool,
}

impl KeyCode {
    pub(crate) fn new(keysym: u32, shift_required: bool) -> Self {
        Self {
            keysym,
            shift_required,
        }
    }

    /// The X11 KeySym sent in RFB `KeyEvent` messages.
    pub fn keysym(&self) -> u32 {
        self.keysym
    }

    /// `true` if Shift must be held around this key when typing.
    pub fn shift_required(&self) -> bool {
        self.shift_required
    }
}

/// The KeyCode of the left Shift key, used by text typing.
pub fn shift_key() -> KeyCode {
    KeyCode::new(x11::XK_SHIFT_L, false)
}

/// Resolves a symbolic key name, case-insensitively.
///
/// A name of exactly one character falls back to [`resolve_char`], so `"a"`,
/// `"A"` and `"!"` all resolve.
///
/// # Errors
///
/// Returns [`KeysymError::UnknownKey`] if the name is not in the table and is
/// not a single typeable character.
///
/// # Examples
///
/// ```rust
/// use pilot_core::keysym::resolve_name;
///
/// assert_eq!(resolve_name("CMD").unwrap(), resolve_name("super").unwrap());
/// assert_eq!(resolve_name("enter").unwrap().keysym(), 0xFF0D);
/// assert!(resolve_name("nope").is_err());
/// ```
pub fn resolve_name(name: &str) -> Result<KeyCode, KeysymError> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return resolve_char(ch).ok_or_else(|| KeysymError::UnknownKey(name.to_string()));
    }

    let lowered = trimmed.to_ascii_lowercase();
    x11::named_keysym(&lowered)
        .map(|keysym| KeyCode::new(keysym, false))
        .ok_or_else(|| KeysymError::UnknownKey(name.to_string()))
}

/// Resolves one user-perceived character (grapheme cluster).
///
/// Graphemes made of more than one scalar (ZWJ emoji, flags, combining
/// sequences) have no single KeySym and yield `None`.
pub fn resolve_grapheme(grapheme: &str) -> Option<KeyCode> {
    // CRLF is a single grapheme cluster.
    if grapheme == "\r\n" {
        return resolve_char('\n');
    }
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => resolve_char(ch),
        _ => None,
    }
}

/// Splits `text` into graphemes paired with their resolution.
///
/// Unmappable graphemes are kept (as `None`) so callers can log what they skip.
pub fn resolve_text(text: &str) -> Vec<(&str, Option<KeyCode>)> {
    text.graphemes(true)
        .map(|g| (g, resolve_grapheme(g)))
        .collect()
}

/// Resolves a `+`-separated combo string such as `"ctrl+shift+a"`.
///
/// Every token is resolved before anything is returned, so one bad token
/// rejects the whole combo.
///
/// # Errors
///
/// Returns [`KeysymError::UnknownKey`] for the first token that fails, or for
/// an empty token (e.g. `"ctrl++"`).
pub fn resolve_combo(combo: &str) -> Result<Vec<KeyCode>, KeysymError> {
    combo.split('+').map(resolve_name).collect()
}

/// Resolves a list of key names, all-or-nothing.
///
/// # Errors
///
/// Returns [`KeysymError::UnknownKey`] for the first name that fails.
pub fn resolve_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<KeyCode>, KeysymError> {
    names.iter().map(|n| resolve_name(n.as_ref())).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
