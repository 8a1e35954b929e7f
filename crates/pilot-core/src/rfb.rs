//! Encoders for the three RFB client-to-server input messages.
//!
//! Wire formats (RFC 6143 §7.5), all integers big-endian:
//! ```text
//! KeyEvent       [type=4:1][down:1][padding:2][keysym:4]            8 bytes
//! PointerEvent   [type=5:1][button-mask:1][x:2][y:2]                6 bytes
//! ClientCutText  [type=6:1][padding:3][length:4][text:length]       8+N bytes
//! ```
//!
//! The handshake, security negotiation and framebuffer messages belong to the
//! session layer in front of the link and are not encoded here.

use tracing::warn;

use crate::input::ButtonMask;

pub const KEY_EVENT: u8 = 4;
pub const POINTER_EVENT: u8 = 5;
pub const CLIENT_CUT_TEXT: u8 = 6;

pub const KEY_EVENT_LEN: usize = 8;
pub const POINTER_EVENT_LEN: usize = 6;

/// Encodes a `KeyEvent` message.
pub fn encode_key_event(keysym: u32, down: bool) -> [u8; KEY_EVENT_LEN] {
    let mut buf = [0u8; KEY_EVENT_LEN];
    buf[0] = KEY_EVENT;
    buf[1] = u8::from(down);
    buf[4..8].copy_from_slice(&keysym.to_be_bytes());
    buf
}

/// Encodes a `PointerEvent` message.
///
/// RFB positions are 16-bit; larger coordinates are clamped to `u16::MAX`.
pub fn encode_pointer_event(x: u32, y: u32, mask: ButtonMask) -> [u8; POINTER_EVENT_LEN] {
    let x = u16::try_from(x).unwrap_or(u16::MAX);
    let y = u16::try_from(y).unwrap_or(u16::MAX);
    let mut buf = [0u8; POINTER_EVENT_LEN];
    buf[0] = POINTER_EVENT;
    buf[1] = mask.0;
    buf[2..4].copy_from_slice(&x.to_be_bytes());
    buf[4..6].copy_from_slice(&y.to_be_bytes());
    buf
}

/// Converts `text` to ISO 8859-1, returning the bytes and how many characters
/// had to be replaced with `?`.
fn to_latin1(text: &str) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let bytes = text
        .chars()
        .map(|c| {
            u8::try_from(u32::from(c)).unwrap_or_else(|_| {
                replaced += 1;
                b'?'
            })
        })
        .collect();
    (bytes, replaced)
}

/// Encodes a `ClientCutText` message.
///
/// The RFB cut buffer is ISO 8859-1; characters outside Latin-1 are sent as
/// `?` and a warning is logged.
pub fn encode_client_cut_text(text: &str) -> Vec<u8> {
    let (latin1, replaced) = to_latin1(text);
    if replaced > 0 {
        warn!(replaced, "clipboard text is not Latin-1; replaced characters with '?'");
    }

    let mut buf = Vec::with_capacity(8 + latin1.len());
    buf.push(CLIENT_CUT_TEXT);
    buf.extend_from_slice(&[0, 0, 0]);
    buf.extend_from_slice(&(latin1.len() as u32).to_be_bytes());
    buf.extend_from_slice(&latin1);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_layout() {
        assert_eq!(
            encode_key_event(0xFF0D, true),
            [4, 1, 0, 0, 0x00, 0x00, 0xFF, 0x0D]
        );
        assert_eq!(encode_key_event(0x61, false)[1], 0);
    }

    #[test]
    fn test_pointer_event_layout() {
        let bytes = encode_pointer_event(0x0102, 0x0304, ButtonMask(ButtonMask::LEFT));
        assert_eq!(bytes, [5, 1, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_pointer_event_clamps_large_coordinates() {
        let bytes = encode_pointer_event(70_000, 5, ButtonMask::NONE);
        assert_eq!(&bytes[2..4], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_client_cut_text_layout() {
        let bytes = encode_client_cut_text("hé");
        assert_eq!(bytes, vec![6, 0, 0, 0, 0, 0, 0, 2, b'h', 0xE9]);
    }

    #[test]
    fn test_client_cut_text_replaces_non_latin1() {
        let bytes = encode_client_cut_text("a€");
        assert_eq!(&bytes[8..], b"a?");
    }

    #[test]
    fn test_latin1_conversion_counts_replacements() {
        assert_eq!(to_latin1("a€b😀"), (vec![b'a', b'?', b'b', b'?'], 2));
        assert_eq!(to_latin1("café"), (vec![b'c', b'a', b'f', 0xE9], 0));
    }
}
