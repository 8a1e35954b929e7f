//! Pointer vocabulary shared by the controller, the wire types and the RFB
//! encoder: button masks, button names, scroll directions and the remote
//! platform flag.

use serde::{Deserialize, Serialize};

/// RFB pointer button mask: which buttons / scroll directions are held.
///
/// Bits combine, e.g. `ButtonMask(ButtonMask::LEFT | ButtonMask::RIGHT)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    pub const LEFT: u8 = 1 << 0;
    pub const MIDDLE: u8 = 1 << 1;
    pub const RIGHT: u8 = 1 << 2;
    pub const SCROLL_UP: u8 = 1 << 3;
    pub const SCROLL_DOWN: u8 = 1 << 4;
    pub const SCROLL_LEFT: u8 = 1 << 5;
    pub const SCROLL_RIGHT: u8 = 1 << 6;

    /// No buttons held.
    pub const NONE: ButtonMask = ButtonMask(0);

    /// Returns `true` if every bit of `bits` is set.
    pub fn contains(&self, bits: u8) -> bool {
        self.0 & bits == bits
    }

    /// Returns `true` if no button is held.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A clickable pointer button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// The mask held while this button is down.
    pub fn mask(self) -> ButtonMask {
        match self {
            MouseButton::Left => ButtonMask(ButtonMask::LEFT),
            MouseButton::Middle => ButtonMask(ButtonMask::MIDDLE),
            MouseButton::Right => ButtonMask(ButtonMask::RIGHT),
        }
    }
}

/// Scroll wheel direction.  Each tick is a press/release of the matching
/// pseudo-button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn mask(self) -> ButtonMask {
        match self {
            ScrollDirection::Up => ButtonMask(ButtonMask::SCROLL_UP),
            ScrollDirection::Down => ButtonMask(ButtonMask::SCROLL_DOWN),
            ScrollDirection::Left => ButtonMask(ButtonMask::SCROLL_LEFT),
            ScrollDirection::Right => ButtonMask(ButtonMask::SCROLL_RIGHT),
        }
    }
}

/// Operating system on the far side of the link.
///
/// Only decides which modifier drives clipboard paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "mac", alias = "darwin")]
    Macos,
    #[default]
    Other,
}

impl Platform {
    /// Modifier key name used with `v` to paste.
    pub fn paste_modifier(self) -> &'static str {
        match self {
            Platform::Macos => "cmd",
            Platform::Other => "ctrl",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mask_bit_values() {
        assert_eq!(ButtonMask::LEFT, 1);
        assert_eq!(ButtonMask::MIDDLE, 2);
        assert_eq!(ButtonMask::RIGHT, 4);
        assert_eq!(ButtonMask::SCROLL_UP, 8);
        assert_eq!(ButtonMask::SCROLL_DOWN, 16);
        assert_eq!(ButtonMask::SCROLL_LEFT, 32);
        assert_eq!(ButtonMask::SCROLL_RIGHT, 64);
    }

    #[test]
    fn test_button_mask_combines() {
        let mask = ButtonMask(ButtonMask::LEFT | ButtonMask::RIGHT);
        assert!(mask.contains(ButtonMask::LEFT));
        assert!(mask.contains(ButtonMask::RIGHT));
        assert!(!mask.contains(ButtonMask::MIDDLE));
        assert!(ButtonMask::NONE.is_empty());
    }

    #[test]
    fn test_mouse_button_masks() {
        assert_eq!(MouseButton::Left.mask().0, 1);
        assert_eq!(MouseButton::Middle.mask().0, 2);
        assert_eq!(MouseButton::Right.mask().0, 4);
        assert_eq!(MouseButton::default(), MouseButton::Left);
    }

    #[test]
    fn test_scroll_direction_masks() {
        assert_eq!(ScrollDirection::Up.mask().0, 8);
        assert_eq!(ScrollDirection::Down.mask().0, 16);
        assert_eq!(ScrollDirection::Left.mask().0, 32);
        assert_eq!(ScrollDirection::Right.mask().0, 64);
    }

    #[test]
    fn test_platform_paste_modifier() {
        assert_eq!(Platform::Macos.paste_modifier(), "cmd");
        assert_eq!(Platform::Other.paste_modifier(), "ctrl");
    }

    #[test]
    fn test_platform_deserializes_aliases() {
        let p: Platform = serde_json::from_str("\"darwin\"").unwrap();
        assert_eq!(p, Platform::Macos);
    }
}
