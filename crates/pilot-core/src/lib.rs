//! # pilot-core
//!
//! Shared library for rfb-pilot containing key resolution tables, timing
//! profiles, the JSON command protocol types and the RFB input-message
//! encoder.
//!
//! It has no dependencies on async runtimes, sockets, or OS APIs.
//!
//! - **`keysym`** – Pure mapping from key names and characters to X11 KeySyms,
//!   the codes RFB `KeyEvent` messages carry.
//!
//! - **`timing`** – The immutable [`TimingProfile`] of per-phase delays and drag
//!   geometry, and the partial [`TimingUpdate`] used to replace it.
//!
//! - **`protocol`** – Line-delimited JSON commands, responses and
//!   notifications, with a correlation id that keeps its string/integer kind.
//!
//! - **`input`** – Button masks, buttons, scroll directions, remote platform.
//!
//! - **`rfb`** – Byte encoders for `KeyEvent`, `PointerEvent` and
//!   `ClientCutText`.

pub mod input;
pub mod keysym;
pub mod protocol;
pub mod rfb;
pub mod timing;

pub use input::{ButtonMask, MouseButton, Platform, ScrollDirection};
pub use keysym::{resolve_char, resolve_name, KeyCode, KeysymError};
pub use protocol::codec::{decode_command, encode_line, ProtocolError};
pub use protocol::messages::{Command, Notification, RequestId, Response, ResultPayload};
pub use timing::{TimingProfile, TimingUpdate};
