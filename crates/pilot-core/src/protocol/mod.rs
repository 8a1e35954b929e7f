//! Protocol module: wire types, typed request decoding and the line codec.

pub mod codec;
pub mod messages;
pub mod params;

pub use codec::{decode_command, encode_line, DecodeFailure, ProtocolError};
pub use messages::*;
pub use params::{Method, Request};
