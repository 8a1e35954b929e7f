//! Infrastructure layer for the agent.
//!
//! Contains the outward-facing adapters: device links to the remote desktop,
//! the line-delimited protocol I/O, and the TOML config file.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pilot_core`, but MUST NOT be imported by the `application` layer outside
//! of tests.
//!
//! # Sub-modules
//!
//! - **`device_link`** – `DeviceLink` implementations: the RFB message writer,
//!   a logging dry-run link, and a recording link for tests.
//!
//! - **`line_io`** – reads command lines, writes replies and `linkStatus`
//!   notifications without splitting lines.
//!
//! - **`config`** – optional TOML file with `[display]` and `[timing]` tables.

pub mod config;
pub mod device_link;
pub mod line_io;
