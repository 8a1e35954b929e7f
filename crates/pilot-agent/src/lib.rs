//! pilot-agent library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the agent do? (for beginners)
//!
//! An automation client writes JSON commands such as
//! `{"method":"click","params":{"x":10,"y":20},"id":1}`, one per line.  The
//! agent turns each command into the exact series of keyboard and pointer
//! events a person would produce, with realistic pauses in between, and sends
//! them to a remote desktop over an RFB (VNC) session.
//!
//! 1. `infrastructure::line_io` reads a line and hands it to the dispatcher.
//! 2. `application::dispatcher` validates it and picks the input primitive.
//! 3. `application::input_controller` runs the primitive, waiting between
//!    events according to the active timing profile.
//! 4. An `infrastructure::device_link` encodes each event for the remote side.
//! 5. The reply line goes back out once the whole sequence has finished.

/// Application layer: input synthesis and command dispatch.
pub mod application;

/// Infrastructure layer: device links, line I/O, config file.
pub mod infrastructure;
