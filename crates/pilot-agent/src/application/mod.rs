//! Application layer use cases for the agent.
//!
//! # What use cases does the agent have?
//!
//! - **`input_controller`** – Synthesizes timed input primitives (clicks,
//!   drags, key combos, typing, paste) as sequences of device events.  The
//!   events go out through a `DeviceLink` implementation that is injected at
//!   construction time.
//!
//! - **`dispatcher`** – Decodes one command line at a time, routes it to the
//!   controller and builds the reply, strictly in arrival order.

pub mod dispatcher;
pub mod input_controller;
