//! [`DeviceLink`](crate::application::input_controller::DeviceLink)
//! implementations.
//!
//! - **`rfb`** – writes RFB client input messages onto an established session.
//! - **`dry_run`** – logs every event and succeeds; used when no RFB endpoint
//!   is configured.
//! - **`mock`** – records every call with its timestamp, for tests.

pub mod dry_run;
pub mod mock;
pub mod rfb;
