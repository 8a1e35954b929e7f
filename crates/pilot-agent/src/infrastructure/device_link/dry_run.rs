//! Dry-run device link: logs events instead of sending them.
//!
//! Lets the agent run end to end without a remote desktop.  Run with
//! `RUST_LOG=pilot_agent=info` to see every synthesized event on stderr.

use async_trait::async_trait;
use tracing::info;

use pilot_core::input::{ButtonMask, Platform};

use crate::application::input_controller::{DeviceLink, LinkError};

/// A device link that logs every call and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct DryRunDeviceLink {
    platform: Platform,
    framebuffer: Option<(u32, u32)>,
}

impl DryRunDeviceLink {
    pub fn new(platform: Platform, framebuffer: Option<(u32, u32)>) -> Self {
        Self {
            platform,
            framebuffer,
        }
    }
}

#[async_trait]
impl DeviceLink for DryRunDeviceLink {
    async fn send_key(&self, keysym: u32, down: bool) -> Result<(), LinkError> {
        info!("[dry-run] key 0x{keysym:04X} {}", if down { "down" } else { "up" });
        Ok(())
    }

    async fn send_pointer(&self, x: u32, y: u32, mask: ButtonMask) -> Result<(), LinkError> {
        info!("[dry-run] pointer ({x}, {y}) mask {:#04x}", mask.0);
        Ok(())
    }

    async fn set_clipboard(&self, text: &str) -> Result<(), LinkError> {
        info!("[dry-run] clipboard set ({} chars)", text.chars().count());
        Ok(())
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn framebuffer_size(&self) -> Option<(u32, u32)> {
        self.framebuffer
    }
}
