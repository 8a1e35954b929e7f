//! RFB device link: encodes input as RFB client messages.
//!
//! The writer must already be past the RFB handshake (protocol version,
//! security and `ClientInit`/`ServerInit`); this link only sends
//! `KeyEvent`, `PointerEvent` and `ClientCutText` messages.
//!
//! # Disconnect reporting
//!
//! The first failed write marks the link as closed and, when a status channel
//! is attached, sends one [`LinkStatus::Disconnected`].  Every later call
//! fails with [`LinkError::Closed`] without touching the writer.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error};

use pilot_core::input::{ButtonMask, Platform};
use pilot_core::protocol::LinkStatus;
use pilot_core::rfb;

use crate::application::input_controller::{DeviceLink, LinkError};

/// A device link writing RFB messages to `W`.
pub struct RfbDeviceLink<W> {
    writer: Mutex<W>,
    platform: Platform,
    framebuffer: Option<(u32, u32)>,
    status_tx: Option<mpsc::UnboundedSender<LinkStatus>>,
    closed: AtomicBool,
}

impl<W: AsyncWrite + Unpin + Send> RfbDeviceLink<W> {
    pub fn new(writer: W, platform: Platform) -> Self {
        Self {
            writer: Mutex::new(writer),
            platform,
            framebuffer: None,
            status_tx: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Framebuffer size announced by the server in `ServerInit`.
    pub fn with_framebuffer(mut self, width: u32, height: u32) -> Self {
        self.framebuffer = Some((width, height));
        self
    }

    /// Channel that receives the disconnect notification.
    pub fn with_status_channel(mut self, tx: mpsc::UnboundedSender<LinkStatus>) -> Self {
        self.status_tx = Some(tx);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn send(&self, message: &[u8]) -> Result<(), LinkError> {
        if self.is_closed() {
            return Err(LinkError::Closed);
        }

        let mut writer = self.writer.lock().await;
        let result = match writer.write_all(message).await {
            Ok(()) => writer.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            if !self.closed.swap(true, Ordering::SeqCst) {
                error!("RFB link write failed: {e}");
                if let Some(tx) = &self.status_tx {
                    let _ = tx.send(LinkStatus::Disconnected {
                        reason: e.to_string(),
                    });
                }
            }
            return Err(LinkError::Io(e));
        }
        Ok(())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> DeviceLink for RfbDeviceLink<W> {
    async fn send_key(&self, keysym: u32, down: bool) -> Result<(), LinkError> {
        debug!(keysym, down, "RFB KeyEvent");
        self.send(&rfb::encode_key_event(keysym, down)).await
    }

    async fn send_pointer(&self, x: u32, y: u32, mask: ButtonMask) -> Result<(), LinkError> {
        debug!(x, y, mask = mask.0, "RFB PointerEvent");
        self.send(&rfb::encode_pointer_event(x, y, mask)).await
    }

    async fn set_clipboard(&self, text: &str) -> Result<(), LinkError> {
        debug!(len = text.len(), "RFB ClientCutText");
        self.send(&rfb::encode_client_cut_text(text)).await
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn framebuffer_size(&self) -> Option<(u32, u32)> {
        self.framebuffer
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
