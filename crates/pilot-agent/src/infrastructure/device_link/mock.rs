//! Recording device link for unit and integration testing.
//!
//! # Why a recording link?
//!
//! The real links put bytes on a socket to a remote desktop, which tests can
//! neither provide nor observe.  `RecordingDeviceLink` replaces transmission
//! with in-memory recording: every call is pushed into a `Mutex<Vec<...>>`
//! together with the `tokio::time::Instant` it happened at, so tests can
//! assert the exact event order *and* the waits between events.
//!
//! # Usage in tests
//!
//! ```ignore
//! let link = Arc::new(RecordingDeviceLink::new());
//! let mut controller = InputController::new(link.clone(), TimingProfile::default());
//!
//! controller.mouse_click(10, 20, MouseButton::Left).await.unwrap();
//!
//! assert_eq!(link.events().len(), 2);
//! ```
//!
//! # Failure injection
//!
//! [`RecordingDeviceLink::failing_after`] lets the first `n` calls succeed and
//! fails every later one, which is how tests exercise mid-sequence aborts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use pilot_core::input::{ButtonMask, Platform};

use crate::application::input_controller::{DeviceLink, LinkError};

/// One call made through the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    Key { keysym: u32, down: bool },
    Pointer { x: u32, y: u32, mask: ButtonMask },
    Clipboard(String),
}

/// A [`DeviceEvent`] with the (tokio) instant it was sent.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub event: DeviceEvent,
    pub at: Instant,
}

/// A device link that records all calls instead of transmitting them.
#[derive(Debug, Default)]
pub struct RecordingDeviceLink {
    recorded: Mutex<Vec<RecordedEvent>>,
    calls: AtomicUsize,
    /// Number of calls that succeed before every later call fails.
    fail_after: Option<usize>,
    platform: Platform,
    framebuffer: Option<(u32, u32)>,
}

impl RecordingDeviceLink {
    /// Creates an empty link reporting [`Platform::Other`] and no framebuffer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_framebuffer(mut self, width: u32, height: u32) -> Self {
        self.framebuffer = Some((width, height));
        self
    }

    /// Lets the first `n` calls succeed; every later call fails with
    /// [`LinkError::Closed`] and is not recorded.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// All recorded events, in order.
    pub fn events(&self) -> Vec<DeviceEvent> {
        self.recorded().into_iter().map(|r| r.event).collect()
    }

    /// All recorded events with their timestamps.
    pub fn recorded(&self) -> Vec<RecordedEvent> {
        self.recorded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Only the key events, as `(keysym, down)` pairs.
    pub fn key_events(&self) -> Vec<(u32, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeviceEvent::Key { keysym, down } => Some((keysym, down)),
                _ => None,
            })
            .collect()
    }

    /// Only the pointer events, as `(x, y, mask)` triples.
    pub fn pointer_events(&self) -> Vec<(u32, u32, u8)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeviceEvent::Pointer { x, y, mask } => Some((x, y, mask.0)),
                _ => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far (the failure budget is kept).
    pub fn clear(&self) {
        if let Ok(mut guard) = self.recorded.lock() {
            guard.clear();
        }
    }

    fn record(&self, event: DeviceEvent) -> Result<(), LinkError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|n| call >= n) {
            return Err(LinkError::Closed);
        }
        let mut guard = self
            .recorded
            .lock()
            .map_err(|_| LinkError::Platform("recording lock poisoned".into()))?;
        guard.push(RecordedEvent {
            event,
            at: Instant::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl DeviceLink for RecordingDeviceLink {
    async fn send_key(&self, keysym: u32, down: bool) -> Result<(), LinkError> {
        self.record(DeviceEvent::Key { keysym, down })
    }

    async fn send_pointer(&self, x: u32, y: u32, mask: ButtonMask) -> Result<(), LinkError> {
        self.record(DeviceEvent::Pointer { x, y, mask })
    }

    async fn set_clipboard(&self, text: &str) -> Result<(), LinkError> {
        self.record(DeviceEvent::Clipboard(text.to_string()))
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn framebuffer_size(&self) -> Option<(u32, u32)> {
        self.framebuffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let link = RecordingDeviceLink::new();
        link.send_key(0x61, true).await.unwrap();
        link.send_pointer(1, 2, ButtonMask::NONE).await.unwrap();
        link.set_clipboard("hi").await.unwrap();

        assert_eq!(
            link.events(),
            vec![
                DeviceEvent::Key {
                    keysym: 0x61,
                    down: true
                },
                DeviceEvent::Pointer {
                    x: 1,
                    y: 2,
                    mask: ButtonMask::NONE
                },
                DeviceEvent::Clipboard("hi".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_after_lets_first_calls_through() {
        let link = RecordingDeviceLink::new().failing_after(1);
        assert!(link.send_key(1, true).await.is_ok());
        assert!(matches!(link.send_key(1, false).await, Err(LinkError::Closed)));
        assert_eq!(link.events().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_forgets_events() {
        let link = RecordingDeviceLink::new();
        link.send_key(1, true).await.unwrap();
        link.clear();
        assert!(link.events().is_empty());
    }

    #[test]
    fn test_reports_configured_platform_and_framebuffer() {
        let link = RecordingDeviceLink::new()
            .with_platform(Platform::Macos)
            .with_framebuffer(1920, 1080);
        assert_eq!(link.platform(), Platform::Macos);
        assert_eq!(link.framebuffer_size(), Some((1920, 1080)));
    }
}
