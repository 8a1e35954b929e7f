//! InputController: synthesizes timed key, pointer and text input.
//!
//! Every primitive is a fixed sequence of device events separated by waits
//! taken from the active [`TimingProfile`].  Events go out through a
//! [`DeviceLink`] trait object; the real transport lives in the
//! infrastructure layer.
//!
//! # Failure semantics
//!
//! Any device call may fail.  The sequence stops at the failing event and the
//! error is returned.  Events already sent are **not** undone, so a failed
//! combo or drag can leave keys or the left button held on the remote side.
//!
//! # Cursor
//!
//! The controller tracks the last *commanded* pointer position.  It is never
//! read back from the remote side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, trace};

use pilot_core::input::{ButtonMask, MouseButton, Platform, ScrollDirection};
use pilot_core::keysym::{self, KeyCode, KeysymError};
use pilot_core::protocol::params::ConfigureParams;
use pilot_core::timing::TimingProfile;
use pilot_core::ProtocolError;

/// Default bound on the longer side of the scaled display.
pub const DEFAULT_MAX_DIMENSION: u32 = 1280;

/// Error type for device link transmission.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("device link closed")]
    Closed,
    #[error("platform error: {0}")]
    Platform(String),
}

/// Capability interface to the remote desktop.
///
/// Each call resolves once the event has been handed to the transport.
#[async_trait]
pub trait DeviceLink: Send + Sync {
    /// Sends a key press (`down = true`) or release for an X11 KeySym.
    async fn send_key(&self, keysym: u32, down: bool) -> Result<(), LinkError>;

    /// Sends a pointer position with the set of buttons currently held.
    async fn send_pointer(&self, x: u32, y: u32, mask: ButtonMask) -> Result<(), LinkError>;

    /// Replaces the remote clipboard with `text`.
    async fn set_clipboard(&self, text: &str) -> Result<(), LinkError>;

    /// Operating system of the remote desktop.
    fn platform(&self) -> Platform;

    /// Remote framebuffer size, when the link knows it.
    fn framebuffer_size(&self) -> Option<(u32, u32)> {
        None
    }
}

/// Error type for controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    UnknownKey(#[from] KeysymError),
    #[error("invalid params: {0}")]
    ParamsInvalid(String),
    #[error("send failed: {0}")]
    SendFailed(#[from] LinkError),
}

impl From<ControllerError> for ProtocolError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::UnknownKey(e) => e.into(),
            ControllerError::ParamsInvalid(msg) => ProtocolError::ParamsInvalid(msg),
            ControllerError::SendFailed(e) => ProtocolError::SendFailed(e.to_string()),
        }
    }
}

/// Counts reported back from [`InputController::type_text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeSummary {
    pub typed: usize,
    pub skipped: usize,
}

async fn wait(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}

/// Point `i` of `n` on the straight line from `from` to `to`.
///
/// Each axis is `a + round((b - a) * i / n)` in exact integer arithmetic,
/// with halves rounded away from zero.
fn interpolate(from: (u32, u32), to: (u32, u32), i: u32, n: u32) -> (u32, u32) {
    let (i, n) = (i64::from(i), i64::from(n.max(1)));
    let axis = |a: u32, b: u32| {
        let scaled = (i64::from(b) - i64::from(a)) * i;
        let offset = if scaled >= 0 {
            (2 * scaled + n) / (2 * n)
        } else {
            -((-2 * scaled + n) / (2 * n))
        };
        (i64::from(a) + offset).clamp(0, i64::from(u32::MAX)) as u32
    };
    (axis(from.0, to.0), axis(from.1, to.1))
}

/// Scales `size` so its longer side is at most `max_dimension`.  Never upscales.
fn scale_to_fit((width, height): (u32, u32), max_dimension: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dimension || longer == 0 {
        return (width, height);
    }
    let factor = f64::from(max_dimension) / f64::from(longer);
    let scale = |v: u32| ((f64::from(v) * factor).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Owns the cursor and the active timing profile; implements every primitive.
pub struct InputController {
    link: Arc<dyn DeviceLink>,
    cursor: (u32, u32),
    profile: TimingProfile,
    max_dimension: u32,
}

impl InputController {
    /// Creates a controller with the cursor at the origin.
    pub fn new(link: Arc<dyn DeviceLink>, profile: TimingProfile) -> Self {
        Self {
            link,
            cursor: (0, 0),
            profile,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Last commanded pointer position.
    pub fn cursor(&self) -> (u32, u32) {
        self.cursor
    }

    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    // ── Device calls ──────────────────────────────────────────────────────────

    async fn key(&self, code: KeyCode, down: bool) -> Result<(), ControllerError> {
        trace!(keysym = code.keysym(), down, "key event");
        self.link.send_key(code.keysym(), down).await?;
        Ok(())
    }

    async fn pointer(&self, x: u32, y: u32, mask: ButtonMask) -> Result<(), ControllerError> {
        trace!(x, y, mask = mask.0, "pointer event");
        self.link.send_pointer(x, y, mask).await?;
        Ok(())
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Press, hold for `key_hold`, release.
    ///
    /// # Errors
    ///
    /// [`ControllerError::SendFailed`] if the link fails.
    pub async fn key_tap(&mut self, code: KeyCode) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        self.key(code, true).await?;
        wait(timing.key_hold).await;
        self.key(code, false).await
    }

    /// Presses `codes` together: every code but the last is a modifier.
    ///
    /// Modifiers go down in order, the main key is tapped, then modifiers come
    /// up in reverse order, with `combo_mod` after each modifier step and after
    /// the main key.  A single code degrades to [`key_tap`](Self::key_tap).
    ///
    /// # Errors
    ///
    /// - [`ControllerError::ParamsInvalid`] for an empty combo.
    /// - [`ControllerError::SendFailed`] if the link fails; modifiers already
    ///   pressed stay down.
    pub async fn key_combo(&mut self, codes: &[KeyCode]) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        let (key, modifiers) = match codes {
            [] => return Err(ControllerError::ParamsInvalid("empty key combo".into())),
            [only] => return self.key_tap(*only).await,
            [modifiers @ .., key] => (*key, modifiers),
        };

        for modifier in modifiers {
            self.key(*modifier, true).await?;
            wait(timing.combo_mod).await;
        }

        self.key(key, true).await?;
        wait(timing.key_hold).await;
        self.key(key, false).await?;
        wait(timing.combo_mod).await;

        for modifier in modifiers.iter().rev() {
            self.key(*modifier, false).await?;
            wait(timing.combo_mod).await;
        }
        Ok(())
    }

    /// Resolves every name first, then runs [`key_combo`](Self::key_combo).
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownKey`] before any event is sent if a name does
    /// not resolve.
    pub async fn key_combo_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<(), ControllerError> {
        let codes = keysym::resolve_names(names)?;
        self.key_combo(&codes).await
    }

    /// Parses `"ctrl+shift+a"` and runs [`key_combo`](Self::key_combo).
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownKey`] before any event is sent if a token does
    /// not resolve.
    pub async fn key_combo_str(&mut self, combo: &str) -> Result<(), ControllerError> {
        let codes = keysym::resolve_combo(combo)?;
        self.key_combo(&codes).await
    }

    // ── Pointer ───────────────────────────────────────────────────────────────

    /// Press `button` at `(x, y)`, hold for `click_hold`, release.
    pub async fn mouse_click(
        &mut self,
        x: u32,
        y: u32,
        button: MouseButton,
    ) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        self.pointer(x, y, button.mask()).await?;
        self.cursor = (x, y);
        wait(timing.click_hold).await;
        self.pointer(x, y, ButtonMask::NONE).await
    }

    pub async fn mouse_double_click(&mut self, x: u32, y: u32) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        self.mouse_click(x, y, MouseButton::Left).await?;
        wait(timing.double_click_gap).await;
        self.mouse_click(x, y, MouseButton::Left).await
    }

    pub async fn mouse_right_click(&mut self, x: u32, y: u32) -> Result<(), ControllerError> {
        self.mouse_click(x, y, MouseButton::Right).await
    }

    /// Left-button drag along a straight line.
    ///
    /// Sequence: position at `from` (no buttons), press at `from`, `N`
    /// interpolated points with the button held, one final point exactly at
    /// `to`, release at `to`.  `N` comes from [`TimingProfile::drag_steps`].
    /// The cursor is updated after the first event and after the release only.
    ///
    /// # Errors
    ///
    /// [`ControllerError::SendFailed`]; the button may remain held remotely.
    pub async fn mouse_drag(
        &mut self,
        from: (u32, u32),
        to: (u32, u32),
    ) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        let held = MouseButton::Left.mask();

        self.pointer(from.0, from.1, ButtonMask::NONE).await?;
        self.cursor = from;
        wait(timing.drag_position).await;

        self.pointer(from.0, from.1, held).await?;
        wait(timing.drag_press).await;

        let steps = timing.drag_steps(from, to);
        debug!(?from, ?to, steps, "drag");
        for i in 1..=steps {
            let (x, y) = interpolate(from, to, i, steps);
            self.pointer(x, y, held).await?;
            wait(timing.drag_step).await;
        }

        self.pointer(to.0, to.1, held).await?;
        wait(timing.drag_settle).await;

        self.pointer(to.0, to.1, ButtonMask::NONE).await?;
        self.cursor = to;
        Ok(())
    }

    /// Moves the pointer with no buttons held.  No wait.
    pub async fn mouse_move(&mut self, x: u32, y: u32) -> Result<(), ControllerError> {
        self.pointer(x, y, ButtonMask::NONE).await?;
        self.cursor = (x, y);
        Ok(())
    }

    /// Moves the pointer, then waits `hover_settle` so hover effects can appear.
    pub async fn mouse_hover(&mut self, x: u32, y: u32) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        self.mouse_move(x, y).await?;
        wait(timing.hover_settle).await;
        Ok(())
    }

    /// Moves relative to the commanded cursor, clamped at zero.
    pub async fn mouse_nudge(&mut self, dx: i64, dy: i64) -> Result<(), ControllerError> {
        let offset = |base: u32, delta: i64| {
            (i64::from(base).saturating_add(delta)).clamp(0, i64::from(u32::MAX)) as u32
        };
        let (x, y) = self.cursor;
        self.mouse_move(offset(x, dx), offset(y, dy)).await
    }

    /// Positions at `(x, y)` then sends `amount` identical wheel ticks.
    pub async fn scroll(
        &mut self,
        x: u32,
        y: u32,
        direction: ScrollDirection,
        amount: u32,
    ) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        self.pointer(x, y, ButtonMask::NONE).await?;
        self.cursor = (x, y);

        for _ in 0..amount {
            self.pointer(x, y, direction.mask()).await?;
            wait(timing.scroll_press).await;
            self.pointer(x, y, ButtonMask::NONE).await?;
            wait(timing.scroll_tick).await;
        }
        Ok(())
    }

    // ── Text ──────────────────────────────────────────────────────────────────

    /// Types `text` one grapheme at a time.
    ///
    /// Graphemes without a KeySym are skipped silently; typing continues with
    /// the next one.
    pub async fn type_text(&mut self, text: &str) -> Result<TypeSummary, ControllerError> {
        let timing = self.profile.clone();
        let shift = keysym::shift_key();
        let mut summary = TypeSummary::default();

        for (grapheme, code) in keysym::resolve_text(text) {
            let Some(code) = code else {
                debug!(?grapheme, "skipping untypeable grapheme");
                summary.skipped += 1;
                continue;
            };

            if code.shift_required() {
                self.key(shift, true).await?;
                wait(timing.type_shift).await;
            }
            self.key(code, true).await?;
            wait(timing.type_key).await;
            self.key(code, false).await?;
            if code.shift_required() {
                wait(timing.type_shift).await;
                self.key(shift, false).await?;
            }
            wait(timing.type_inter_key).await;
            summary.typed += 1;
        }
        Ok(summary)
    }

    /// Puts `text` on the remote clipboard, waits `paste_settle`, then sends
    /// the platform paste shortcut (Cmd+V on macOS, Ctrl+V elsewhere).
    pub async fn paste_text(&mut self, text: &str) -> Result<(), ControllerError> {
        let timing = self.profile.clone();
        let modifier = keysym::resolve_name(self.link.platform().paste_modifier())?;
        let v = keysym::resolve_name("v")?;

        self.link.set_clipboard(text).await?;
        wait(timing.paste_settle).await;
        self.key_combo(&[modifier, v]).await
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Replaces the timing profile and display bound in one step.
    ///
    /// Nothing changes if any field is invalid.  Must only be called between
    /// primitives; the dispatcher guarantees this.
    ///
    /// # Errors
    ///
    /// [`ControllerError::ParamsInvalid`] for `dragPixelsPerStep = 0` or
    /// `maxDimension = 0`.
    pub fn apply_configuration(&mut self, params: &ConfigureParams) -> Result<(), ControllerError> {
        let profile = self
            .profile
            .apply(&params.timing)
            .map_err(|e| ControllerError::ParamsInvalid(e.to_string()))?;

        let mut max_dimension = if params.timing.reset {
            DEFAULT_MAX_DIMENSION
        } else {
            self.max_dimension
        };
        if let Some(requested) = params.max_dimension {
            if requested == 0 {
                return Err(ControllerError::ParamsInvalid(
                    "maxDimension must be greater than zero".into(),
                ));
            }
            max_dimension = requested;
        }

        self.profile = profile;
        self.max_dimension = max_dimension;
        debug!(profile = ?self.profile, max_dimension, "configuration applied");
        Ok(())
    }

    /// Remote framebuffer size scaled to fit `max_dimension`, if known.
    pub fn scaled_display(&self) -> Option<(u32, u32)> {
        self.link
            .framebuffer_size()
            .map(|size| scale_to_fit(size, self.max_dimension))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
