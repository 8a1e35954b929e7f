//! Timing profile: per-phase delays and drag geometry for synthesized input.
//!
//! A [`TimingProfile`] is an immutable value.  Updates never mutate a profile
//! in place; [`TimingProfile::apply`] builds a new one from a partial
//! [`TimingUpdate`], and the controller swaps it in between commands.
//!
//! # Defaults
//!
//! | Field                 | Default |
//! |-----------------------|---------|
//! | click_hold            | 50 ms   |
//! | double_click_gap      | 100 ms  |
//! | hover_settle          | 400 ms  |
//! | drag_position         | 50 ms   |
//! | drag_press            | 100 ms  |
//! | drag_step             | 10 ms   |
//! | drag_settle           | 50 ms   |
//! | drag_pixels_per_step  | 20      |
//! | drag_min_steps        | 10      |
//! | scroll_press          | 10 ms   |
//! | scroll_tick           | 20 ms   |
//! | key_hold              | 50 ms   |
//! | combo_mod             | 30 ms   |
//! | type_key              | 20 ms   |
//! | type_inter_key        | 20 ms   |
//! | type_shift            | 10 ms   |
//! | paste_settle          | 100 ms  |
//! | crop_radius           | 200 px  |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error type for timing profile updates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimingError {
    /// A drag needs at least one pixel per interpolation step.
    #[error("dragPixelsPerStep must be greater than zero")]
    ZeroPixelsPerStep,
}

/// Delays and geometry used by every input primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingProfile {
    pub click_hold: Duration,
    pub double_click_gap: Duration,
    pub hover_settle: Duration,
    pub drag_position: Duration,
    pub drag_press: Duration,
    pub drag_step: Duration,
    pub drag_settle: Duration,
    /// Pixels covered by one interpolated drag event.  Never zero.
    pub drag_pixels_per_step: u32,
    pub drag_min_steps: u32,
    pub scroll_press: Duration,
    pub scroll_tick: Duration,
    pub key_hold: Duration,
    pub combo_mod: Duration,
    /// Key-down to key-up hold while typing text.
    pub type_key: Duration,
    pub type_inter_key: Duration,
    pub type_shift: Duration,
    pub paste_settle: Duration,
    /// Radius in pixels of the crop taken around a point of interest.
    pub crop_radius: u32,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self {
            click_hold: Duration::from_millis(50),
            double_click_gap: Duration::from_millis(100),
            hover_settle: Duration::from_millis(400),
            drag_position: Duration::from_millis(50),
            drag_press: Duration::from_millis(100),
            drag_step: Duration::from_millis(10),
            drag_settle: Duration::from_millis(50),
            drag_pixels_per_step: 20,
            drag_min_steps: 10,
            scroll_press: Duration::from_millis(10),
            scroll_tick: Duration::from_millis(20),
            key_hold: Duration::from_millis(50),
            combo_mod: Duration::from_millis(30),
            type_key: Duration::from_millis(20),
            type_inter_key: Duration::from_millis(20),
            type_shift: Duration::from_millis(10),
            paste_settle: Duration::from_millis(100),
            crop_radius: 200,
        }
    }
}

/// A partial profile update.  Omitted fields keep their current value.
///
/// Delays are whole milliseconds on the wire.  Unsigned types make negative
/// values a decode error rather than something to check here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingUpdate {
    /// Restore stock defaults before applying the other fields.
    #[serde(default)]
    pub reset: bool,
    pub click_hold_ms: Option<u64>,
    pub double_click_gap_ms: Option<u64>,
    pub hover_settle_ms: Option<u64>,
    pub drag_position_ms: Option<u64>,
    pub drag_press_ms: Option<u64>,
    pub drag_step_ms: Option<u64>,
    pub drag_settle_ms: Option<u64>,
    pub drag_pixels_per_step: Option<u32>,
    pub drag_min_steps: Option<u32>,
    pub scroll_press_ms: Option<u64>,
    pub scroll_tick_ms: Option<u64>,
    pub key_hold_ms: Option<u64>,
    pub combo_mod_ms: Option<u64>,
    pub type_key_ms: Option<u64>,
    pub type_inter_key_ms: Option<u64>,
    pub type_shift_ms: Option<u64>,
    pub paste_settle_ms: Option<u64>,
    pub crop_radius: Option<u32>,
}

impl TimingUpdate {
    /// `true` if the update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn set_ms(target: &mut Duration, ms: Option<u64>) {
    if let Some(ms) = ms {
        *target = Duration::from_millis(ms);
    }
}

fn set_u32(target: &mut u32, value: Option<u32>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl TimingProfile {
    /// Builds the profile that results from applying `update` to `self`.
    ///
    /// With `reset` set, the stock defaults are the starting point instead of
    /// `self`.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::ZeroPixelsPerStep`] if the result would have
    /// `drag_pixels_per_step == 0`.  `self` is untouched either way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use pilot_core::timing::{TimingProfile, TimingUpdate};
    ///
    /// let update = TimingUpdate { click_hold_ms: Some(80), ..Default::default() };
    /// let profile = TimingProfile::default().apply(&update).unwrap();
    /// assert_eq!(profile.click_hold, Duration::from_millis(80));
    /// ```
    pub fn apply(&self, update: &TimingUpdate) -> Result<TimingProfile, TimingError> {
        let mut next = if update.reset {
            debug!("timing profile reset to defaults");
            TimingProfile::default()
        } else {
            self.clone()
        };

        set_ms(&mut next.click_hold, update.click_hold_ms);
        set_ms(&mut next.double_click_gap, update.double_click_gap_ms);
        set_ms(&mut next.hover_settle, update.hover_settle_ms);
        set_ms(&mut next.drag_position, update.drag_position_ms);
        set_ms(&mut next.drag_press, update.drag_press_ms);
        set_ms(&mut next.drag_step, update.drag_step_ms);
        set_ms(&mut next.drag_settle, update.drag_settle_ms);
        set_u32(&mut next.drag_pixels_per_step, update.drag_pixels_per_step);
        set_u32(&mut next.drag_min_steps, update.drag_min_steps);
        set_ms(&mut next.scroll_press, update.scroll_press_ms);
        set_ms(&mut next.scroll_tick, update.scroll_tick_ms);
        set_ms(&mut next.key_hold, update.key_hold_ms);
        set_ms(&mut next.combo_mod, update.combo_mod_ms);
        set_ms(&mut next.type_key, update.type_key_ms);
        set_ms(&mut next.type_inter_key, update.type_inter_key_ms);
        set_ms(&mut next.type_shift, update.type_shift_ms);
        set_ms(&mut next.paste_settle, update.paste_settle_ms);
        set_u32(&mut next.crop_radius, update.crop_radius);

        if next.drag_pixels_per_step == 0 {
            return Err(TimingError::ZeroPixelsPerStep);
        }
        Ok(next)
    }

    /// Number of interpolated events for a drag between two points.
    ///
    /// `max(drag_min_steps, ceil(distance / drag_pixels_per_step))`.
    pub fn drag_steps(&self, from: (u32, u32), to: (u32, u32)) -> u32 {
        let dx = f64::from(to.0) - f64::from(from.0);
        let dy = f64::from(to.1) - f64::from(from.1);
        let distance = dx.hypot(dy);
        let raw = (distance / f64::from(self.drag_pixels_per_step.max(1))).ceil() as u32;
        raw.max(self.drag_min_steps)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
