//! ProtocolDispatcher: turns decoded command lines into controller calls.
//!
//! # Processing model (for beginners)
//!
//! The dispatcher is strictly single-flight.  [`ProtocolDispatcher::handle_line`]
//! runs the whole input sequence of one command, including every timed wait,
//! before it returns.  The line reader in the infrastructure layer only reads
//! the next line after that, so two commands can never interleave their device
//! events.
//!
//! ```text
//!   Idle ──line──▶ Processing ──reply──▶ Idle
//!    │
//!    └──EOF / read error──▶ Closed
//! ```
//!
//! A command without an `id` is executed but never answered.

use tracing::{debug, info, warn};

use pilot_core::input::{MouseButton, ScrollDirection};
use pilot_core::keysym::{self, KeyCode};
use pilot_core::protocol::params::{ComboKeys, Request};
use pilot_core::protocol::{decode_command, ProtocolError, Response, ResultPayload};

use super::input_controller::InputController;

/// Lifecycle of a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    Processing,
    Closed,
}

fn button_name(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => "left",
        MouseButton::Middle => "middle",
        MouseButton::Right => "right",
    }
}

fn direction_name(direction: ScrollDirection) -> &'static str {
    match direction {
        ScrollDirection::Up => "up",
        ScrollDirection::Down => "down",
        ScrollDirection::Left => "left",
        ScrollDirection::Right => "right",
    }
}

/// Routes requests to an owned [`InputController`].
pub struct ProtocolDispatcher {
    controller: InputController,
    state: DispatcherState,
}

impl ProtocolDispatcher {
    pub fn new(controller: InputController) -> Self {
        Self {
            controller,
            state: DispatcherState::Idle,
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn controller(&self) -> &InputController {
        &self.controller
    }

    /// Marks the input stream as finished.  Later lines are ignored.
    pub fn close(&mut self) {
        if self.state != DispatcherState::Closed {
            info!("dispatcher closed");
        }
        self.state = DispatcherState::Closed;
    }

    /// Handles one input line and returns the reply to write, if any.
    ///
    /// Blank lines are ignored.  A line that cannot be decoded is answered only
    /// when an `id` could still be read from it.
    pub async fn handle_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() || self.state == DispatcherState::Closed {
            return None;
        }

        let command = match decode_command(line) {
            Ok(command) => command,
            Err(failure) => {
                warn!(id = ?failure.id, error = %failure.error, "undecodable command line");
                return failure.id.map(|id| Response::failure(id, &failure.error));
            }
        };

        self.state = DispatcherState::Processing;
        let outcome = match Request::from_command(&command) {
            Ok(request) => {
                debug!(method = request.method().name(), id = ?command.id, "executing");
                self.execute(request).await
            }
            Err(err) => Err(err),
        };
        self.state = DispatcherState::Idle;

        if let Err(err) = &outcome {
            warn!(method = %command.method, id = ?command.id, code = err.code(), "command failed: {err}");
        }

        let id = command.id?;
        Some(match outcome {
            Ok(payload) => Response::success(id, payload),
            Err(err) => Response::failure(id, &err),
        })
    }

    /// Runs one validated request to completion.
    ///
    /// # Errors
    ///
    /// Any [`ProtocolError`]; a `SendFailed` error may leave partial input
    /// applied on the remote side.
    pub async fn execute(&mut self, request: Request) -> Result<ResultPayload, ProtocolError> {
        let c = &mut self.controller;
        let payload = match request {
            Request::Click(p) => {
                c.mouse_click(p.x, p.y, p.button).await?;
                ResultPayload::detail(format!(
                    "clicked {} at ({}, {})",
                    button_name(p.button),
                    p.x,
                    p.y
                ))
                .with_position(c.cursor())
            }
            Request::DoubleClick(p) => {
                c.mouse_double_click(p.x, p.y).await?;
                ResultPayload::detail(format!("double-clicked at ({}, {})", p.x, p.y))
                    .with_position(c.cursor())
            }
            Request::RightClick(p) => {
                c.mouse_right_click(p.x, p.y).await?;
                ResultPayload::detail(format!("right-clicked at ({}, {})", p.x, p.y))
                    .with_position(c.cursor())
            }
            Request::Drag(p) => {
                c.mouse_drag((p.from_x, p.from_y), (p.to_x, p.to_y)).await?;
                ResultPayload::detail(format!(
                    "dragged from ({}, {}) to ({}, {})",
                    p.from_x, p.from_y, p.to_x, p.to_y
                ))
                .with_position(c.cursor())
            }
            Request::Move(p) => {
                c.mouse_move(p.x, p.y).await?;
                ResultPayload::detail(format!("moved to ({}, {})", p.x, p.y))
                    .with_position(c.cursor())
            }
            Request::Hover(p) => {
                c.mouse_hover(p.x, p.y).await?;
                ResultPayload::detail(format!("hovering at ({}, {})", p.x, p.y))
                    .with_position(c.cursor())
            }
            Request::Nudge(p) => {
                c.mouse_nudge(p.dx, p.dy).await?;
                let (x, y) = c.cursor();
                ResultPayload::detail(format!("nudged by ({}, {}) to ({x}, {y})", p.dx, p.dy))
                    .with_position((x, y))
            }
            Request::Scroll(p) => {
                c.scroll(p.x, p.y, p.direction, p.amount).await?;
                ResultPayload::detail(format!(
                    "scrolled {} {} at ({}, {})",
                    direction_name(p.direction),
                    p.amount,
                    p.x,
                    p.y
                ))
                .with_position(c.cursor())
            }
            Request::Key(p) => {
                let code = keysym::resolve_name(&p.key)?;
                // "A" or "?" needs Shift held just like typing it would.
                if code.shift_required() {
                    c.key_combo(&[keysym::shift_key(), code]).await?;
                } else {
                    c.key_tap(code).await?;
                }
                ResultPayload::detail(format!("pressed {}", p.key))
            }
            Request::Combo(p) => {
                let (codes, label): (Vec<KeyCode>, String) = match &p.keys {
                    ComboKeys::List(names) => (keysym::resolve_names(names)?, names.join("+")),
                    ComboKeys::Joined(combo) => (keysym::resolve_combo(combo)?, combo.clone()),
                };
                c.key_combo(&codes).await?;
                ResultPayload::detail(format!("pressed {label}"))
            }
            Request::Type(p) => {
                let summary = c.type_text(&p.text).await?;
                let detail = if summary.skipped == 0 {
                    format!("typed {} characters", summary.typed)
                } else {
                    format!(
                        "typed {} characters, skipped {} without a key mapping",
                        summary.typed, summary.skipped
                    )
                };
                ResultPayload::detail(detail)
            }
            Request::Paste(p) => {
                c.paste_text(&p.text).await?;
                ResultPayload::detail(format!("pasted {} characters", p.text.chars().count()))
            }
            Request::Configure(p) => {
                c.apply_configuration(&p)?;
                if p.timing.is_empty() && p.max_dimension.is_none() {
                    ResultPayload::detail("configuration unchanged")
                } else {
                    ResultPayload::detail("configuration updated")
                }
            }
            Request::Cursor => {
                let (x, y) = c.cursor();
                ResultPayload {
                    x: Some(x),
                    y: Some(y),
                    ..Default::default()
                }
            }
            Request::Display => match c.scaled_display() {
                Some((width, height)) => ResultPayload {
                    scaled_width: Some(width),
                    scaled_height: Some(height),
                    ..Default::default()
                },
                None => ResultPayload::detail("display size unknown"),
            },
        };
        Ok(payload)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
