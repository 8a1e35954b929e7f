//! Typed requests decoded from a [`Command`]'s method name and params.
//!
//! Decoding happens in two steps so the two failure kinds stay distinct:
//! an unknown method name is [`ProtocolError::Unsupported`], while a known
//! method with missing or mistyped params is [`ProtocolError::ParamsInvalid`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::input::{MouseButton, ScrollDirection};
use crate::protocol::codec::ProtocolError;
use crate::protocol::messages::Command;
use crate::timing::TimingUpdate;

/// Default number of wheel ticks for `scroll`.
pub const DEFAULT_SCROLL_AMOUNT: u32 = 3;

/// Every method the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Click,
    DoubleClick,
    RightClick,
    Drag,
    Move,
    Hover,
    Nudge,
    Scroll,
    Key,
    Combo,
    Type,
    Paste,
    Configure,
    Cursor,
    Display,
}

impl Method {
    /// Looks up a wire method name.
    pub fn from_name(name: &str) -> Option<Method> {
        let method = match name {
            "click" => Method::Click,
            "doubleClick" => Method::DoubleClick,
            "rightClick" => Method::RightClick,
            "drag" => Method::Drag,
            "move" => Method::Move,
            "hover" => Method::Hover,
            "nudge" => Method::Nudge,
            "scroll" => Method::Scroll,
            "key" => Method::Key,
            "combo" => Method::Combo,
            "type" => Method::Type,
            "paste" => Method::Paste,
            "configure" => Method::Configure,
            "cursor" => Method::Cursor,
            "display" => Method::Display,
            _ => return None,
        };
        Some(method)
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::Click => "click",
            Method::DoubleClick => "doubleClick",
            Method::RightClick => "rightClick",
            Method::Drag => "drag",
            Method::Move => "move",
            Method::Hover => "hover",
            Method::Nudge => "nudge",
            Method::Scroll => "scroll",
            Method::Key => "key",
            Method::Combo => "combo",
            Method::Type => "type",
            Method::Paste => "paste",
            Method::Configure => "configure",
            Method::Cursor => "cursor",
            Method::Display => "display",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointParams {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClickParams {
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub button: MouseButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DragParams {
    pub from_x: u32,
    pub from_y: u32,
    pub to_x: u32,
    pub to_y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NudgeParams {
    pub dx: i64,
    pub dy: i64,
}

fn default_scroll_amount() -> u32 {
    DEFAULT_SCROLL_AMOUNT
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrollParams {
    pub x: u32,
    pub y: u32,
    pub direction: ScrollDirection,
    #[serde(default = "default_scroll_amount")]
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyParams {
    pub key: String,
}

/// Keys of a combo: either a list of names or one `+`-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComboKeys {
    List(Vec<String>),
    Joined(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComboParams {
    pub keys: ComboKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextParams {
    pub text: String,
}

/// `configure` params: any subset of the timing fields, plus display settings.
///
/// `deny_unknown_fields` does not combine with `flatten`, so keys matching
/// neither part are collected in `unknown` and rejected by
/// [`Request::from_command`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureParams {
    #[serde(flatten)]
    pub timing: TimingUpdate,
    pub max_dimension: Option<u32>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl ConfigureParams {
    fn reject_unknown(self) -> Result<Self, ProtocolError> {
        match self.unknown.keys().next() {
            Some(key) => Err(ProtocolError::ParamsInvalid(format!(
                "configure: unknown field `{key}`"
            ))),
            None => Ok(self),
        }
    }
}

/// A fully decoded, validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Click(ClickParams),
    DoubleClick(PointParams),
    RightClick(PointParams),
    Drag(DragParams),
    Move(PointParams),
    Hover(PointParams),
    Nudge(NudgeParams),
    Scroll(ScrollParams),
    Key(KeyParams),
    Combo(ComboParams),
    Type(TextParams),
    Paste(TextParams),
    Configure(ConfigureParams),
    Cursor,
    Display,
}

fn decode_params<T: DeserializeOwned>(method: Method, params: &Value) -> Result<T, ProtocolError> {
    // Absent params behave like an empty object so all-optional methods work.
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(params)
        .map_err(|e| ProtocolError::ParamsInvalid(format!("{}: {e}", method.name())))
}

impl Request {
    /// Resolves the method and decodes its params.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Unsupported`] for an unknown method name.
    /// - [`ProtocolError::ParamsInvalid`] for missing, extra or mistyped params.
    pub fn from_command(command: &Command) -> Result<Request, ProtocolError> {
        let method = Method::from_name(&command.method)
            .ok_or_else(|| ProtocolError::Unsupported(command.method.clone()))?;
        let params = &command.params;

        let request = match method {
            Method::Click => Request::Click(decode_params(method, params)?),
            Method::DoubleClick => Request::DoubleClick(decode_params(method, params)?),
            Method::RightClick => Request::RightClick(decode_params(method, params)?),
            Method::Drag => Request::Drag(decode_params(method, params)?),
            Method::Move => Request::Move(decode_params(method, params)?),
            Method::Hover => Request::Hover(decode_params(method, params)?),
            Method::Nudge => Request::Nudge(decode_params(method, params)?),
            Method::Scroll => Request::Scroll(decode_params(method, params)?),
            Method::Key => Request::Key(decode_params(method, params)?),
            Method::Combo => Request::Combo(decode_params(method, params)?),
            Method::Type => Request::Type(decode_params(method, params)?),
            Method::Paste => Request::Paste(decode_params(method, params)?),
            Method::Configure => {
                let configure: ConfigureParams = decode_params(method, params)?;
                Request::Configure(configure.reject_unknown()?)
            }
            Method::Cursor => Request::Cursor,
            Method::Display => Request::Display,
        };
        Ok(request)
    }

    pub fn method(&self) -> Method {
        match self {
            Request::Click(_) => Method::Click,
            Request::DoubleClick(_) => Method::DoubleClick,
            Request::RightClick(_) => Method::RightClick,
            Request::Drag(_) => Method::Drag,
            Request::Move(_) => Method::Move,
            Request::Hover(_) => Method::Hover,
            Request::Nudge(_) => Method::Nudge,
            Request::Scroll(_) => Method::Scroll,
            Request::Key(_) => Method::Key,
            Request::Combo(_) => Method::Combo,
            Request::Type(_) => Method::Type,
            Request::Paste(_) => Method::Paste,
            Request::Configure(_) => Method::Configure,
            Request::Cursor => Method::Cursor,
            Request::Display => Method::Display,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(method: &str, params: Value) -> Command {
        Command {
            method: method.to_string(),
            params,
            id: None,
        }
    }

    #[test]
    fn test_method_names_roundtrip() {
        for name in [
            "click",
            "doubleClick",
            "rightClick",
            "drag",
            "move",
            "hover",
            "nudge",
            "scroll",
            "key",
            "combo",
            "type",
            "paste",
            "configure",
            "cursor",
            "display",
        ] {
            let method = Method::from_name(name).unwrap();
            assert_eq!(method.name(), name);
        }
    }

    #[test]
    fn test_unknown_method_is_unsupported() {
        let err = Request::from_command(&command("teleport", json!({}))).unwrap_err();
        assert_eq!(err, ProtocolError::Unsupported("teleport".to_string()));
    }

    #[test]
    fn test_click_defaults_to_left_button() {
        let req = Request::from_command(&command("click", json!({"x": 5, "y": 6}))).unwrap();
        assert_eq!(
            req,
            Request::Click(ClickParams {
                x: 5,
                y: 6,
                button: MouseButton::Left
            })
        );
    }

    #[test]
    fn test_click_accepts_right_button() {
        let req = Request::from_command(&command(
            "click",
            json!({"x": 5, "y": 6, "button": "right"}),
        ))
        .unwrap();
        assert!(matches!(
            req,
            Request::Click(ClickParams {
                button: MouseButton::Right,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_coordinate_is_params_invalid() {
        let err = Request::from_command(&command("move", json!({"x": 5}))).unwrap_err();
        assert!(matches!(err, ProtocolError::ParamsInvalid(_)));
    }

    #[test]
    fn test_string_coordinate_is_params_invalid() {
        let err = Request::from_command(&command("move", json!({"x": "5", "y": 1}))).unwrap_err();
        assert!(matches!(err, ProtocolError::ParamsInvalid(_)));
    }

    #[test]
    fn test_negative_coordinate_is_params_invalid() {
        let err = Request::from_command(&command("click", json!({"x": -1, "y": 1}))).unwrap_err();
        assert!(matches!(err, ProtocolError::ParamsInvalid(_)));
    }

    #[test]
    fn test_absent_params_for_required_fields_is_params_invalid() {
        let err = Request::from_command(&command("type", Value::Null)).unwrap_err();
        assert!(matches!(err, ProtocolError::ParamsInvalid(_)));
    }

    #[test]
    fn test_drag_uses_camel_case_fields() {
        let req = Request::from_command(&command(
            "drag",
            json!({"fromX": 0, "fromY": 1, "toX": 2, "toY": 3}),
        ))
        .unwrap();
        assert_eq!(
            req,
            Request::Drag(DragParams {
                from_x: 0,
                from_y: 1,
                to_x: 2,
                to_y: 3
            })
        );
    }

    #[test]
    fn test_scroll_amount_defaults_to_three() {
        let req = Request::from_command(&command(
            "scroll",
            json!({"x": 1, "y": 1, "direction": "down"}),
        ))
        .unwrap();
        match req {
            Request::Scroll(p) => {
                assert_eq!(p.amount, 3);
                assert_eq!(p.direction, ScrollDirection::Down);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_scroll_rejects_unknown_direction() {
        let err = Request::from_command(&command(
            "scroll",
            json!({"x": 1, "y": 1, "direction": "sideways"}),
        ))
        .unwrap_err();
        assert!(matches!(err, ProtocolError::ParamsInvalid(_)));
    }

    #[test]
    fn test_combo_accepts_list_and_joined_forms() {
        let list = Request::from_command(&command("combo", json!({"keys": ["ctrl", "c"]}))).unwrap();
        assert_eq!(
            list,
            Request::Combo(ComboParams {
                keys: ComboKeys::List(vec!["ctrl".into(), "c".into()])
            })
        );

        let joined = Request::from_command(&command("combo", json!({"keys": "ctrl+c"}))).unwrap();
        assert_eq!(
            joined,
            Request::Combo(ComboParams {
                keys: ComboKeys::Joined("ctrl+c".into())
            })
        );
    }

    #[test]
    fn test_configure_collects_timing_and_display_fields() {
        let req = Request::from_command(&command(
            "configure",
            json!({"reset": true, "clickHoldMs": 80, "maxDimension": 1024}),
        ))
        .unwrap();
        match req {
            Request::Configure(p) => {
                assert!(p.timing.reset);
                assert_eq!(p.timing.click_hold_ms, Some(80));
                assert_eq!(p.max_dimension, Some(1024));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_configure_without_params_is_empty_update() {
        let req = Request::from_command(&command("configure", Value::Null)).unwrap();
        assert_eq!(req, Request::Configure(ConfigureParams::default()));
    }

    #[test]
    fn test_configure_rejects_misspelled_field() {
        // Arrange
        let cmd = command("configure", json!({"clickHold": 80}));

        // Act
        let err = Request::from_command(&cmd).unwrap_err();

        // Assert
        assert!(matches!(err, ProtocolError::ParamsInvalid(ref msg) if msg.contains("clickHold")));
        assert_eq!(err.code(), -32602);
    }

    #[test]
    fn test_configure_accepts_timing_and_display_fields_together() {
        let cmd = command(
            "configure",
            json!({"clickHoldMs": 80, "dragPixelsPerStep": 5, "maxDimension": 640}),
        );
        let Request::Configure(p) = Request::from_command(&cmd).unwrap() else {
            panic!("expected configure");
        };
        assert!(p.unknown.is_empty());
        assert_eq!(p.timing.drag_pixels_per_step, Some(5));
        assert_eq!(p.max_dimension, Some(640));
    }

    #[test]
    fn test_cursor_ignores_params() {
        let req = Request::from_command(&command("cursor", json!({"anything": 1}))).unwrap();
        assert_eq!(req, Request::Cursor);
        assert_eq!(req.method(), Method::Cursor);
    }
}
