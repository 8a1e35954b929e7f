//! Wire types for the line-delimited JSON command protocol.
//!
//! ```text
//! → {"method":"click","params":{"x":10,"y":20},"id":7}
//! ← {"result":{"detail":"clicked left at (10, 20)","x":10,"y":20},"id":7}
//! ← {"error":{"code":-32602,"message":"invalid params: ..."},"id":"abc"}
//! ← {"method":"linkStatus","params":{"state":"disconnected"}}
//! ```
//!
//! A [`Response`] always echoes the id of the command it answers, with the
//! same kind (a string id stays a string).  A [`Notification`] has no id field
//! at all: it is not a reply to anything.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::codec::ProtocolError;

/// Default error code for failures without a more specific code.
pub const DEFAULT_ERROR_CODE: i64 = -32000;

/// Correlation id of a command: either a JSON integer or a JSON string.
///
/// Decoding then re-encoding keeps the variant, so `7` never comes back as
/// `"7"` and vice versa.  Integers above `i64::MAX` land in `Unsigned`, so any
/// JSON integer id gets its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    Unsigned(u64),
    String(String),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Unsigned(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// One decoded input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub method: String,
    /// Method-specific parameter object.  Absent params decode as `null`.
    #[serde(default)]
    pub params: Value,
    /// Commands without an id expect no reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

/// Success payload.  Which fields are populated depends on the method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Base64 image data; reserved for capture-capable front ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaled_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaled_height: Option<u32>,
}

impl ResultPayload {
    /// A payload carrying only a free-text detail.
    pub fn detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// Adds cursor coordinates to the payload.
    pub fn with_position(mut self, (x, y): (u32, u32)) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// Error payload of a failed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

impl From<&ProtocolError> for ErrorObject {
    fn from(err: &ProtocolError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Either half of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(ResultPayload),
    Error(ErrorObject),
}

/// The single reply to an id-bearing command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub id: RequestId,
}

impl Response {
    pub fn success(id: RequestId, payload: ResultPayload) -> Self {
        Self {
            outcome: Outcome::Result(payload),
            id,
        }
    }

    pub fn failure(id: RequestId, err: &ProtocolError) -> Self {
        Self {
            outcome: Outcome::Error(ErrorObject::from(err)),
            id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Result(_))
    }
}

/// An unsolicited status message.  Structurally has no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub method: String,
    pub params: Map<String, Value>,
}

/// Method name of device-link connectivity notifications.
pub const LINK_STATUS_METHOD: &str = "linkStatus";

/// Device-link connectivity, reported through [`Notification`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    Disconnected { reason: String },
}

impl Notification {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Map::new(),
        }
    }

    /// Adds a scalar parameter.
    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Builds the `linkStatus` notification for a connectivity transition.
    pub fn link_status(status: &LinkStatus) -> Self {
        match status {
            LinkStatus::Connected => Self::new(LINK_STATUS_METHOD).with_param("state", "connected"),
            LinkStatus::Disconnected { reason } => Self::new(LINK_STATUS_METHOD)
                .with_param("state", "disconnected")
                .with_param("reason", reason.as_str()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
