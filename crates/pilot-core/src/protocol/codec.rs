//! Line codec for the JSON command protocol, plus the protocol error taxonomy.
//!
//! Wire format: one JSON object per line, UTF-8, `\n` terminated.  Encoding
//! never produces embedded newlines because `serde_json` escapes them inside
//! strings.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use crate::keysym::KeysymError;
use crate::protocol::messages::{Command, RequestId, DEFAULT_ERROR_CODE};
use crate::timing::TimingError;

/// Everything that can fail while handling one command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line is not a valid command object.
    #[error("decode error: {0}")]
    Decode(String),

    /// Required parameters are missing or have the wrong type.
    #[error("invalid params: {0}")]
    ParamsInvalid(String),

    /// The method name is not recognised.
    #[error("unsupported method: {0}")]
    Unsupported(String),

    /// A key name or character could not be resolved.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// The device link failed while transmitting an event.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// A reply could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

impl ProtocolError {
    /// Numeric error code carried in the error response.
    pub fn code(&self) -> i64 {
        match self {
            ProtocolError::Decode(_) => -32700,
            ProtocolError::Unsupported(_) => -32601,
            ProtocolError::ParamsInvalid(_) => -32602,
            ProtocolError::UnknownKey(_)
            | ProtocolError::SendFailed(_)
            | ProtocolError::Encode(_) => DEFAULT_ERROR_CODE,
        }
    }
}

impl From<KeysymError> for ProtocolError {
    fn from(err: KeysymError) -> Self {
        match err {
            KeysymError::UnknownKey(name) => ProtocolError::UnknownKey(name),
        }
    }
}

impl From<TimingError> for ProtocolError {
    fn from(err: TimingError) -> Self {
        ProtocolError::ParamsInvalid(err.to_string())
    }
}

/// A line that could not be decoded into a [`Command`].
///
/// `id` is set when the line was valid JSON carrying a usable `id`, so the
/// failure can still be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub id: Option<RequestId>,
    pub error: ProtocolError,
}

/// Decodes one input line into a [`Command`].
///
/// # Errors
///
/// Returns a [`DecodeFailure`] if the line is not JSON or does not have the
/// command shape.
///
/// # Examples
///
/// ```rust
/// use pilot_core::protocol::{decode_command, RequestId};
///
/// let cmd = decode_command(r#"{"method":"cursor","id":"a"}"#).unwrap();
/// assert_eq!(cmd.id, Some(RequestId::String("a".into())));
///
/// let failure = decode_command(r#"{"id":3}"#).unwrap_err();
/// assert_eq!(failure.id, Some(RequestId::Number(3)));
/// ```
pub fn decode_command(line: &str) -> Result<Command, DecodeFailure> {
    let value: Value = serde_json::from_str(line).map_err(|e| DecodeFailure {
        id: None,
        error: ProtocolError::Decode(e.to_string()),
    })?;

    let id = salvage_id(&value);
    let command: Command = serde_json::from_value(value).map_err(|e| DecodeFailure {
        id,
        error: ProtocolError::Decode(e.to_string()),
    })?;
    trace!(method = %command.method, "decoded command");
    Ok(command)
}

fn salvage_id(value: &Value) -> Option<RequestId> {
    value
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}

/// Serializes one outbound message (response or notification) as a line,
/// including the trailing `\n`.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, ProtocolError> {
    let mut line =
        serde_json::to_string(message).map_err(|e| ProtocolError::Encode(e.to_string()))?;
    line.push('\n');
    Ok(line)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::{Notification, ResultPayload, Response};

    #[test]
    fn test_decode_valid_command() {
        let cmd = decode_command(r#"{"method":"move","params":{"x":1,"y":2},"id":9}"#).unwrap();
        assert_eq!(cmd.method, "move");
        assert_eq!(cmd.params["x"], 1);
        assert_eq!(cmd.id, Some(RequestId::Number(9)));
    }

    #[test]
    fn test_decode_garbage_has_no_id() {
        let failure = decode_command("not json").unwrap_err();
        assert_eq!(failure.id, None);
        assert!(matches!(failure.error, ProtocolError::Decode(_)));
    }

    #[test]
    fn test_decode_missing_method_salvages_string_id() {
        let failure = decode_command(r#"{"params":{},"id":"q1"}"#).unwrap_err();
        assert_eq!(failure.id, Some(RequestId::String("q1".to_string())));
        assert_eq!(failure.error.code(), -32700);
    }

    #[test]
    fn test_decode_non_object_line() {
        let failure = decode_command("[1,2,3]").unwrap_err();
        assert_eq!(failure.id, None);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ProtocolError::Decode(String::new()).code(), -32700);
        assert_eq!(ProtocolError::Unsupported(String::new()).code(), -32601);
        assert_eq!(ProtocolError::ParamsInvalid(String::new()).code(), -32602);
        assert_eq!(ProtocolError::UnknownKey(String::new()).code(), -32000);
        assert_eq!(ProtocolError::SendFailed(String::new()).code(), -32000);
    }

    #[test]
    fn test_keysym_error_maps_to_unknown_key() {
        let err: ProtocolError = KeysymError::UnknownKey("zz".to_string()).into();
        assert_eq!(err, ProtocolError::UnknownKey("zz".to_string()));
    }

    #[test]
    fn test_encode_line_is_single_terminated_line() {
        let resp = Response::success(
            RequestId::Number(1),
            ResultPayload::detail("multi\nline detail"),
        );
        let line = encode_line(&resp).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_encode_notification_line() {
        let line = encode_line(&Notification::new("ready")).unwrap();
        assert_eq!(line, "{\"method\":\"ready\",\"params\":{}}\n");
    }
}
