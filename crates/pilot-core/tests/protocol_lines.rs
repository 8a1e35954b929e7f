//! Integration tests for the pilot-core line protocol.
//!
//! These drive the public API the way the dispatcher does: decode a line,
//! turn it into a typed request, and encode the reply line.

use pilot_core::protocol::{
    decode_command, encode_line, Request, RequestId, Response, ResultPayload,
};
use pilot_core::timing::TimingProfile;
use pilot_core::ProtocolError;
use serde_json::{json, Value};

fn reply_for(line: &str) -> Option<Value> {
    let command = match decode_command(line) {
        Ok(command) => command,
        Err(failure) => {
            let id = failure.id?;
            let out = encode_line(&Response::failure(id, &failure.error)).unwrap();
            return Some(serde_json::from_str(&out).unwrap());
        }
    };
    let id = command.id.clone()?;
    let response = match Request::from_command(&command) {
        Ok(_) => Response::success(id, ResultPayload::detail("ok")),
        Err(err) => Response::failure(id, &err),
    };
    let out = encode_line(&response).unwrap();
    Some(serde_json::from_str(&out).unwrap())
}

#[test]
fn test_string_id_is_echoed_as_string() {
    let reply = reply_for(r#"{"method":"move","params":{"x":1,"y":2},"id":"17"}"#).unwrap();
    assert_eq!(reply["id"], json!("17"));
    assert!(reply["result"].is_object());
}

#[test]
fn test_integer_id_is_echoed_as_integer() {
    let reply = reply_for(r#"{"method":"move","params":{"x":1,"y":2},"id":17}"#).unwrap();
    assert_eq!(reply["id"], json!(17));
}

#[test]
fn test_command_without_id_gets_no_reply() {
    assert!(reply_for(r#"{"method":"move","params":{"x":1,"y":2}}"#).is_none());
}

#[test]
fn test_unknown_method_reply_carries_unsupported_code() {
    let reply = reply_for(r#"{"method":"fly","id":1}"#).unwrap();
    assert_eq!(reply["error"]["code"], json!(-32601));
    assert_eq!(reply["id"], json!(1));
}

#[test]
fn test_bad_params_reply_carries_params_invalid_code() {
    let reply = reply_for(r#"{"method":"click","params":{"x":1},"id":"c"}"#).unwrap();
    assert_eq!(reply["error"]["code"], json!(-32602));
    assert_eq!(reply["id"], json!("c"));
}

#[test]
fn test_undecodable_line_with_id_is_answered() {
    let reply = reply_for(r#"{"method":5,"id":2}"#).unwrap();
    assert_eq!(reply["error"]["code"], json!(-32700));
    assert_eq!(reply["id"], json!(2));
}

#[test]
fn test_undecodable_line_without_id_is_dropped() {
    assert!(reply_for("{{{").is_none());
}

#[test]
fn test_configure_request_applies_to_profile() {
    let command =
        decode_command(r#"{"method":"configure","params":{"clickHoldMs":80},"id":1}"#).unwrap();
    let Request::Configure(params) = Request::from_command(&command).unwrap() else {
        panic!("expected configure");
    };
    let profile = TimingProfile::default().apply(&params.timing).unwrap();
    assert_eq!(profile.click_hold.as_millis(), 80);
    assert_eq!(
        TimingProfile {
            click_hold: profile.click_hold,
            ..TimingProfile::default()
        },
        profile
    );
}

#[test]
fn test_configure_zero_pixels_per_step_maps_to_params_invalid() {
    let command =
        decode_command(r#"{"method":"configure","params":{"dragPixelsPerStep":0}}"#).unwrap();
    let Request::Configure(params) = Request::from_command(&command).unwrap() else {
        panic!("expected configure");
    };
    let err: ProtocolError = TimingProfile::default()
        .apply(&params.timing)
        .unwrap_err()
        .into();
    assert_eq!(err.code(), -32602);
}

#[test]
fn test_request_id_display() {
    assert_eq!(RequestId::Number(3).to_string(), "3");
    assert_eq!(RequestId::String("x".into()).to_string(), "\"x\"");
}
