//! Response helpers shared by the API handlers.

use std::fmt::Display;

use serde_json::{json, Value};

use crate::http::response::{ResponseSink, SinkError};

/// Message written when a request arrives without the data it needs.
pub const BAD_REQUEST_BODY: &str = "Bad Request: Request body not received";

/// Write a complete plain-text response.
pub fn send_text(
    res: &mut ResponseSink,
    status: u16,
    message: &str,
    text: &str,
) -> Result<(), SinkError> {
    res.set_status(status)?;
    set_message_or_canonical(res, message)?;
    res.write(text)?;
    res.end();
    Ok(())
}

/// `200 OK` with `data` as the JSON body.
pub fn send_json(res: &mut ResponseSink, data: &Value) -> Result<(), SinkError> {
    res.set_status(200)?;
    res.set_status_message("OK")?;
    res.set_header("Content-Type", "application/json")?;
    res.write(data.to_string())?;
    res.end();
    Ok(())
}

/// `500 Server Error` with `{"error": "<err>"}` as the body.
pub fn server_error(res: &mut ResponseSink, err: &dyn Display) -> Result<(), SinkError> {
    res.set_status(500)?;
    res.set_status_message("Server Error")?;
    res.set_header("Content-Type", "application/json")?;
    res.write(json!({ "error": err.to_string() }).to_string())?;
    res.end();
    Ok(())
}

/// `400 Bad Request` with the standard missing-data message.
pub fn bad_request(res: &mut ResponseSink) -> Result<(), SinkError> {
    send_text(res, 400, "Bad Request", BAD_REQUEST_BODY)
}

/// Use `message` as the reason phrase unless it contains bytes a status
/// line cannot carry, in which case the canonical phrase is kept.
pub fn set_message_or_canonical(res: &mut ResponseSink, message: &str) -> Result<(), SinkError> {
    match res.set_status_message(message) {
        Err(SinkError::InvalidStatusMessage(_)) => {
            tracing::debug!(reason = message, "Status message not representable, using canonical reason");
            Ok(())
        }
        other => other,
    }
}

/// True when a request body carries usable data (`{}` and `null` do not).
pub fn has_content(body: &Option<Value>) -> bool {
    match body {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}
