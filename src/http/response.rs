//! Response sink shared by the dispatcher and handlers.
//!
//! # Responsibilities
//! - Collect status code, status message, headers and body bytes
//! - Refuse further writes once the response has been ended
//! - Convert the collected response into an axum `Response`
//!
//! # Design Decisions
//! - The status message travels as the HTTP/1.1 reason phrase
//! - The body is buffered; handlers in this service produce small payloads

use std::borrow::Cow;

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use hyper::ext::ReasonPhrase;
use thiserror::Error;

/// Errors raised by [`ResponseSink`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("response already ended")]
    Ended,

    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid status message '{0}'")]
    InvalidStatusMessage(String),

    #[error("invalid header '{0}'")]
    InvalidHeader(String),
}

/// Mutable response under construction.
#[derive(Debug)]
pub struct ResponseSink {
    status: StatusCode,
    status_message: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    ended: bool,
}

impl Default for ResponseSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSink {
    /// A fresh `200 OK` response with no headers and no body.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            status_message: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            ended: false,
        }
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.ended {
            Err(SinkError::Ended)
        } else {
            Ok(())
        }
    }

    pub fn set_status(&mut self, code: u16) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.status = StatusCode::from_u16(code).map_err(|_| SinkError::InvalidStatus(code))?;
        Ok(())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Set the reason phrase sent on the status line.
    pub fn set_status_message(&mut self, message: impl Into<String>) -> Result<(), SinkError> {
        self.ensure_open()?;
        let message = message.into();
        if ReasonPhrase::try_from(message.as_bytes()).is_err() {
            return Err(SinkError::InvalidStatusMessage(message));
        }
        self.status_message = Some(message);
        Ok(())
    }

    /// Reason phrase set by the handler, or the canonical one for the status.
    pub fn status_message(&self) -> &str {
        match &self.status_message {
            Some(message) => message,
            None => self.status.canonical_reason().unwrap_or(""),
        }
    }

    /// Set a header, replacing any previous value.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), SinkError> {
        self.ensure_open()?;
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SinkError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| SinkError::InvalidHeader(name.as_str().to_string()))?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Append bytes to the body.
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.body.extend_from_slice(chunk.as_ref());
        Ok(())
    }

    /// Finalize the response. Ending twice is a no-op.
    pub fn end(&mut self) {
        self.ended = true;
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl IntoResponse for ResponseSink {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        if let Some(reason) = self
            .status_message
            .and_then(|m| ReasonPhrase::try_from(m.into_bytes()).ok())
        {
            response.extensions_mut().insert(reason);
        }
        response
    }
}
