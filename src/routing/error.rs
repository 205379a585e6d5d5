//! Routing error types

use thiserror::Error;

use crate::http::response::SinkError;
use crate::storage::StorageError;

/// Failures while turning an inbound request into a [`ParsedRequest`].
///
/// The dispatcher recovers from every variant by answering 404, so these
/// never escape [`Router::route`].
///
/// [`ParsedRequest`]: crate::routing::ParsedRequest
/// [`Router::route`]: crate::routing::Router::route
#[derive(Debug, Error)]
pub enum ParseError {
    /// Verb outside the supported set
    #[error("unsupported method '{method}'")]
    UnsupportedMethod {
        method: String,
        pathname: Option<String>,
    },

    /// Request target could not be read as a URL
    #[error("invalid request target '{target}': {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    /// Body stream failed or exceeded the size limit
    #[error("failed to read request body for '{pathname}': {message}")]
    Body { pathname: String, message: String },

    /// Body was present but not valid JSON
    #[error("malformed JSON body for '{pathname}': {source}")]
    Json {
        pathname: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    /// Path of the failed request, when parsing got far enough to know it.
    pub fn pathname(&self) -> Option<&str> {
        match self {
            ParseError::UnsupportedMethod { pathname, .. } => pathname.as_deref(),
            ParseError::InvalidTarget { .. } => None,
            ParseError::Body { pathname, .. } | ParseError::Json { pathname, .. } => {
                Some(pathname)
            }
        }
    }

    /// Attach the request path to an error raised before it was known.
    pub(crate) fn with_pathname(self, path: &str) -> Self {
        match self {
            ParseError::UnsupportedMethod { method, pathname: None } => {
                ParseError::UnsupportedMethod {
                    method,
                    pathname: Some(path.to_string()),
                }
            }
            other => other,
        }
    }
}

/// Failures raised by a matched handler.
///
/// The dispatcher hands these back untouched; mapping them to a status code
/// is the handler's job (or, as a last resort, the HTTP host's).
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("response error: {0}")]
    Sink(#[from] SinkError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    #[inline]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_keeps_pathname() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ParseError::Json {
            pathname: "/api/v1/notes/".into(),
            source,
        };
        assert_eq!(err.pathname(), Some("/api/v1/notes/"));
        assert!(err.to_string().contains("malformed JSON"));
    }

    #[test]
    fn test_with_pathname_fills_unsupported_method() {
        let err = ParseError::UnsupportedMethod {
            method: "HEAD".into(),
            pathname: None,
        }
        .with_pathname("/x");
        assert_eq!(err.pathname(), Some("/x"));
    }

    #[test]
    fn test_invalid_target_has_no_pathname() {
        let source = "/has space".parse::<axum::http::Uri>().unwrap_err();
        let err = ParseError::InvalidTarget {
            target: "/has space".into(),
            source,
        };
        assert_eq!(err.pathname(), None);
    }

    #[test]
    fn test_handler_error_other() {
        let err = HandlerError::other("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
