//! Request parsing.
//!
//! # Responsibilities
//! - Resolve the request target into a path and query parameters
//! - Consume the body stream and decode it as JSON when present
//! - Reject verbs the route table cannot hold
//!
//! # Design Decisions
//! - Query values are always strings; a repeated key keeps its last value
//! - An empty (or whitespace-only) body is `None`, not an error
//! - The path is kept exactly as sent: no dot-segment removal, no slash
//!   collapsing, so `/a` and `/a/` stay distinct

use std::collections::HashMap;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, Uri};
use serde_json::Value;
use url::form_urlencoded;

use crate::routing::error::ParseError;
use crate::routing::method::Method;

/// Body size accepted when no limit is configured (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Request-scoped view of an inbound request used for routing and by
/// handlers.
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub method: Method,
    /// Path component of the target, before the `?`.
    pub pathname: String,
    pub query: HashMap<String, String>,
    /// Decoded JSON body, if the request carried one.
    pub body: Option<Value>,
    pub headers: HeaderMap,
    /// Raw request target as received.
    pub target: String,
}

impl ParsedRequest {
    /// Build a body-less request from a verb and a target.
    pub fn new(method: Method, target: &str) -> Result<Self, ParseError> {
        let uri = target
            .parse::<Uri>()
            .map_err(|source| ParseError::InvalidTarget {
                target: target.to_string(),
                source,
            })?;
        Ok(Self {
            method,
            pathname: uri.path().to_string(),
            query: parse_query(uri.query()),
            body: None,
            headers: HeaderMap::new(),
            target: target.to_string(),
        })
    }

    /// Value of a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Value of a query parameter, treating an empty value as absent.
    pub fn non_empty_param(&self, key: &str) -> Option<&str> {
        self.query_param(key).filter(|v| !v.is_empty())
    }
}

/// Parse an inbound request, reading at most `body_limit` bytes of body.
pub async fn parse(request: Request<Body>, body_limit: usize) -> Result<ParsedRequest, ParseError> {
    let (parts, body) = request.into_parts();
    let target = parts.uri.to_string();
    let pathname = parts.uri.path().to_string();

    let method =
        Method::try_from(&parts.method).map_err(|e| ParseError::from(e).with_pathname(&pathname))?;

    let bytes = axum::body::to_bytes(body, body_limit)
        .await
        .map_err(|e| ParseError::Body {
            pathname: pathname.clone(),
            message: e.to_string(),
        })?;
    let body = parse_body(&bytes, &pathname)?;

    tracing::trace!(
        method = %method,
        pathname = %pathname,
        has_body = body.is_some(),
        "Request parsed"
    );

    Ok(ParsedRequest {
        method,
        pathname,
        query: parse_query(parts.uri.query()),
        body,
        headers: parts.headers,
        target,
    })
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    // Later pairs overwrite earlier ones.
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn parse_body(bytes: &Bytes, pathname: &str) -> Result<Option<Value>, ParseError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|source| ParseError::Json {
            pathname: pathname.to_string(),
            source,
        })
}
