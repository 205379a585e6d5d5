//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Expose the registration surface (`get`, `put`, `patch`, `post`, `delete`)
//! - Parse each inbound request and look up its handler
//! - Invoke the handler, or answer with the standard 404
//!
//! # Design Decisions
//! - Exact `(method, path)` match only; a path registered under another verb
//!   is indistinguishable from an unknown path
//! - A request that fails to parse takes the same 404 path as a lookup miss
//! - Last registration wins; overwrites are logged, never rejected
//! - Handler errors are returned untouched

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::http::response::{ResponseSink, SinkError};
use crate::observability::metrics;
use crate::routing::error::HandlerError;
use crate::routing::handler::{Handler, HandlerResult};
use crate::routing::method::Method;
use crate::routing::request::{self, ParsedRequest, DEFAULT_BODY_LIMIT};
use crate::routing::table::{RouteTable, SharedHandler};

/// Outcome of a dispatch that did not fail inside a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// A handler ran; carries the value it returned.
    Handled(Value),
    /// No handler matched and the 404 response was written.
    NotFound,
}

/// Per-request dispatch progress, reported in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Parsing,
    Matching,
    Handling,
    NotFound,
}

impl DispatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchState::Parsing => "parsing",
            DispatchState::Matching => "matching",
            DispatchState::Handling => "handling",
            DispatchState::NotFound => "not_found",
        }
    }
}

/// Owns a route table and dispatches requests against it.
///
/// Registration needs `&mut self`, so it completes before the router is
/// shared behind an `Arc`. Use [`RouterHandle`] to change routes while
/// serving.
///
/// [`RouterHandle`]: crate::routing::RouterHandle
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    body_limit: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_body_limit(DEFAULT_BODY_LIMIT)
    }

    /// Router that reads at most `body_limit` bytes of request body.
    pub fn with_body_limit(body_limit: usize) -> Self {
        Self {
            table: RouteTable::new(),
            body_limit,
        }
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RouteTable {
        &mut self.table
    }

    /// Bind `handler` to `(method, path)`, replacing any earlier binding.
    ///
    /// The path is stored verbatim. Returns the stored handler.
    pub fn register(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: SharedHandler,
    ) -> SharedHandler {
        let path = path.into();
        if self
            .table
            .insert(method, path.clone(), handler.clone())
            .is_some()
        {
            tracing::warn!(method = %method, path = %path, "Route re-registered, previous handler replaced");
        } else {
            tracing::debug!(method = %method, path = %path, "Route registered");
        }
        metrics::record_routes_registered(self.table.len());
        handler
    }

    fn register_fn<F>(&mut self, method: Method, path: impl Into<String>, handler: F) -> SharedHandler
    where
        F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.register(method, path, Arc::new(handler))
    }

    pub fn get<F>(&mut self, path: impl Into<String>, handler: F) -> SharedHandler
    where
        F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(Method::Get, path, handler)
    }

    pub fn put<F>(&mut self, path: impl Into<String>, handler: F) -> SharedHandler
    where
        F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(Method::Put, path, handler)
    }

    pub fn patch<F>(&mut self, path: impl Into<String>, handler: F) -> SharedHandler
    where
        F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(Method::Patch, path, handler)
    }

    pub fn post<F>(&mut self, path: impl Into<String>, handler: F) -> SharedHandler
    where
        F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(Method::Post, path, handler)
    }

    pub fn delete<F>(&mut self, path: impl Into<String>, handler: F) -> SharedHandler
    where
        F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.register_fn(Method::Delete, path, handler)
    }

    /// Handler bound to exactly `(method, path)`.
    #[inline]
    pub fn lookup(&self, method: Method, path: &str) -> Option<&SharedHandler> {
        self.table.get(method, path)
    }

    /// Parse `request`, then dispatch it.
    ///
    /// Parse failures are logged and answered with the standard 404; they
    /// never surface as errors. Only a matched handler can return `Err`.
    pub async fn route(
        &self,
        request: Request<Body>,
        response: &mut ResponseSink,
    ) -> Result<Dispatch, HandlerError> {
        let start = Instant::now();
        let method_label = request.method().as_str().to_string();
        tracing::trace!(state = DispatchState::Parsing.as_str(), target = %request.uri(), "Dispatching");

        match request::parse(request, self.body_limit).await {
            Ok(parsed) => self.dispatch(&parsed, response).await,
            Err(e) => {
                tracing::debug!(error = %e, "Request could not be parsed, treating as no route");
                write_not_found(response, e.pathname());
                metrics::record_dispatch(&method_label, DispatchState::NotFound.as_str(), start);
                Ok(Dispatch::NotFound)
            }
        }
    }

    /// Dispatch an already-parsed request.
    pub async fn dispatch(
        &self,
        request: &ParsedRequest,
        response: &mut ResponseSink,
    ) -> Result<Dispatch, HandlerError> {
        let start = Instant::now();
        let method = request.method;
        tracing::trace!(
            state = DispatchState::Matching.as_str(),
            method = %method,
            pathname = %request.pathname,
            "Looking up route"
        );

        let Some(handler) = self.lookup(method, &request.pathname) else {
            tracing::debug!(
                state = DispatchState::NotFound.as_str(),
                method = %method,
                pathname = %request.pathname,
                "No route"
            );
            write_not_found(response, Some(&request.pathname));
            metrics::record_dispatch(method.as_str(), DispatchState::NotFound.as_str(), start);
            return Ok(Dispatch::NotFound);
        };

        tracing::trace!(state = DispatchState::Handling.as_str(), method = %method, pathname = %request.pathname, "Invoking handler");
        match handler.call(request, response).await {
            Ok(value) => {
                metrics::record_dispatch(method.as_str(), DispatchState::Handling.as_str(), start);
                Ok(Dispatch::Handled(value))
            }
            Err(e) => {
                tracing::warn!(method = %method, pathname = %request.pathname, error = %e, "Handler failed");
                metrics::record_dispatch(method.as_str(), "handler_error", start);
                Err(e)
            }
        }
    }
}

/// Body text of the standard not-found response.
pub fn not_found_body(pathname: Option<&str>) -> String {
    format!("Resource Not Found ({})", pathname.unwrap_or_default())
}

/// Write the standard 404 and end the response.
///
/// A sink that was already ended is left as it is.
pub fn write_not_found(response: &mut ResponseSink, pathname: Option<&str>) {
    if let Err(e) = try_write_not_found(response, pathname) {
        tracing::trace!(error = %e, "Response already ended, 404 not written");
    }
}

fn try_write_not_found(response: &mut ResponseSink, pathname: Option<&str>) -> Result<(), SinkError> {
    response.set_status(404)?;
    response.set_status_message("Not Found")?;
    response.write(not_found_body(pathname))?;
    response.end();
    Ok(())
}
