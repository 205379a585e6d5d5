//! Handler interface.

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::http::response::ResponseSink;
use crate::routing::error::HandlerError;
use crate::routing::request::ParsedRequest;

/// Result produced by a handler.
///
/// The value is passed back to the caller of [`Router::route`]; handlers that
/// only write to the sink return `Value::Null`.
///
/// [`Router::route`]: crate::routing::Router::route
pub type HandlerResult = Result<Value, HandlerError>;

/// Application logic bound to a route.
///
/// The handler owns status, headers and body of the response; it is expected
/// to end the sink before returning.
pub trait Handler: Send + Sync {
    fn call<'a>(
        &'a self,
        request: &'a ParsedRequest,
        response: &'a mut ResponseSink,
    ) -> BoxFuture<'a, HandlerResult>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a ParsedRequest, &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync,
{
    fn call<'a>(
        &'a self,
        request: &'a ParsedRequest,
        response: &'a mut ResponseSink,
    ) -> BoxFuture<'a, HandlerResult> {
        self(request, response)
    }
}
