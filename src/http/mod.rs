//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, body limit, tracing)
//!     → routing::Router::route (parse, match, handle)
//!     → response.rs (sink filled by the dispatcher or a handler)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{ResponseSink, SinkError};
pub use server::{AppState, HttpServer, X_REQUEST_ID};
