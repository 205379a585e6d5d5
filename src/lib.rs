//! Exact-match HTTP request dispatcher with a small notes/books API.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::ServerConfig;
pub use http::{HttpServer, ResponseSink};
pub use lifecycle::Shutdown;
pub use routing::{Dispatch, Method, ParsedRequest, Router, RouterHandle};
