//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     application code
//!     → router.rs (get/put/patch/post/delete)
//!     → table.rs (method → path → handler)
//!
//! Per request:
//!     http::Request
//!     → request.rs (method, pathname, query, JSON body)
//!     → router.rs (exact lookup)
//!     → matched handler, or standard 404
//! ```
//!
//! # Design Decisions
//! - Exact-match only, no wildcards or parameters
//! - One handler per (method, path); last registration wins
//! - Router is an explicit value, never process-global state
//! - Route changes while serving go through `RouterHandle` snapshots

pub mod error;
pub mod handle;
pub mod handler;
pub mod method;
pub mod request;
pub mod router;
pub mod table;

pub use error::{HandlerError, ParseError};
pub use handle::RouterHandle;
pub use handler::{Handler, HandlerResult};
pub use method::Method;
pub use request::ParsedRequest;
pub use router::{Dispatch, DispatchState, Router};
pub use table::{RouteTable, SharedHandler};
