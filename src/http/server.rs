//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app whose single fallback feeds the dispatcher
//! - Wire up middleware (request ID, tracing, timeout)
//!
//! # Design Decisions
//! - The body size limit is enforced by the dispatcher's parser, so an
//!   oversized body gets the same 404 as any other unparseable request
//! - Bind server to listener and shut down gracefully
//! - Guarantee a terminated response even when a handler fails

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::response::ResponseSink;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{Dispatch, RouterHandle};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RouterHandle>,
}

/// HTTP server fronting a [`RouterHandle`].
pub struct HttpServer {
    app: Router,
    config: ServerConfig,
    router: Arc<RouterHandle>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and routes.
    pub fn new(config: ServerConfig, router: impl Into<RouterHandle>) -> Self {
        let router = Arc::new(router.into());
        let state = AppState {
            router: router.clone(),
        };
        let app = Self::build_app(&config, state);
        Self { app, config, router }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.limits.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum app, for serving or for driving in-process.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Handle for changing routes while serving.
    pub fn router(&self) -> Arc<RouterHandle> {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.router.load().table().len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.app.into_make_service())
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fallback handler: every request goes through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let router = state.router.load();
    let mut sink = ResponseSink::new();

    let response = match router.route(request, &mut sink).await {
        Ok(outcome) => {
            if !sink.is_ended() {
                tracing::debug!(request_id = %request_id, "Handler returned without ending the response");
            }
            if outcome == Dispatch::NotFound {
                tracing::debug!(request_id = %request_id, "No route matched");
            }
            sink.into_response()
        }
        Err(e) if sink.is_ended() => {
            tracing::warn!(request_id = %request_id, error = %e, "Handler failed after ending the response");
            sink.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    };

    metrics::record_response(response.status().as_u16());
    response
}
