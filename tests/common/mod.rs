//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use route_dispatch::storage::{MemoryStore, NoteStore};
use route_dispatch::{api, HttpServer, Router, ServerConfig, Shutdown};
use tokio::net::TcpListener;

/// A running server plus the handles a test needs to drive it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MemoryStore,
    pub shutdown: Shutdown,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Router with the application routes over a fresh in-memory store.
#[allow(dead_code)]
pub fn app_router() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let mut router = Router::new();
    api::register(&mut router, Arc::new(store.clone()) as Arc<dyn NoteStore>);
    (router, store)
}

/// Start the application on an ephemeral local port.
#[allow(dead_code)]
pub async fn start_server() -> TestServer {
    let (router, store) = app_router();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, router);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestServer {
        addr,
        store,
        shutdown,
        client,
    }
}
