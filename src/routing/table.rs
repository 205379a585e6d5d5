//! Route table for O(1) exact-match lookup.
//!
//! Two-level map keyed by verb, then by the path string exactly as
//! registered. No normalization happens on either side of a lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::routing::handler::Handler;
use crate::routing::method::Method;

/// Reference-counted handler as stored in the table.
pub type SharedHandler = Arc<dyn Handler>;

/// Verb → path → handler.
///
/// Every verb in [`Method::ALL`] has an (initially empty) path map, so a
/// lookup never has to distinguish a missing verb from a missing path.
#[derive(Clone)]
pub struct RouteTable {
    routes: HashMap<Method, HashMap<String, SharedHandler>>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Method::ALL.iter().map(|m| (*m, HashMap::new())).collect(),
        }
    }

    /// Store `handler` under `(method, path)`, returning the handler it
    /// replaced, if any.
    pub fn insert(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: SharedHandler,
    ) -> Option<SharedHandler> {
        self.routes.entry(method).or_default().insert(path.into(), handler)
    }

    #[inline]
    pub fn get(&self, method: Method, path: &str) -> Option<&SharedHandler> {
        self.routes.get(&method).and_then(|paths| paths.get(path))
    }

    pub fn remove(&mut self, method: Method, path: &str) -> Option<SharedHandler> {
        self.routes.get_mut(&method).and_then(|paths| paths.remove(path))
    }

    /// Drop every route registered under `method`.
    pub fn clear_method(&mut self, method: Method) {
        if let Some(paths) = self.routes.get_mut(&method) {
            paths.clear();
        }
    }

    /// Number of routes registered under `method`.
    pub fn method_len(&self, method: Method) -> usize {
        self.routes.get(&method).map_or(0, HashMap::len)
    }

    /// Total number of routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered paths for `method`, in no particular order.
    pub fn paths(&self, method: Method) -> impl Iterator<Item = &str> {
        self.routes
            .get(&method)
            .into_iter()
            .flat_map(|paths| paths.keys().map(String::as_str))
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for method in Method::ALL {
            let mut paths: Vec<&str> = self.paths(method).collect();
            paths.sort_unstable();
            map.entry(&method, &paths);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::ResponseSink;
    use crate::routing::handler::HandlerResult;
    use crate::routing::request::ParsedRequest;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;

    fn noop<'a>(_: &'a ParsedRequest, _: &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult> {
        async { Ok(serde_json::Value::Bool(true)) }.boxed()
    }

    fn handler() -> SharedHandler {
        Arc::new(noop)
    }

    #[test]
    fn test_every_method_starts_empty() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        for method in Method::ALL {
            assert_eq!(table.method_len(method), 0);
            assert!(table.get(method, "/").is_none());
        }
    }

    #[test]
    fn test_insert_and_get_identity() {
        let mut table = RouteTable::new();
        let h = handler();
        assert!(table.insert(Method::Get, "/", h.clone()).is_none());
        assert!(Arc::ptr_eq(table.get(Method::Get, "/").unwrap(), &h));
        assert!(table.get(Method::Post, "/").is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut table = RouteTable::new();
        let first = handler();
        let second = handler();
        table.insert(Method::Put, "/a", first.clone());
        let replaced = table.insert(Method::Put, "/a", second.clone()).unwrap();
        assert!(Arc::ptr_eq(&replaced, &first));
        assert!(Arc::ptr_eq(table.get(Method::Put, "/a").unwrap(), &second));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_exact_keys() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/books/", handler());
        table.insert(Method::Get, "", handler());
        table.insert(Method::Get, "relative", handler());
        assert!(table.get(Method::Get, "/books").is_none());
        assert!(table.get(Method::Get, "/Books/").is_none());
        assert!(table.get(Method::Get, "").is_some());
        assert!(table.get(Method::Get, "relative").is_some());
    }

    #[test]
    fn test_clear_and_remove() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/a", handler());
        table.insert(Method::Get, "/b", handler());
        table.insert(Method::Delete, "/a", handler());
        assert!(table.remove(Method::Delete, "/a").is_some());
        table.clear_method(Method::Get);
        assert!(table.is_empty());
    }

    #[test]
    fn test_debug_lists_paths() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/b", handler());
        table.insert(Method::Get, "/a", handler());
        let debug = format!("{:?}", table);
        assert!(debug.contains(r#"Get: ["/a", "/b"]"#));
    }
}
