//! Live-updatable router.
//!
//! Requests load the current snapshot without locking. Registration after
//! startup clones the snapshot, applies the change and swaps it in, so a
//! request in flight keeps the table it started with.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::router::Router;

/// Shared, atomically swappable [`Router`].
#[derive(Debug)]
pub struct RouterHandle {
    inner: ArcSwap<Router>,
}

impl RouterHandle {
    pub fn new(router: Router) -> Self {
        Self {
            inner: ArcSwap::from_pointee(router),
        }
    }

    /// Current routing snapshot.
    pub fn load(&self) -> Arc<Router> {
        self.inner.load_full()
    }

    /// Apply `change` to a copy of the current router and publish it.
    ///
    /// Concurrent updates are serialized by retrying on conflict, so `change`
    /// may run more than once.
    pub fn update<F>(&self, change: F)
    where
        F: Fn(&mut Router),
    {
        self.inner.rcu(|current| {
            let mut next = Router::clone(current);
            change(&mut next);
            next
        });
    }

    /// Replace the whole router.
    pub fn replace(&self, router: Router) {
        self.inner.store(Arc::new(router));
    }
}

impl From<Router> for RouterHandle {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::method::Method;
    use futures_util::FutureExt;
    use serde_json::Value;

    #[test]
    fn test_update_publishes_new_snapshot() {
        let handle = RouterHandle::new(Router::new());
        let before = handle.load();

        handle.update(|router| {
            router.get("/late", |_, _| async { Ok(Value::Null) }.boxed());
        });

        assert!(before.lookup(Method::Get, "/late").is_none());
        assert!(handle.load().lookup(Method::Get, "/late").is_some());
    }

    #[test]
    fn test_update_keeps_existing_handlers() {
        let mut router = Router::new();
        let original = router.get("/", |_, _| async { Ok(Value::Null) }.boxed());
        let handle = RouterHandle::from(router);

        handle.update(|router| {
            router.post("/", |_, _| async { Ok(Value::Null) }.boxed());
        });

        let current = handle.load();
        assert!(Arc::ptr_eq(current.lookup(Method::Get, "/").unwrap(), &original));
        assert!(current.lookup(Method::Post, "/").is_some());
    }

    #[test]
    fn test_replace() {
        let handle = RouterHandle::new(Router::new());
        let mut router = Router::with_body_limit(16);
        router.delete("/x", |_, _| async { Ok(Value::Null) }.boxed());
        handle.replace(router);
        assert_eq!(handle.load().body_limit(), 16);
        assert_eq!(handle.load().table().len(), 1);
    }
}
