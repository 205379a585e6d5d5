//! Application routes.
//!
//! # Routes
//! ```text
//! GET    /                  greeting
//! GET    /api/v1/books/     catalog lookup by ?id
//! POST   /api/v1/books/     echo JSON body
//! PUT    /api/v1/books/     echo JSON body
//! DELETE /api/v1/books/     delete by ?id
//! GET    /api/v1/notes/     note by ?id
//! POST   /api/v1/notes/     store JSON body
//! DELETE /api/v1/notes/     delete by ?id
//! ```
//!
//! Handlers map every store failure to a response themselves; none of them
//! returns `Err` for a storage problem.

pub mod books;
pub mod notes;
pub mod reply;

use std::sync::Arc;

use futures_util::FutureExt;

use crate::routing::Router;
use crate::storage::NoteStore;

pub const BOOKS_PATH: &str = "/api/v1/books/";
pub const NOTES_PATH: &str = "/api/v1/notes/";

/// Register every application route on `router`.
pub fn register(router: &mut Router, store: Arc<dyn NoteStore>) {
    router.get("/", |req, res| books::hello(req, res).boxed());

    router.get(BOOKS_PATH, |req, res| books::get_book(req, res).boxed());
    router.post(BOOKS_PATH, |req, res| books::create_book(req, res).boxed());
    router.put(BOOKS_PATH, |req, res| books::update_book(req, res).boxed());
    router.delete(BOOKS_PATH, |req, res| books::delete_book(req, res).boxed());

    let s = store.clone();
    router.get(NOTES_PATH, move |req, res| notes::get_note(s.clone(), req, res).boxed());
    let s = store.clone();
    router.post(NOTES_PATH, move |req, res| notes::create_note(s.clone(), req, res).boxed());
    router.delete(NOTES_PATH, move |req, res| notes::delete_note(store.clone(), req, res).boxed());

    tracing::info!(routes = router.table().len(), "Application routes registered");
}
