//! Notes routes, backed by the configured [`NoteStore`].

use std::sync::Arc;

use serde_json::Value;

use crate::api::reply::{bad_request, send_json, server_error};
use crate::http::response::ResponseSink;
use crate::routing::{HandlerResult, ParsedRequest};
use crate::storage::{NoteStore, StorageError};

/// `GET /api/v1/notes/?id=<id>`
///
/// A missing record is reported as a server error, like any other store
/// failure.
pub async fn get_note(
    store: Arc<dyn NoteStore>,
    req: &ParsedRequest,
    res: &mut ResponseSink,
) -> HandlerResult {
    let Some(id) = req.non_empty_param("id") else {
        bad_request(res)?;
        return Ok(Value::Null);
    };

    match store.find_one(id).await {
        Ok(record) => {
            send_json(res, &record)?;
            Ok(record)
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Note lookup failed");
            server_error(res, &e)?;
            Ok(Value::Null)
        }
    }
}

/// `POST /api/v1/notes/` — stores the JSON body as a note.
pub async fn create_note(
    store: Arc<dyn NoteStore>,
    req: &ParsedRequest,
    res: &mut ResponseSink,
) -> HandlerResult {
    let Some(body) = req.body.clone() else {
        bad_request(res)?;
        return Ok(Value::Null);
    };

    match store.save(body).await {
        Ok(record) => {
            send_json(res, &record)?;
            Ok(record)
        }
        Err(StorageError::NotAnObject | StorageError::InvalidId { .. }) => {
            bad_request(res)?;
            Ok(Value::Null)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save note");
            server_error(res, &e)?;
            Ok(Value::Null)
        }
    }
}

/// `DELETE /api/v1/notes/?id=<id>` — answers `204 No Content`.
pub async fn delete_note(
    store: Arc<dyn NoteStore>,
    req: &ParsedRequest,
    res: &mut ResponseSink,
) -> HandlerResult {
    let Some(id) = req.non_empty_param("id") else {
        bad_request(res)?;
        return Ok(Value::Null);
    };

    match store.delete_one(id).await {
        Ok(deleted) => {
            tracing::debug!(id, deleted, "Note delete");
            res.set_status(204)?;
            res.set_status_message("No Content")?;
            res.end();
            Ok(serde_json::json!({ "id": id, "deleted": deleted }))
        }
        Err(e) => {
            tracing::error!(id, error = %e, "Failed to delete note");
            server_error(res, &e)?;
            Ok(Value::Null)
        }
    }
}
