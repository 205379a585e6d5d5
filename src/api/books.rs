//! Greeting and book catalog routes.
//!
//! The catalog is a fixed set of ids; writes are echoed back, not stored.

use serde_json::Value;

use crate::api::reply::{bad_request, has_content, send_text, set_message_or_canonical};
use crate::http::response::ResponseSink;
use crate::routing::{HandlerResult, ParsedRequest};

/// Book ids known to the catalog.
pub const CATALOG: [&str; 3] = ["123", "321", "256"];

/// `GET /` — says hello to the optional `name` query parameter.
pub async fn hello(req: &ParsedRequest, res: &mut ResponseSink) -> HandlerResult {
    let name = req.query_param("name").unwrap_or_default();
    send_text(res, 200, "OK", &format!("Hello {}", name))?;
    Ok(Value::Null)
}

/// `GET /api/v1/books/?id=<id>`
pub async fn get_book(req: &ParsedRequest, res: &mut ResponseSink) -> HandlerResult {
    match req.non_empty_param("id") {
        None => send_text(res, 400, "bad request", "bad request")?,
        Some(id) if CATALOG.contains(&id) => {
            send_text(res, 200, "OK", &format!("Book number {} is requested", id))?
        }
        Some(id) => {
            tracing::debug!(id, "Book not in catalog");
            send_text(res, 404, "not found", "resource not found")?
        }
    }
    Ok(Value::Null)
}

/// `POST /api/v1/books/` — echoes the JSON body.
pub async fn create_book(req: &ParsedRequest, res: &mut ResponseSink) -> HandlerResult {
    let Some(body) = req.body.as_ref().filter(|_| has_content(&req.body)) else {
        bad_request(res)?;
        return Ok(Value::Null);
    };
    send_text(res, 200, "OK", &body.to_string())?;
    Ok(body.clone())
}

/// `PUT /api/v1/books/?id=<id>` — echoes the JSON body.
pub async fn update_book(req: &ParsedRequest, res: &mut ResponseSink) -> HandlerResult {
    let Some(body) = req.body.as_ref().filter(|_| has_content(&req.body)) else {
        bad_request(res)?;
        return Ok(Value::Null);
    };
    let id = req.query_param("id").unwrap_or_default();
    res.set_status(200)?;
    set_message_or_canonical(res, &format!("{} PUT Request", id))?;
    res.write(body.to_string())?;
    res.end();
    Ok(body.clone())
}

/// `DELETE /api/v1/books/?id=<id>`
pub async fn delete_book(req: &ParsedRequest, res: &mut ResponseSink) -> HandlerResult {
    match req.non_empty_param("id") {
        Some(id) => send_text(
            res,
            200,
            &format!("OK{}", id),
            &format!("book record {} is deleted", id),
        )?,
        None => send_text(res, 400, "bad request", "bad request")?,
    }
    Ok(Value::Null)
}
