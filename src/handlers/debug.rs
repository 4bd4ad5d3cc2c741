// src/handlers/debug.rs
use serde_json::json;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::services::store::QuakeStore;

/// Serve the raw HTML of the last fetch so upstream markup changes can be
/// inspected without shelling into the box.
pub async fn debug_html(store: Arc<QuakeStore>) -> Result<Response, Rejection> {
    match store.last_html().await {
        Some(html) => Ok(warp::reply::html(html).into_response()),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "error": "No HTML captured yet. Make a request to /api/earthquakes first."
            })),
            StatusCode::NOT_FOUND,
        )
        .into_response()),
    }
}
