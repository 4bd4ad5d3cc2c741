// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::debug::debug_html;
use crate::handlers::earthquakes::{get_earthquakes, refresh_earthquakes};
use crate::handlers::error::ApiError;
use crate::handlers::health::{health, index};
use crate::services::store::QuakeStore;

/// Static hint attached to every error envelope.
const ERROR_HINT: &str = "Check server logs and /api/debug/html for more details";

// Map rejections onto the JSON error envelope
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, body) = if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            serde_json::json!({
                "success": false,
                "error": "Not Found",
            }),
        )
    } else if let Some(api_error) = err.find::<ApiError>() {
        let mut body = serde_json::json!({
            "success": false,
            "error": api_error.message.clone(),
            "hint": ERROR_HINT,
        });
        if let Some(details) = &api_error.details {
            body["details"] = serde_json::Value::String(details.clone());
        }
        (StatusCode::INTERNAL_SERVER_ERROR, body)
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "success": false,
                "error": "Internal Server Error",
                "hint": ERROR_HINT,
            }),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

pub fn routes(
    store: Arc<QuakeStore>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let index_route = warp::path::end().and(warp::get()).and_then(index);

    let health_route = warp::path!("health")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(health);

    let earthquakes_route = warp::path!("api" / "earthquakes")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_earthquakes);

    let refresh_route = warp::path!("api" / "earthquakes" / "refresh")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(refresh_earthquakes);

    let debug_html_route = warp::path!("api" / "debug" / "html")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(debug_html);

    info!("All routes configured successfully.");

    index_route
        .or(health_route)
        .or(earthquakes_route)
        .or(refresh_route)
        .or(debug_html_route)
        .recover(handle_rejection)
}
