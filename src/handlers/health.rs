// src/handlers/health.rs
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::iso8601;
use crate::services::store::QuakeStore;

pub async fn index() -> Result<Json, Rejection> {
    Ok(warp::reply::json(&json!({
        "message": "PHIVOLCS Earthquake Data API",
        "endpoints": {
            "/api/earthquakes": "Get earthquake data (cached for 5 minutes)",
            "/api/earthquakes/refresh": "Force refresh earthquake data",
            "/api/debug/html": "View raw HTML from the bulletin page (for debugging)",
            "/health": "Health check"
        },
        "status": "ready"
    })))
}

pub async fn health(store: Arc<QuakeStore>) -> Result<Json, Rejection> {
    let view = store.health().await;

    let cache_status = if view.cache_populated { "populated" } else { "empty" };
    let last_fetch = match view.last_fetch {
        Some(ts) => iso8601(&ts),
        None => "never".to_string(),
    };

    Ok(warp::reply::json(&json!({
        "status": "ok",
        "uptime": store.uptime_secs(),
        "cacheStatus": cache_status,
        "lastFetch": last_fetch,
        "cachedCount": view.cached_count,
    })))
}
