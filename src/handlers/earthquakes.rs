// src/handlers/earthquakes.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{iso8601, EarthquakesResponse, RefreshResponse};
use crate::services::store::QuakeStore;

pub async fn get_earthquakes(store: Arc<QuakeStore>) -> Result<Json, Rejection> {
    info!("Handling request for earthquake data");

    match store.get_data(false).await {
        Ok(view) => {
            let count = view.earthquakes.len();
            Ok(warp::reply::json(&EarthquakesResponse {
                success: true,
                data: view.earthquakes,
                cached: view.cached,
                last_updated: iso8601(&view.as_of),
                count,
            }))
        }
        Err(e) => {
            error!("Failed to get earthquake data: {}", e);
            Err(warp::reject::custom(
                ApiError::new(e.to_string())
                    .with_details("Failed to fetch earthquake data from PHIVOLCS"),
            ))
        }
    }
}

pub async fn refresh_earthquakes(store: Arc<QuakeStore>) -> Result<Json, Rejection> {
    info!("Force refresh requested");

    match store.get_data(true).await {
        Ok(view) => {
            let count = view.earthquakes.len();
            Ok(warp::reply::json(&RefreshResponse {
                success: true,
                data: view.earthquakes,
                last_updated: iso8601(&view.as_of),
                count,
                message: "Cache refreshed successfully".to_string(),
            }))
        }
        Err(e) => {
            error!("Forced refresh failed: {}", e);
            Err(warp::reject::custom(ApiError::new(e.to_string())))
        }
    }
}
