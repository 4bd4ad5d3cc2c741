// src/models.rs
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One row of the PHIVOLCS bulletin table. Every value is kept as the free
/// text published on the page; magnitude is only checked to parse as a
/// number, never converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    pub date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_link: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub depth: String,
    pub magnitude: String,
    pub location: String,
}

/// The most recent successful extraction and when it happened.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub earthquakes: Vec<Earthquake>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakesResponse {
    pub success: bool,
    pub data: Vec<Earthquake>,
    pub cached: bool,
    pub last_updated: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub data: Vec<Earthquake>,
    pub last_updated: String,
    pub count: usize,
    pub message: String,
}

/// Millisecond-precision UTC timestamp with a `Z` suffix, the shape clients
/// of this API consume.
pub fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
