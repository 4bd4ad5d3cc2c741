// src/services/store.rs
use chrono::{DateTime, Duration, Utc};
use log::info;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

use super::phivolcs::{extract_earthquakes, BulletinClient, FetchError, SourceConfig};
use crate::models::{Earthquake, Snapshot};

/// How long a snapshot stays fresh.
const CACHE_DURATION_SECS: i64 = 5 * 60;

/// A cache-gate answer: the records, whether they came from the snapshot,
/// and the fetch time they reflect.
#[derive(Debug)]
pub struct DataView {
    pub earthquakes: Vec<Earthquake>,
    pub cached: bool,
    pub as_of: DateTime<Utc>,
}

/// Store summary for the health route.
#[derive(Debug)]
pub struct HealthView {
    pub cache_populated: bool,
    pub last_fetch: Option<DateTime<Utc>>,
    pub cached_count: usize,
}

/// Owns the bulletin snapshot and everything needed to refresh it. Shared
/// across handlers behind an `Arc`.
pub struct QuakeStore {
    client: BulletinClient,
    started_at: Instant,
    snapshot: RwLock<Option<Snapshot>>,
    last_html: RwLock<Option<String>>,
    // Serializes refreshes so simultaneous cache misses hit upstream once
    refresh_gate: Mutex<()>,
}

impl QuakeStore {
    pub fn new(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        Ok(QuakeStore {
            client: BulletinClient::new(config)?,
            started_at: Instant::now(),
            snapshot: RwLock::new(None),
            last_html: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        })
    }

    /// Cache gate: serve the snapshot while it is younger than the cache
    /// window, otherwise fetch and re-extract. A failed refresh surfaces the
    /// error and leaves any previous snapshot in place.
    pub async fn get_data(&self, force_refresh: bool) -> Result<DataView, FetchError> {
        if !force_refresh {
            if let Some(view) = self.fresh_view().await {
                info!("Serving {} earthquakes from cache", view.earthquakes.len());
                return Ok(view);
            }
        }

        let _gate = self.refresh_gate.lock().await;

        // Another request may have refreshed while we waited on the gate
        if !force_refresh {
            if let Some(view) = self.fresh_view().await {
                return Ok(view);
            }
        }

        let html = self.client.fetch_page().await?;
        *self.last_html.write().await = Some(html.clone());

        let earthquakes = extract_earthquakes(&html)?;
        let fetched_at = Utc::now();
        info!("Extracted {} earthquakes from bulletin page", earthquakes.len());

        *self.snapshot.write().await = Some(Snapshot {
            earthquakes: earthquakes.clone(),
            fetched_at,
        });

        Ok(DataView {
            earthquakes,
            cached: false,
            as_of: fetched_at,
        })
    }

    async fn fresh_view(&self) -> Option<DataView> {
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;

        let age = Utc::now().signed_duration_since(snapshot.fetched_at);
        if age < Duration::seconds(CACHE_DURATION_SECS) {
            Some(DataView {
                earthquakes: snapshot.earthquakes.clone(),
                cached: true,
                as_of: snapshot.fetched_at,
            })
        } else {
            None
        }
    }

    /// Raw HTML of the most recent fetch that reached the parsing stage.
    pub async fn last_html(&self) -> Option<String> {
        self.last_html.read().await.clone()
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub async fn health(&self) -> HealthView {
        let guard = self.snapshot.read().await;
        match guard.as_ref() {
            Some(snapshot) => HealthView {
                cache_populated: true,
                last_fetch: Some(snapshot.fetched_at),
                cached_count: snapshot.earthquakes.len(),
            },
            None => HealthView {
                cache_populated: false,
                last_fetch: None,
                cached_count: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::phivolcs::TrustPolicy;

    // Loopback port 9 is never listening here, so any code path that
    // reaches the network fails fast with a transport error.
    fn unreachable_store() -> QuakeStore {
        let config = SourceConfig {
            url: "http://127.0.0.1:9/".to_string(),
            trust_policy: TrustPolicy::VerifyCertificates,
        };
        QuakeStore::new(&config).unwrap()
    }

    fn sample_quakes() -> Vec<Earthquake> {
        vec![Earthquake {
            date_time: "05 April 2024 - 08:12 AM".to_string(),
            detail_link: None,
            latitude: "12.34".to_string(),
            longitude: "123.45".to_string(),
            depth: "010".to_string(),
            magnitude: "4.5".to_string(),
            location: "Somewhere (Province)".to_string(),
        }]
    }

    async fn seed(store: &QuakeStore, age_minutes: i64) -> DateTime<Utc> {
        let fetched_at = Utc::now() - Duration::minutes(age_minutes);
        *store.snapshot.write().await = Some(Snapshot {
            earthquakes: sample_quakes(),
            fetched_at,
        });
        fetched_at
    }

    #[tokio::test]
    async fn fresh_snapshot_is_served_without_fetching() {
        let store = unreachable_store();
        let fetched_at = seed(&store, 4).await;

        let view = store
            .get_data(false)
            .await
            .expect("cache hit must not reach the network");

        assert!(view.cached);
        assert_eq!(view.as_of, fetched_at);
        assert_eq!(view.earthquakes, sample_quakes());
    }

    #[tokio::test]
    async fn stale_snapshot_triggers_fetch() {
        let store = unreachable_store();
        seed(&store, 6).await;

        let err = store
            .get_data(false)
            .await
            .expect_err("stale cache must refetch");

        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn failed_refresh_leaves_snapshot_untouched() {
        let store = unreachable_store();
        let fetched_at = seed(&store, 6).await;

        store.get_data(false).await.expect_err("fetch must fail");

        let guard = store.snapshot.read().await;
        let snapshot = guard
            .as_ref()
            .expect("snapshot must survive a failed refresh");
        assert_eq!(snapshot.fetched_at, fetched_at);
        assert_eq!(snapshot.earthquakes, sample_quakes());
    }

    #[tokio::test]
    async fn forced_refresh_always_fetches() {
        let store = unreachable_store();
        seed(&store, 1).await;

        let err = store
            .get_data(true)
            .await
            .expect_err("forced refresh must bypass a fresh cache");

        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn error_propagates_when_nothing_cached() {
        let store = unreachable_store();

        let err = store
            .get_data(false)
            .await
            .expect_err("no snapshot to fall back on");

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(store.last_html().await.is_none());

        let health = store.health().await;
        assert!(!health.cache_populated);
        assert_eq!(health.last_fetch, None);
        assert_eq!(health.cached_count, 0);
    }
}
