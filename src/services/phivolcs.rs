// src/services/phivolcs.rs
//
// Everything this crate assumes about the bulletin page's markup lives here:
// the table class, the header phrases that identify the data table, and the
// fixed column order. The page is an external wire format; when PHIVOLCS
// changes its markup, this is the only module that should need touching.

use log::{debug, info};
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;

use crate::models::Earthquake;

/// Landing page of the PHIVOLCS earthquake bulletin.
pub const BASE_URL: &str = "https://earthquake.phivolcs.dost.gov.ph/";

/// The bulletin host rejects requests without a browser-like identity.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker class shared by candidate tables on the page.
const DATA_TABLE_SELECTOR: &str = "table.MsoNormalTable";

/// A candidate table is the data table when its text carries either of the
/// date column headers the page uses.
const HEADER_PHRASES: [&str; 2] = ["Date - Time", "Philippine Time"];

/// Column order of the data table: date-time, latitude, longitude, depth,
/// magnitude, location.
const COLUMN_COUNT: usize = 6;

/// Whether to verify the upstream TLS certificate. The bulletin host serves
/// a certificate that fails normal validation, so the working default is to
/// accept it; flip to `VerifyCertificates` to opt back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustPolicy {
    TrustAnyCertificate,
    VerifyCertificates,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
    pub trust_policy: TrustPolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: BASE_URL.to_string(),
            trust_policy: TrustPolicy::TrustAnyCertificate,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not find earthquake data table")]
    NoDataTable,
    #[error("no earthquake rows found in data table")]
    NoValidRows,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch bulletin page: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to extract earthquake data: {0}")]
    Extract(#[from] ExtractError),
}

/// HTTP transport for the bulletin page.
pub struct BulletinClient {
    client: Client,
    url: String,
}

impl BulletinClient {
    pub fn new(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .danger_accept_invalid_certs(config.trust_policy == TrustPolicy::TrustAnyCertificate)
            .build()?;

        Ok(BulletinClient {
            client,
            url: config.url.clone(),
        })
    }

    /// Download the bulletin page as text.
    pub async fn fetch_page(&self) -> Result<String, reqwest::Error> {
        info!("Fetching bulletin page from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await?;

        response.text().await
    }
}

/// Extract earthquake records from the bulletin page HTML.
///
/// Records come back in document order, which is the page's own newest-first
/// listing.
pub fn extract_earthquakes(html: &str) -> Result<Vec<Earthquake>, ExtractError> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse(DATA_TABLE_SELECTOR).unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let data_table = document
        .select(&table_selector)
        .find(|table| {
            let text = table.text().collect::<String>();
            HEADER_PHRASES.iter().any(|phrase| text.contains(phrase))
        })
        .ok_or(ExtractError::NoDataTable)?;

    let base = Url::parse(BASE_URL).unwrap();
    let mut earthquakes = Vec::new();

    for row in data_table.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        // Header and spacer rows never carry the full column set
        if cells.len() < COLUMN_COUNT {
            continue;
        }

        let anchor = cells[0].select(&anchor_selector).next();

        let mut date_time = anchor.map(|a| cell_text(&a)).unwrap_or_default();
        if date_time.is_empty() {
            date_time = cell_text(&cells[0]);
        }

        let detail_link = anchor
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_detail_link(&base, href));

        let latitude = cell_text(&cells[1]);
        let longitude = cell_text(&cells[2]);
        let depth = cell_text(&cells[3]);
        let magnitude = cell_text(&cells[4]);
        let location = cell_text(&cells[5]);

        if !is_data_row(&date_time, &magnitude) {
            debug!("Skipping non-data row: {:?}", date_time);
            continue;
        }

        earthquakes.push(Earthquake {
            date_time,
            detail_link,
            latitude,
            longitude,
            depth,
            magnitude,
            location,
        });
    }

    if earthquakes.is_empty() {
        return Err(ExtractError::NoValidRows);
    }

    Ok(earthquakes)
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Bulletin hrefs use Windows path separators; normalize before joining
/// against the site base. A path the base cannot absorb is passed through
/// as-is.
fn resolve_detail_link(base: &Url, href: &str) -> String {
    let normalized = href.replace('\\', "/").trim().to_string();
    match base.join(&normalized) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => normalized,
    }
}

/// A row counts as data when the date cell holds a plausible timestamp (and
/// not the column header) and the magnitude cell parses as a number.
fn is_data_row(date_time: &str, magnitude: &str) -> bool {
    !date_time.is_empty()
        && date_time.len() > 10
        && !date_time.to_lowercase().contains("date")
        && magnitude.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}
