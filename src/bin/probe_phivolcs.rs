// src/bin/probe_phivolcs.rs
//
// Fetches the live bulletin page and prints what the extractor makes of it.
// Useful when the upstream markup drifts and /api/earthquakes starts
// returning extraction errors.
use std::env;

use phivolcs_quake_api::services::phivolcs::{
    extract_earthquakes, BulletinClient, SourceConfig, TrustPolicy,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    let mut config = SourceConfig::default();
    if let Ok(url) = env::var("PHIVOLCS_URL") {
        config.url = url;
    }
    if env::var("PHIVOLCS_VERIFY_TLS").map(|v| v == "1").unwrap_or(false) {
        config.trust_policy = TrustPolicy::VerifyCertificates;
    }

    let client = BulletinClient::new(&config)?;
    let html = client.fetch_page().await?;
    println!("Fetched {} bytes of HTML", html.len());

    let earthquakes = extract_earthquakes(&html)?;
    println!("Extracted {} earthquakes", earthquakes.len());

    if let Some(first) = earthquakes.first() {
        println!("Newest: {:#?}", first);
    }
    if let Some(last) = earthquakes.last() {
        println!("Oldest: {:#?}", last);
    }

    Ok(())
}
