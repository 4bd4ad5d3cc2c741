use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use phivolcs_quake_api::routes::routes;
use phivolcs_quake_api::services::phivolcs::{SourceConfig, TrustPolicy};
use phivolcs_quake_api::services::store::QuakeStore;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3001");
        "3001".to_string()
    });
    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let mut config = SourceConfig::default();
    if let Ok(url) = env::var("PHIVOLCS_URL") {
        config.url = url;
    }
    if env::var("PHIVOLCS_VERIFY_TLS").map(|v| v == "1").unwrap_or(false) {
        config.trust_policy = TrustPolicy::VerifyCertificates;
    }
    info!("Upstream bulletin: {} ({:?})", config.url, config.trust_policy);

    let store = Arc::new(QuakeStore::new(&config).expect("failed to build bulletin client"));

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes(store).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
