// src/lib.rs

// Top-level modules of the bulletin API
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
