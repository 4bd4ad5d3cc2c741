pub mod debug;
pub mod earthquakes;
pub mod error;
pub mod health;
