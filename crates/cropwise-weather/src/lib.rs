//! Weather and soil data for Cropwise
//!
//! Forward geocoding and place suggestions (OpenWeather or Open-Meteo), daily
//! forecasts (OpenWeather One Call or Open-Meteo) and topsoil pH (SoilGrids).
//! External JSON is decoded defensively into the engine's normalized records.

pub mod client;
pub mod forecast;
pub mod geocode;
pub mod retry;
pub mod soil;
pub mod types;

pub use client::HttpClient;
pub use forecast::{decode_daily, ForecastClient};
pub use geocode::Geocoder;
pub use retry::RetryConfig;
pub use soil::{extract_ph, SoilClient};
pub use types::*;
