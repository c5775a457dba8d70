use cropwise_core::{NetworkError, ReqwestErrorExt};
use serde::{Deserialize, Serialize};

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Autosuggest candidate for a partially typed place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub country: Option<String>,
}

impl Suggestion {
    /// "Name, Country", or just the name when the country is unknown
    pub fn label(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Weather, geocoding and soil lookup errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Location is required")]
    EmptyQuery,
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Soil pH not available")]
    SoilPhUnavailable,
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Network(e.into_network_error())
    }
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(e) => e.user_message(),
            WeatherError::Api { status: 401, .. } => "API key rejected. Check your settings.",
            WeatherError::Api { status, .. } if *status >= 500 => {
                "The data service is unavailable. Please try again later."
            }
            WeatherError::Api { .. } => "The data service rejected the request.",
            WeatherError::EmptyQuery => "Enter a location to look up.",
            WeatherError::LocationNotFound(_) => "Location not found. Check and try again.",
            WeatherError::SoilPhUnavailable => "No soil pH data for this location.",
            WeatherError::Parse(_) => "Received an unexpected response. Please try again.",
        }
    }
}
