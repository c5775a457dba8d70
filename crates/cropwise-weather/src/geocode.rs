//! Forward geocoding and place autosuggest.
//!
//! With an OpenWeather key the direct geocoding API is tried first; Open-Meteo
//! (no key required) is the fallback and also serves suggestions.

use cropwise_core::{Config, SuggestConfig};
use serde::Deserialize;
use tracing::instrument;

use crate::client::{endpoint, HttpClient};
use crate::types::{Place, Suggestion, WeatherError};

#[derive(Debug, Deserialize)]
struct DirectHit {
    name: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

impl SearchHit {
    fn into_place(self) -> Place {
        let name = match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name,
        };
        Place {
            name,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    http: HttpClient,
    api_key: Option<String>,
    openweather_url: String,
    open_meteo_url: String,
    suggest: SuggestConfig,
}

impl Geocoder {
    pub fn new(http: HttpClient, config: &Config) -> Self {
        Self {
            http,
            api_key: config.api.resolved_api_key(),
            openweather_url: config.api.openweather_url.clone(),
            open_meteo_url: config.api.open_meteo_geocoding_url.clone(),
            suggest: config.suggest.clone(),
        }
    }

    /// Resolve a free-text place name to coordinates.
    #[instrument(skip(self), level = "info")]
    pub async fn geocode(&self, query: &str) -> Result<Place, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        if let Some(key) = &self.api_key {
            match self.openweather_direct(query, key).await {
                Ok(Some(place)) => {
                    tracing::info!("Geocoded {:?} via OpenWeather: {}", query, place.name);
                    return Ok(place);
                }
                Ok(None) => tracing::debug!("OpenWeather found no match for {:?}", query),
                Err(e) => tracing::warn!("OpenWeather geocoding failed, falling back: {}", e),
            }
        }

        let place = self
            .open_meteo_search(query, 1)
            .await?
            .into_iter()
            .next()
            .map(SearchHit::into_place)
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))?;

        tracing::info!("Geocoded {:?} via Open-Meteo: {}", query, place.name);
        Ok(place)
    }

    /// Candidate places for a partially typed name.
    ///
    /// Short queries return nothing without a request. Lookup failures are
    /// logged and yield an empty list.
    #[instrument(skip(self), level = "debug")]
    pub async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let query = query.trim();
        if query.chars().count() < self.suggest.min_query_len || self.suggest.max_results == 0 {
            return Vec::new();
        }

        match self.open_meteo_search(query, self.suggest.max_results).await {
            Ok(hits) => hits
                .into_iter()
                .map(|h| Suggestion {
                    name: h.name,
                    country: h.country,
                })
                .collect(),
            Err(e) => {
                tracing::debug!("Suggestion lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn openweather_direct(&self, query: &str, key: &str) -> Result<Option<Place>, WeatherError> {
        let url = endpoint(&self.openweather_url, "geo/1.0/direct");
        let body = self
            .http
            .get_json(
                &url,
                &[
                    ("q", query.to_string()),
                    ("limit", "1".to_string()),
                    ("appid", key.to_string()),
                ],
            )
            .await?;

        let hits: Vec<DirectHit> =
            serde_json::from_value(body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(hits.into_iter().next().map(|h| Place {
            name: h.name,
            latitude: h.lat,
            longitude: h.lon,
        }))
    }

    async fn open_meteo_search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>, WeatherError> {
        let url = endpoint(&self.open_meteo_url, "v1/search");
        let body = self
            .http
            .get_json(
                &url,
                &[
                    ("name", query.to_string()),
                    ("count", count.to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
        Ok(response.results.unwrap_or_default())
    }
}
