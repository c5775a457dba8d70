//! Topsoil pH from ISRIC SoilGrids.

use cropwise_core::Config;
use serde_json::Value;
use tracing::instrument;

use crate::client::{endpoint, HttpClient};
use crate::types::{Place, WeatherError};

const PH_PROPERTY: &str = "phh2o";

/// Pull a pH value out of a soil response.
///
/// A bare `{"ph": n}` body is taken as is. Otherwise the first depth mean of
/// the `phh2o` layer is used, scaled by the layer's `d_factor` (SoilGrids
/// stores pH x10).
pub fn extract_ph(body: &Value) -> Option<f64> {
    if let Some(ph) = body.get("ph").and_then(Value::as_f64) {
        return Some(ph);
    }

    let layer = body
        .pointer("/properties/layers")?
        .as_array()?
        .iter()
        .find(|l| l.get("name").and_then(Value::as_str) == Some(PH_PROPERTY))?;

    let mean = layer.pointer("/depths/0/values/mean")?.as_f64()?;
    let d_factor = layer
        .pointer("/unit_measure/d_factor")
        .and_then(Value::as_f64)
        .filter(|f| *f > 0.0)
        .unwrap_or(1.0);

    Some(mean / d_factor)
}

#[derive(Debug, Clone)]
pub struct SoilClient {
    http: HttpClient,
    soilgrids_url: String,
}

impl SoilClient {
    pub fn new(http: HttpClient, config: &Config) -> Self {
        Self {
            http,
            soilgrids_url: config.api.soilgrids_url.clone(),
        }
    }

    /// Mean pH of the top 0-5 cm at `place`.
    #[instrument(skip(self, place), fields(place = %place.name), level = "info")]
    pub async fn fetch_ph(&self, place: &Place) -> Result<f64, WeatherError> {
        let url = endpoint(&self.soilgrids_url, "soilgrids/v2.0/properties/query");
        let body = self
            .http
            .get_json(
                &url,
                &[
                    ("lat", place.latitude.to_string()),
                    ("lon", place.longitude.to_string()),
                    ("property", PH_PROPERTY.to_string()),
                    ("depth", "0-5cm".to_string()),
                    ("value", "mean".to_string()),
                ],
            )
            .await?;

        let ph = extract_ph(&body).ok_or(WeatherError::SoilPhUnavailable)?;
        tracing::info!("Soil pH: {}", ph);
        Ok(ph)
    }
}
