//! Daily forecasts, normalized into [`DailyRecord`]s.
//!
//! OpenWeather One Call 3.0 when a key is available, otherwise the Open-Meteo
//! daily forecast.

use chrono::NaiveDate;
use cropwise_core::Config;
use cropwise_engine::{DailyRecord, TemperatureReading, FORECAST_WINDOW_DAYS};
use serde_json::Value;
use tracing::instrument;

use crate::client::{endpoint, HttpClient};
use crate::types::{Place, WeatherError};

const OPEN_METEO_DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn decode_day(day: &Value) -> DailyRecord {
    DailyRecord {
        timestamp: day.get("dt").and_then(Value::as_i64),
        rain: number(day.get("rain")),
        precipitation: number(day.pointer("/summary/precipitation")),
        temp: TemperatureReading {
            day: number(day.pointer("/temp/day")),
            min: number(day.pointer("/temp/min")),
            max: number(day.pointer("/temp/max")),
        },
    }
}

/// Decode a One Call style `daily` field.
///
/// `None` when the field is absent or not an array. Within each day only JSON
/// numbers are taken; anything else leaves that field unset.
pub fn decode_daily(daily: Option<&Value>) -> Option<Vec<DailyRecord>> {
    let days = daily?.as_array()?;
    Some(days.iter().map(decode_day).collect())
}

/// Decode an Open-Meteo `daily` block of parallel arrays.
fn decode_open_meteo(daily: Option<&Value>) -> Option<Vec<DailyRecord>> {
    let daily = daily?;
    let times = daily.get("time")?.as_array()?;
    let column = |name: &str, i: usize| number(daily.get(name).and_then(|c| c.get(i)));

    let records = times
        .iter()
        .enumerate()
        .map(|(i, time)| {
            let timestamp = time
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp());

            DailyRecord {
                timestamp,
                rain: column("precipitation_sum", i),
                precipitation: None,
                temp: TemperatureReading {
                    day: None,
                    min: column("temperature_2m_min", i),
                    max: column("temperature_2m_max", i),
                },
            }
        })
        .collect();

    Some(records)
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: HttpClient,
    api_key: Option<String>,
    openweather_url: String,
    open_meteo_url: String,
}

impl ForecastClient {
    pub fn new(http: HttpClient, config: &Config) -> Self {
        Self {
            http,
            api_key: config.api.resolved_api_key(),
            openweather_url: config.api.openweather_url.clone(),
            open_meteo_url: config.api.open_meteo_forecast_url.clone(),
        }
    }

    /// Daily records for `place`, or `None` when the payload had no usable
    /// `daily` array.
    #[instrument(skip(self, place), fields(place = %place.name), level = "info")]
    pub async fn fetch_daily(&self, place: &Place) -> Result<Option<Vec<DailyRecord>>, WeatherError> {
        let daily = match &self.api_key {
            Some(key) => self.fetch_onecall(place, key).await?,
            None => self.fetch_open_meteo(place).await?,
        };

        match &daily {
            Some(days) => tracing::info!("Fetched {} forecast days", days.len()),
            None => tracing::warn!("Forecast payload had no daily data"),
        }
        Ok(daily)
    }

    async fn fetch_onecall(&self, place: &Place, key: &str) -> Result<Option<Vec<DailyRecord>>, WeatherError> {
        let url = endpoint(&self.openweather_url, "data/3.0/onecall");
        let body = self
            .http
            .get_json(
                &url,
                &[
                    ("lat", place.latitude.to_string()),
                    ("lon", place.longitude.to_string()),
                    ("exclude", "current,minutely,hourly,alerts".to_string()),
                    ("units", "metric".to_string()),
                    ("appid", key.to_string()),
                ],
            )
            .await?;

        Ok(decode_daily(body.get("daily")))
    }

    async fn fetch_open_meteo(&self, place: &Place) -> Result<Option<Vec<DailyRecord>>, WeatherError> {
        let url = endpoint(&self.open_meteo_url, "v1/forecast");
        let body = self
            .http
            .get_json(
                &url,
                &[
                    ("latitude", place.latitude.to_string()),
                    ("longitude", place.longitude.to_string()),
                    ("daily", OPEN_METEO_DAILY_FIELDS.to_string()),
                    ("timezone", "UTC".to_string()),
                    ("forecast_days", FORECAST_WINDOW_DAYS.to_string()),
                ],
            )
            .await?;

        Ok(decode_open_meteo(body.get("daily")))
    }
}
