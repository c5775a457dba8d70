//! Advisory pipeline: place name in, scoring inputs and rainfall chart out.
//!
//! Sources are queried one after another. A failed geocode ends the run; a
//! failed forecast or soil lookup only blanks its own values so the user can
//! fill them in by hand.

use cropwise_core::{Config, LastQueryStore};
use cropwise_engine::{
    average_temperature, round_to, weekly_rainfall, Conditions, CropMatch, RainfallSeries,
};
use cropwise_weather::{ForecastClient, Geocoder, HttpClient, Place, SoilClient, WeatherError};
use serde::Serialize;
use tracing::instrument;

pub const WEATHER_FALLBACK_MESSAGE: &str = "Weather unavailable. Enter temp and rainfall manually.";
pub const SOIL_FALLBACK_MESSAGE: &str = "Soil pH unavailable. Enter manually.";

/// Values typed in by the user, applied on top of fetched data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualOverrides {
    pub avg_temp: Option<f64>,
    pub total_rain: Option<f64>,
    pub soil_ph: Option<f64>,
    /// Drop fetched temperature and rainfall before applying overrides
    pub clear_weather: bool,
    /// Drop fetched soil pH before applying overrides
    pub clear_soil_ph: bool,
}

impl ManualOverrides {
    /// New conditions and chart with the overrides applied.
    ///
    /// A manual rainfall replaces the chart with a single bar; clearing the
    /// weather empties it.
    pub fn apply(&self, conditions: Conditions, rainfall: RainfallSeries) -> (Conditions, RainfallSeries) {
        let (mut conditions, mut rainfall) = (conditions, rainfall);

        if self.clear_weather {
            conditions = conditions.without_weather();
            rainfall = RainfallSeries::default();
        }
        if self.avg_temp.is_some() || self.total_rain.is_some() {
            conditions = conditions.with_manual_weather(self.avg_temp, self.total_rain);
        }
        if let Some(rain) = self.total_rain {
            rainfall = RainfallSeries::manual(round_to(rain, 1));
        }

        if self.clear_soil_ph {
            conditions = conditions.without_soil_ph();
        }
        if let Some(ph) = self.soil_ph {
            conditions = conditions.with_soil_ph(ph);
        }

        (conditions, rainfall)
    }
}

/// Outcome of one advisory run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub place: Place,
    pub conditions: Conditions,
    pub rainfall: RainfallSeries,
    pub weather_issue: Option<String>,
    pub soil_issue: Option<String>,
}

impl Advice {
    pub fn recommendations(&self) -> Option<Vec<CropMatch>> {
        self.conditions.recommendations()
    }

    pub fn with_overrides(self, overrides: &ManualOverrides) -> Self {
        let (conditions, rainfall) = overrides.apply(self.conditions, self.rainfall);
        Self {
            conditions,
            rainfall,
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct Advisor {
    geocoder: Geocoder,
    forecast: ForecastClient,
    soil: SoilClient,
    last_query: LastQueryStore,
}

impl Advisor {
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let http = HttpClient::new(&config.http)?;
        Ok(Self {
            geocoder: Geocoder::new(http.clone(), config),
            forecast: ForecastClient::new(http.clone(), config),
            soil: SoilClient::new(http, config),
            last_query: LastQueryStore::new(&config.storage.data_dir),
        })
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }

    pub fn last_query(&self) -> &LastQueryStore {
        &self.last_query
    }

    /// Geocode `query`, then fetch forecast and soil pH for the place.
    ///
    /// The query is remembered whether or not the run succeeds.
    #[instrument(skip(self), level = "info")]
    pub async fn advise(&self, query: &str) -> Result<Advice, WeatherError> {
        let result = self.run(query).await;
        self.remember(query);
        result
    }

    async fn run(&self, query: &str) -> Result<Advice, WeatherError> {
        let place = self.geocoder.geocode(query).await?;

        let (conditions, rainfall, weather_issue) = match self.forecast.fetch_daily(&place).await {
            Ok(daily) => {
                let rainfall = weekly_rainfall(daily.as_deref());
                let avg_temp = average_temperature(daily.as_deref());
                (Conditions::from_forecast(&rainfall, avg_temp), rainfall, None)
            }
            Err(e) => {
                tracing::warn!("Forecast lookup failed for {}: {}", place.name, e);
                (
                    Conditions::default(),
                    RainfallSeries::default(),
                    Some(WEATHER_FALLBACK_MESSAGE.to_string()),
                )
            }
        };

        let (conditions, soil_issue) = match self.soil.fetch_ph(&place).await {
            Ok(ph) => (conditions.with_soil_ph(ph), None),
            Err(e) => {
                tracing::warn!("Soil pH lookup failed for {}: {}", place.name, e);
                (conditions.without_soil_ph(), Some(SOIL_FALLBACK_MESSAGE.to_string()))
            }
        };

        Ok(Advice {
            place,
            conditions,
            rainfall,
            weather_issue,
            soil_issue,
        })
    }

    fn remember(&self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        if let Err(e) = self.last_query.save(query) {
            tracing::warn!("Could not save last query: {}", e);
        }
    }
}
