//! Weekly aggregation: reduce daily forecast records to the two scalar
//! weather inputs used for scoring.

use chrono::DateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of leading daily records considered for a week.
pub const FORECAST_WINDOW_DAYS: usize = 7;

/// Temperature fields of a daily record, any of which may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub day: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl TemperatureReading {
    pub fn day(day: f64) -> Self {
        Self {
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self {
            day: None,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Daytime temperature, else the min/max midpoint, else `None`.
    pub fn representative(&self) -> Option<f64> {
        match (self.day, self.min, self.max) {
            (Some(day), _, _) => Some(day),
            (None, Some(min), Some(max)) => Some((min + max) / 2.0),
            _ => None,
        }
    }
}

/// One day of forecast, normalized from whatever shape the provider returned.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Unix timestamp (seconds) of the day.
    pub timestamp: Option<i64>,
    /// Direct rain amount in mm.
    pub rain: Option<f64>,
    /// Precipitation from a nested daily summary, in mm.
    pub precipitation: Option<f64>,
    pub temp: TemperatureReading,
}

impl DailyRecord {
    /// Rain amount, else summary precipitation, else `None`.
    pub fn rainfall(&self) -> Option<f64> {
        self.rain.or(self.precipitation)
    }

    fn label(&self, index: usize) -> String {
        self.timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%-m/%-d/%Y").to_string())
            .unwrap_or_else(|| format!("Day {}", index + 1))
    }
}

/// Per-day rainfall with chart labels and the weekly sum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RainfallSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub total: f64,
}

impl RainfallSeries {
    /// Single-bar series used when rainfall was entered by hand.
    pub fn manual(total: f64) -> Self {
        Self {
            labels: vec!["Manual".to_string()],
            data: vec![total],
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn window(daily: Option<&[DailyRecord]>) -> &[DailyRecord] {
    let days = daily.unwrap_or_default();
    &days[..days.len().min(FORECAST_WINDOW_DAYS)]
}

/// Round the exact stored value half away from zero to `places` decimals.
///
/// Scaling by a power of ten first would round twice: 25.65 is stored as
/// 25.6499..., which must give 25.6, not 25.7.
pub fn round_to(value: f64, places: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Sum rainfall over the first week of records.
///
/// `None` stands for an absent or malformed `daily` field and yields an empty
/// series. Days without any rainfall figure count as 0 mm. The total is not
/// rounded; callers round it for display.
pub fn weekly_rainfall(daily: Option<&[DailyRecord]>) -> RainfallSeries {
    let days = window(daily);

    let labels = days
        .iter()
        .enumerate()
        .map(|(i, d)| d.label(i))
        .collect();
    let data: Vec<f64> = days.iter().map(|d| d.rainfall().unwrap_or(0.0)).collect();
    let total = data.iter().sum();

    RainfallSeries {
        labels,
        data,
        total,
    }
}

/// Mean representative temperature over the first week, rounded to 1 decimal.
///
/// A day with no usable temperature contributes 0 to the mean, which pulls the
/// average down. No days at all gives 0.
pub fn average_temperature(daily: Option<&[DailyRecord]>) -> f64 {
    let days = window(daily);
    if days.is_empty() {
        return 0.0;
    }

    let sum: f64 = days
        .iter()
        .map(|d| d.temp.representative().unwrap_or(0.0))
        .sum();

    round_to(sum / days.len() as f64, 1)
}
