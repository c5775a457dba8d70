//! Immutable snapshot of the three scoring inputs.
//!
//! Every change (new forecast, soil lookup, manual entry, clearing a value)
//! produces a new `Conditions`; recommendations are recomputed from the
//! snapshot rather than kept in sync with it.

use serde::Serialize;

use crate::aggregate::{round_to, RainfallSeries};
use crate::scoring::{recommend_crops, CropMatch};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Conditions {
    /// Mean temperature over the week, °C
    pub avg_temp: Option<f64>,
    /// Rainfall over the week, mm
    pub total_rain: Option<f64>,
    pub soil_ph: Option<f64>,
}

impl Conditions {
    pub fn new(avg_temp: Option<f64>, total_rain: Option<f64>, soil_ph: Option<f64>) -> Self {
        Self {
            avg_temp,
            total_rain,
            soil_ph,
        }
    }

    /// Weather values derived from a fetched forecast.
    pub fn from_forecast(rainfall: &RainfallSeries, avg_temp: f64) -> Self {
        Self {
            avg_temp: Some(avg_temp),
            total_rain: Some(round_to(rainfall.total, 1)),
            soil_ph: None,
        }
    }

    pub fn with_soil_ph(self, ph: f64) -> Self {
        Self {
            soil_ph: Some(round_to(ph, 2)),
            ..self
        }
    }

    /// Replace whichever weather values were supplied; `None` keeps the current one.
    pub fn with_manual_weather(self, avg_temp: Option<f64>, total_rain: Option<f64>) -> Self {
        Self {
            avg_temp: avg_temp.map(|t| round_to(t, 1)).or(self.avg_temp),
            total_rain: total_rain.map(|r| round_to(r, 1)).or(self.total_rain),
            ..self
        }
    }

    pub fn without_weather(self) -> Self {
        Self {
            avg_temp: None,
            total_rain: None,
            ..self
        }
    }

    pub fn without_soil_ph(self) -> Self {
        Self {
            soil_ph: None,
            ..self
        }
    }

    /// Ranked crops, or `None` while any input is still missing.
    pub fn recommendations(&self) -> Option<Vec<CropMatch>> {
        match (self.avg_temp, self.total_rain, self.soil_ph) {
            (Some(t), Some(r), Some(p)) => Some(recommend_crops(t, r, p)),
            _ => None,
        }
    }
}

/// Parse the leading number of user-entered text.
///
/// Accepts trailing junk after the number ("6.5 pH" -> 6.5). Text without a
/// leading number, or one too large for `f64`, gives `None`.
pub fn parse_manual(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let candidate: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .collect();

    // Longest parseable prefix wins; an overflowing one is not cut shorter.
    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
