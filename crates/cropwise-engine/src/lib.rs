//! Recommendation engine for Cropwise
//!
//! Reduces a week of daily forecast records into mean temperature and total
//! rainfall, then scores a fixed crop catalog against those values plus soil pH.
//! Everything here is pure: no I/O, no shared state.

pub mod aggregate;
pub mod catalog;
pub mod conditions;
pub mod scoring;

pub use aggregate::{
    average_temperature, round_to, weekly_rainfall, DailyRecord, RainfallSeries,
    TemperatureReading, FORECAST_WINDOW_DAYS,
};
pub use catalog::{CropProfile, Range, CATALOG};
pub use conditions::{parse_manual, Conditions};
pub use scoring::{
    recommend_crops, recommend_with, score_range, CropMatch, MIN_MATCH_SCORE,
};
