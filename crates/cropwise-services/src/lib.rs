//! Advisory pipeline and terminal rendering for Cropwise.

pub mod advisor;
pub mod render;

pub use advisor::{Advice, Advisor, ManualOverrides, SOIL_FALLBACK_MESSAGE, WEATHER_FALLBACK_MESSAGE};
pub use render::{render_metrics, render_rain_chart, render_recommendations};
