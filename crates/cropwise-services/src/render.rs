//! Plain-text rendering of metrics, recommendations and the rainfall chart.

use std::fmt::Write;

use cropwise_engine::{Conditions, CropMatch, RainfallSeries};

const PLACEHOLDER: &str = "—";
const CHART_WIDTH: usize = 40;
const NO_MATCHES: &str = "No strong matches. Adjust pH or check forecast.";
const MISSING_INPUTS: &str = "Recommendations need temperature, rainfall and soil pH.";

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

pub fn render_metrics(conditions: &Conditions) -> String {
    format!(
        "Avg temp (°C):   {}\nTotal rain (mm): {}\nSoil pH:         {}\n",
        metric(conditions.avg_temp),
        metric(conditions.total_rain),
        metric(conditions.soil_ph),
    )
}

/// `None` means the inputs are incomplete, as opposed to nothing scoring well.
pub fn render_recommendations(matches: Option<&[CropMatch]>) -> String {
    let Some(matches) = matches else {
        return format!("{}\n", MISSING_INPUTS);
    };
    if matches.is_empty() {
        return format!("{}\n", NO_MATCHES);
    }

    let width = matches.iter().map(|m| m.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (rank, m) in matches.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {:<width$}  Match: {}%",
            rank + 1,
            m.name,
            m.percent(),
            width = width
        );
    }
    out
}

/// Horizontal bar chart, bars scaled against the wettest day.
pub fn render_rain_chart(series: &RainfallSeries) -> String {
    if series.is_empty() {
        return String::new();
    }

    let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let peak = series.data.iter().copied().fold(0.0_f64, f64::max);

    let mut out = String::from("Rain (mm)\n");
    for (label, value) in series.labels.iter().zip(&series.data) {
        let bar_len = if peak > 0.0 {
            ((value.max(0.0) / peak) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:>label_width$} │{} {:.1}",
            label,
            "█".repeat(bar_len),
            value,
            label_width = label_width
        );
    }
    out
}
