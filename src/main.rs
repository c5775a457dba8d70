//! Cropwise: crop suggestions from a week of forecast and the local soil pH.
//!
//! ```text
//! cropwise advise "Pune, India" [--temp 24] [--rain 80] [--ph 6.5]
//! cropwise score --temp 30 --rain 15 --ph 5.2
//! cropwise suggest Pun
//! cropwise last
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use cropwise_core::Config;
use cropwise_engine::{parse_manual, Conditions, RainfallSeries};
use cropwise_services::{
    render_metrics, render_rain_chart, render_recommendations, Advice, Advisor, ManualOverrides,
};

#[derive(Parser)]
#[command(name = "cropwise", about = "Rank crops for a place from its weekly forecast and soil pH")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct OverrideArgs {
    /// Average temperature for the week, °C
    #[arg(long, value_parser = manual_number, allow_negative_numbers = true)]
    temp: Option<f64>,
    /// Total rainfall for the week, mm
    #[arg(long, value_parser = manual_number, allow_negative_numbers = true)]
    rain: Option<f64>,
    /// Soil pH
    #[arg(long, value_parser = manual_number, allow_negative_numbers = true)]
    ph: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch forecast and soil data for a place and rank crops
    Advise {
        /// Place name; defaults to the last location queried
        location: Option<String>,
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Ignore fetched temperature and rainfall
        #[arg(long)]
        clear_weather: bool,
        /// Ignore fetched soil pH
        #[arg(long)]
        clear_ph: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank crops from values entered by hand
    Score {
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest place names for a partial query
    Suggest {
        query: String,
    },
    /// Show the last location queried
    Last,
}

fn manual_number(s: &str) -> Result<f64, String> {
    parse_manual(s).ok_or_else(|| format!("'{}' is not a number", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cropwise_core::init(cli.verbose)?;

    let (config, _) = match &cli.config {
        Some(path) => Config::load_validated_from(path)?,
        None => Config::load_validated()?,
    };

    match cli.command {
        Commands::Advise {
            location,
            overrides,
            clear_weather,
            clear_ph,
            json,
        } => {
            let overrides = ManualOverrides {
                avg_temp: overrides.temp,
                total_rain: overrides.rain,
                soil_ph: overrides.ph,
                clear_weather,
                clear_soil_ph: clear_ph,
            };
            advise(&config, location, overrides, json).await?;
        }
        Commands::Score { overrides, json } => {
            let overrides = ManualOverrides {
                avg_temp: overrides.temp,
                total_rain: overrides.rain,
                soil_ph: overrides.ph,
                ..ManualOverrides::default()
            };
            let (conditions, rainfall) = overrides.apply(Conditions::default(), RainfallSeries::default());
            if json {
                let report = serde_json::json!({
                    "conditions": conditions,
                    "recommendations": conditions.recommendations(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_metrics(&conditions));
                println!();
                print!("{}", render_rain_chart(&rainfall));
                print!("{}", render_recommendations(conditions.recommendations().as_deref()));
            }
        }
        Commands::Suggest { query } => {
            let advisor = Advisor::from_config(&config)?;
            let suggestions = advisor.geocoder().suggest(&query).await;
            if suggestions.is_empty() {
                println!("No suggestions.");
            }
            for s in suggestions {
                println!("{}", s.label());
            }
        }
        Commands::Last => {
            let advisor = Advisor::from_config(&config)?;
            match advisor.last_query().load() {
                Some(query) => println!("{}", query),
                None => println!("No location queried yet."),
            }
        }
    }

    Ok(())
}

async fn advise(config: &Config, location: Option<String>, overrides: ManualOverrides, json: bool) -> Result<()> {
    let advisor = Advisor::from_config(config)?;

    let query = match location {
        Some(q) => q,
        None => advisor
            .last_query()
            .load()
            .context("No location given and no previous location saved")?,
    };

    eprintln!("Fetching data for {}…", query.trim());
    let advice = match advisor.advise(&query).await {
        Ok(advice) => advice,
        Err(e) => {
            tracing::error!("Advice for {:?} failed: {}", query, e);
            anyhow::bail!("Error: {}", e.user_message());
        }
    };
    let advice = advice.with_overrides(&overrides);

    if json {
        let recommendations = advice.recommendations();
        let report = serde_json::json!({
            "advice": advice,
            "recommendations": recommendations,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_advice(&advice, &overrides);
    }
    Ok(())
}

fn print_advice(advice: &Advice, overrides: &ManualOverrides) {
    println!("{}", advice.place.name);
    println!();

    let weather_entered = overrides.avg_temp.is_some() && overrides.total_rain.is_some();
    if let Some(issue) = advice.weather_issue.as_deref().filter(|_| !weather_entered) {
        eprintln!("{} (use --temp and --rain)", issue);
    }
    if let Some(issue) = advice.soil_issue.as_deref().filter(|_| overrides.soil_ph.is_none()) {
        eprintln!("{} (use --ph)", issue);
    }

    print!("{}", render_metrics(&advice.conditions));
    println!();

    let chart = render_rain_chart(&advice.rainfall);
    if !chart.is_empty() {
        println!("{}", chart);
    }

    print!("{}", render_recommendations(advice.recommendations().as_deref()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_accepts_negative_values() {
        let cli = Cli::try_parse_from(["cropwise", "score", "--temp", "-5", "--rain", "10", "--ph", "6"]).unwrap();
        match cli.command {
            Commands::Score { overrides, json } => {
                assert_eq!(overrides.temp, Some(-5.0));
                assert_eq!(overrides.rain, Some(10.0));
                assert_eq!(overrides.ph, Some(6.0));
                assert!(!json);
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_advise_overrides_and_flags() {
        let cli = Cli::try_parse_from([
            "cropwise",
            "-vv",
            "advise",
            "Pune, India",
            "--temp",
            "-0.5",
            "--ph",
            "6.5 pH",
            "--clear-weather",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Advise {
                location,
                overrides,
                clear_weather,
                clear_ph,
                ..
            } => {
                assert_eq!(location.as_deref(), Some("Pune, India"));
                assert_eq!(overrides.temp, Some(-0.5));
                assert_eq!(overrides.rain, None);
                assert_eq!(overrides.ph, Some(6.5));
                assert!(clear_weather);
                assert!(!clear_ph);
            }
            _ => panic!("expected advise command"),
        }
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        assert!(Cli::try_parse_from(["cropwise", "score", "--temp", "warm"]).is_err());
    }
}
