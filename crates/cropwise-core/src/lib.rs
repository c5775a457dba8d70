pub mod config;
pub mod error;
pub mod last_query;

pub use config::{ApiConfig, Config, HttpConfig, StorageConfig, SuggestConfig, ValidationResult};
pub use error::{ConfigError, NetworkError, ReqwestErrorExt, StorageError};
pub use last_query::LastQueryStore;

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` takes precedence; otherwise `verbosity` picks warn, info or debug.
/// Logs go to stderr so command output stays clean.
pub fn init(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Cropwise core initialized");
    Ok(())
}
