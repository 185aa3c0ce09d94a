// Tracing subscriber setup
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(settings: &LoggingSettings) -> String {
    let level = settings
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    format!("token_verdict={}", level)
}

fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(settings)))
}

/// Initialize logging based on configuration
pub fn init_logging(settings: &LoggingSettings) -> Result<(), TryInitError> {
    match settings.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter(settings))
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter(settings))
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter(settings))
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init()?;
        }
    }

    info!(level = %settings.level, format = %settings.format, "Logging initialized");
    Ok(())
}
