use thiserror::Error;
use url::Url;

use super::settings::{
    ChainSettings, EngineSettings, LoggingSettings, RuleSettings, ServerSettings, Settings,
};
use crate::models::SignalFallbacks;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid range: {field} must be between {min} and {max}, got {value}")]
    InvalidRange { field: String, min: f64, max: f64, value: f64 },
    #[error("Invalid format: {field} - {message}")]
    InvalidFormat { field: String, message: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];
const COMMITMENTS: [&str; 3] = ["processed", "confirmed", "finalized"];
/// `getTokenLargestAccounts` returns at most 20 accounts.
const MAX_TOP_HOLDERS: usize = 20;
/// `getSignaturesForAddress` accepts a limit of at most 1000.
const MAX_SIGNATURE_SAMPLE: usize = 1_000;

/// Checks a loaded `Settings` before the engine is built.
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, settings: &Settings) -> ValidationResult<()> {
        self.validate_server(&settings.server)?;
        self.validate_chain(&settings.chain)?;
        self.validate_engine(&settings.engine)?;
        self.validate_rules(&settings.rules)?;
        self.validate_fallbacks(&settings.fallbacks)?;
        self.validate_logging(&settings.logging)?;
        Ok(())
    }

    pub fn validate_server(&self, server: &ServerSettings) -> ValidationResult<()> {
        if server.host.trim().is_empty() {
            return Err(ValidationError::MissingField("server.host".to_string()));
        }
        if server.port == 0 {
            return Err(range_error("server.port", 1.0, 65535.0, 0.0));
        }
        Ok(())
    }

    pub fn validate_chain(&self, chain: &ChainSettings) -> ValidationResult<()> {
        if chain.rpc_url.trim().is_empty() {
            return Err(ValidationError::MissingField("chain.rpc_url".to_string()));
        }
        let url = Url::parse(&chain.rpc_url)
            .map_err(|e| ValidationError::InvalidUrl(format!("chain.rpc_url: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl(format!(
                "chain.rpc_url: unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if url.query_pairs().any(|(key, _)| key == "api-key") {
            return Err(ValidationError::InvalidFormat {
                field: "chain.rpc_url".to_string(),
                message: "API key must be supplied through chain.api_key".to_string(),
            });
        }
        if !COMMITMENTS.contains(&chain.commitment.as_str()) {
            return Err(ValidationError::InvalidFormat {
                field: "chain.commitment".to_string(),
                message: format!("expected one of {:?}", COMMITMENTS),
            });
        }
        if chain.request_timeout_ms == 0 {
            return Err(range_error("chain.request_timeout_ms", 1.0, f64::MAX, 0.0));
        }
        if chain.top_holder_count == 0 || chain.top_holder_count > MAX_TOP_HOLDERS {
            return Err(range_error(
                "chain.top_holder_count",
                1.0,
                MAX_TOP_HOLDERS as f64,
                chain.top_holder_count as f64,
            ));
        }
        if chain.signature_sample_size == 0 || chain.signature_sample_size > MAX_SIGNATURE_SAMPLE {
            return Err(range_error(
                "chain.signature_sample_size",
                1.0,
                MAX_SIGNATURE_SAMPLE as f64,
                chain.signature_sample_size as f64,
            ));
        }
        Ok(())
    }

    pub fn validate_engine(&self, engine: &EngineSettings) -> ValidationResult<()> {
        if engine.collector_timeout_ms == 0 {
            return Err(range_error("engine.collector_timeout_ms", 1.0, f64::MAX, 0.0));
        }
        Ok(())
    }

    pub fn validate_rules(&self, rules: &RuleSettings) -> ValidationResult<()> {
        let dnp = rules.do_not_proceed_ownership_percent;
        let ar = rules.action_required_ownership_percent;
        if !(0.0..=100.0).contains(&dnp) {
            return Err(range_error("rules.do_not_proceed_ownership_percent", 0.0, 100.0, dnp));
        }
        if !(0.0..dnp).contains(&ar) {
            return Err(range_error("rules.action_required_ownership_percent", 0.0, dnp, ar));
        }
        let ratio = rules.failed_transaction_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(range_error("rules.failed_transaction_ratio", 0.0, 1.0, ratio));
        }
        Ok(())
    }

    pub fn validate_fallbacks(&self, fallbacks: &SignalFallbacks) -> ValidationResult<()> {
        let ownership = fallbacks.ownership_percent;
        if !(0.0..=100.0).contains(&ownership) {
            return Err(range_error("fallbacks.ownership_percent", 0.0, 100.0, ownership));
        }
        let arbitrage = fallbacks.arbitrage_risk_score;
        if !(0.0..=10.0).contains(&arbitrage) {
            return Err(range_error("fallbacks.arbitrage_risk_score", 0.0, 10.0, arbitrage));
        }
        if fallbacks.honeypot_indicators.iter().any(|i| i.trim().is_empty()) {
            return Err(ValidationError::InvalidFormat {
                field: "fallbacks.honeypot_indicators".to_string(),
                message: "indicators must not be blank".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_logging(&self, logging: &LoggingSettings) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidFormat {
                field: "logging.level".to_string(),
                message: format!("expected one of {:?}", LOG_LEVELS),
            });
        }
        if !LOG_FORMATS.contains(&logging.format.as_str()) {
            return Err(ValidationError::InvalidFormat {
                field: "logging.format".to_string(),
                message: format!("expected one of {:?}", LOG_FORMATS),
            });
        }
        Ok(())
    }
}

fn range_error(field: &str, min: f64, max: f64, value: f64) -> ValidationError {
    ValidationError::InvalidRange {
        field: field.to_string(),
        min,
        max,
        value,
    }
}
