use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::SignalFallbacks;

/// Prefix for environment overrides, e.g. `TOKEN_VERDICT__CHAIN__RPC_URL`.
pub const ENV_PREFIX: &str = "TOKEN_VERDICT";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub chain: ChainSettings,
    pub engine: EngineSettings,
    pub rules: RuleSettings,
    pub fallbacks: SignalFallbacks,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    pub rpc_url: String,
    /// Sent as the `api-key` query parameter. Never logged.
    pub api_key: Option<String>,
    pub commitment: String,
    pub request_timeout_ms: u64,
    /// How many of the largest holder accounts count towards concentration.
    pub top_holder_count: usize,
    /// How many recent signatures are sampled for activity-based signals.
    pub signature_sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub collector_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub do_not_proceed_ownership_percent: f64,
    pub action_required_ownership_percent: f64,
    /// Fewer sampled transactions than this flags liquidity.
    pub min_recent_transactions: usize,
    /// Failed share of sampled transactions above this counts as an anomaly.
    pub failed_transaction_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// `json`, `pretty` or `compact`.
    pub format: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ChainSettings {
    fn default() -> Self {
        ChainSettings {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            api_key: None,
            commitment: "confirmed".to_string(),
            request_timeout_ms: 2_500,
            top_holder_count: 10,
            signature_sample_size: 100,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            collector_timeout_ms: 3_000,
        }
    }
}

impl Default for RuleSettings {
    fn default() -> Self {
        RuleSettings {
            do_not_proceed_ownership_percent: 80.0,
            action_required_ownership_percent: 50.0,
            min_recent_transactions: 10,
            failed_transaction_ratio: 0.5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl fmt::Debug for ChainSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainSettings")
            .field("rpc_url", &self.rpc_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("commitment", &self.commitment)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("top_holder_count", &self.top_holder_count)
            .field("signature_sample_size", &self.signature_sample_size)
            .finish()
    }
}

impl ChainSettings {
    /// RPC endpoint with the API key attached, if one is configured.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.rpc_url)?;
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            url.query_pairs_mut().append_pair("api-key", key);
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl EngineSettings {
    pub fn collector_timeout(&self) -> Duration {
        Duration::from_millis(self.collector_timeout_ms)
    }
}

impl Settings {
    /// Built-in defaults, then `config/default`, then `config/local`, then the environment.
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
