// Signal collectors. One collector per internal signal field.

pub mod ownership;
pub mod liquidity;
pub mod arbitrage;
pub mod authority;
pub mod verification;
pub mod anomaly;

use std::sync::Arc;

use crate::chain::ChainDataSource;
use crate::config::Settings;
use crate::engine::SignalCollector;

pub use anomaly::AnomalyCollector;
pub use arbitrage::ArbitrageCollector;
pub use authority::AuthorityCollector;
pub use liquidity::LiquidityCollector;
pub use ownership::OwnershipCollector;
pub use verification::VerificationCollector;

/// Tunables the standard collectors read from settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorSettings {
    pub top_holder_count: usize,
    pub signature_sample_size: usize,
    pub min_recent_transactions: usize,
    pub failed_transaction_ratio: f64,
}

impl From<&Settings> for CollectorSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            top_holder_count: settings.chain.top_holder_count,
            signature_sample_size: settings.chain.signature_sample_size,
            min_recent_transactions: settings.rules.min_recent_transactions,
            failed_transaction_ratio: settings.rules.failed_transaction_ratio,
        }
    }
}

/// The six standard collectors, sharing one chain data source.
pub fn standard_collectors(
    source: Arc<dyn ChainDataSource>,
    settings: &CollectorSettings,
) -> Vec<Arc<dyn SignalCollector>> {
    let sample_size = settings.signature_sample_size;

    vec![
        Arc::new(OwnershipCollector::new(
            source.clone(),
            settings.top_holder_count,
        )),
        Arc::new(LiquidityCollector::new(
            source.clone(),
            sample_size,
            settings.min_recent_transactions,
        )),
        Arc::new(ArbitrageCollector::new(source.clone(), sample_size)),
        Arc::new(AuthorityCollector::new(source.clone())),
        Arc::new(VerificationCollector::new(source.clone())),
        Arc::new(AnomalyCollector::new(
            source,
            sample_size,
            settings.failed_transaction_ratio,
        )),
    ]
}
