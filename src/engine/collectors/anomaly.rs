use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chain::{ChainDataSource, HolderBalance, SignatureRecord, TokenSupply};
use crate::engine::{CollectorError, SignalCollector};
use crate::models::{SignalField, SignalFragment, Target};

/// Counts structural oddities in supply, holders and recent activity.
pub struct AnomalyCollector {
    source: Arc<dyn ChainDataSource>,
    sample_size: usize,
    failed_transaction_ratio: f64,
}

impl AnomalyCollector {
    pub fn new(
        source: Arc<dyn ChainDataSource>,
        sample_size: usize,
        failed_transaction_ratio: f64,
    ) -> Self {
        Self {
            source,
            sample_size,
            failed_transaction_ratio,
        }
    }
}

pub fn count_anomalies(
    supply: &TokenSupply,
    holders: &[HolderBalance],
    signatures: &[SignatureRecord],
    failed_transaction_ratio: f64,
) -> u32 {
    let mut anomalies = 0;

    if supply.amount == 0 {
        anomalies += 1;
    }
    if supply.amount > 0 && holders.iter().all(|h| h.amount == 0) {
        anomalies += 1;
    }
    if !signatures.is_empty() {
        let failed = signatures.iter().filter(|s| s.failed).count();
        if failed as f64 / signatures.len() as f64 > failed_transaction_ratio {
            anomalies += 1;
        }
    }

    anomalies
}

#[async_trait]
impl SignalCollector for AnomalyCollector {
    fn name(&self) -> &'static str {
        "anomaly"
    }

    fn field(&self) -> SignalField {
        SignalField::AnomalyCount
    }

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError> {
        let mint = target.mint();
        let (supply, holders, signatures) = tokio::try_join!(
            self.source.token_supply(mint),
            self.source.largest_accounts(mint),
            self.source.recent_signatures(mint, self.sample_size),
        )?;

        let anomalies = count_anomalies(&supply, &holders, &signatures, self.failed_transaction_ratio);
        debug!(anomaly_count = anomalies, "Counted anomalies");

        Ok(SignalFragment::AnomalyCount(anomalies))
    }
}
