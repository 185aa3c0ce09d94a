use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chain::{ChainDataSource, SignatureRecord};
use crate::engine::{CollectorError, SignalCollector};
use crate::models::{SignalField, SignalFragment, Target};

pub const MAX_ARBITRAGE_SCORE: f64 = 10.0;

/// Scores bot-style activity from how often sampled transactions land in the same slot.
pub struct ArbitrageCollector {
    source: Arc<dyn ChainDataSource>,
    sample_size: usize,
}

impl ArbitrageCollector {
    pub fn new(source: Arc<dyn ChainDataSource>, sample_size: usize) -> Self {
        Self {
            source,
            sample_size,
        }
    }
}

/// 0-10: ten times the share of signatures that share a slot with another one, to one decimal.
pub fn slot_clustering_score(signatures: &[SignatureRecord]) -> f64 {
    if signatures.is_empty() {
        return 0.0;
    }

    let mut per_slot: HashMap<u64, usize> = HashMap::new();
    for record in signatures {
        *per_slot.entry(record.slot).or_insert(0) += 1;
    }

    let clustered: usize = per_slot.values().filter(|&&count| count > 1).sum();
    let score = MAX_ARBITRAGE_SCORE * clustered as f64 / signatures.len() as f64;
    (score * 10.0).round() / 10.0
}

#[async_trait]
impl SignalCollector for ArbitrageCollector {
    fn name(&self) -> &'static str {
        "arbitrage"
    }

    fn field(&self) -> SignalField {
        SignalField::ArbitrageRiskScore
    }

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError> {
        let signatures = self
            .source
            .recent_signatures(target.mint(), self.sample_size)
            .await?;

        let score = slot_clustering_score(&signatures);
        debug!(sampled = signatures.len(), arbitrage_risk_score = score, "Scored arbitrage activity");

        Ok(SignalFragment::ArbitrageRiskScore(score))
    }
}
