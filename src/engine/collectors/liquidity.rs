use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chain::ChainDataSource;
use crate::engine::{CollectorError, SignalCollector};
use crate::models::{SignalField, SignalFragment, Target};

/// Flags thin liquidity from how little recent activity the mint sees.
pub struct LiquidityCollector {
    source: Arc<dyn ChainDataSource>,
    sample_size: usize,
    min_recent_transactions: usize,
}

impl LiquidityCollector {
    pub fn new(
        source: Arc<dyn ChainDataSource>,
        sample_size: usize,
        min_recent_transactions: usize,
    ) -> Self {
        Self {
            source,
            sample_size,
            min_recent_transactions,
        }
    }
}

pub fn is_liquidity_insufficient(recent_transactions: usize, min_recent_transactions: usize) -> bool {
    recent_transactions < min_recent_transactions
}

#[async_trait]
impl SignalCollector for LiquidityCollector {
    fn name(&self) -> &'static str {
        "liquidity"
    }

    fn field(&self) -> SignalField {
        SignalField::LiquidityFlag
    }

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError> {
        let signatures = self
            .source
            .recent_signatures(target.mint(), self.sample_size)
            .await?;

        let flagged = is_liquidity_insufficient(signatures.len(), self.min_recent_transactions);
        debug!(
            recent_transactions = signatures.len(),
            minimum = self.min_recent_transactions,
            flagged,
            "Assessed liquidity"
        );

        Ok(SignalFragment::LiquidityFlag(flagged))
    }
}
