use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chain::{ChainDataSource, HolderBalance, TokenSupply};
use crate::engine::{CollectorError, SignalCollector};
use crate::models::{SignalField, SignalFragment, Target};

/// Share of supply held by the largest holder accounts.
pub struct OwnershipCollector {
    source: Arc<dyn ChainDataSource>,
    top_holder_count: usize,
}

impl OwnershipCollector {
    pub fn new(source: Arc<dyn ChainDataSource>, top_holder_count: usize) -> Self {
        Self {
            source,
            top_holder_count,
        }
    }
}

/// Percentage of `supply` held by the first `top_n` holders, clamped to [0, 100].
pub fn concentration_percent(
    supply: &TokenSupply,
    holders: &[HolderBalance],
    top_n: usize,
) -> Result<f64, CollectorError> {
    if supply.amount == 0 {
        return Err(CollectorError::InvalidData {
            field: SignalField::OwnershipPercent,
            message: "token supply is zero".to_string(),
        });
    }

    let held = holders
        .iter()
        .take(top_n)
        .fold(0u128, |total, holder| total.saturating_add(holder.amount));

    let percent = held as f64 / supply.amount as f64 * 100.0;
    Ok(percent.clamp(0.0, 100.0))
}

#[async_trait]
impl SignalCollector for OwnershipCollector {
    fn name(&self) -> &'static str {
        "ownership"
    }

    fn field(&self) -> SignalField {
        SignalField::OwnershipPercent
    }

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError> {
        let (supply, holders) = tokio::try_join!(
            self.source.token_supply(target.mint()),
            self.source.largest_accounts(target.mint()),
        )?;

        let percent = concentration_percent(&supply, &holders, self.top_holder_count)?;
        debug!(
            holders = holders.len(),
            top_n = self.top_holder_count,
            ownership_percent = percent,
            "Computed ownership concentration"
        );

        Ok(SignalFragment::OwnershipPercent(percent))
    }
}
