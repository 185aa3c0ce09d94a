use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chain::{ChainDataSource, MintAccount};
use crate::engine::{CollectorError, SignalCollector};
use crate::models::{SignalField, SignalFragment, Target};

pub const MINT_AUTHORITY_ACTIVE: &str = "mint authority is still active";
pub const FREEZE_AUTHORITY_ACTIVE: &str = "freeze authority is still active";

/// Honeypot indicators from the mint's retained authorities.
pub struct AuthorityCollector {
    source: Arc<dyn ChainDataSource>,
}

impl AuthorityCollector {
    pub fn new(source: Arc<dyn ChainDataSource>) -> Self {
        Self { source }
    }
}

/// Mint authority first, then freeze authority.
pub fn honeypot_indicators(account: &MintAccount) -> Vec<String> {
    let mut indicators = Vec::new();
    if account.mint_authority.is_some() {
        indicators.push(MINT_AUTHORITY_ACTIVE.to_string());
    }
    if account.freeze_authority.is_some() {
        indicators.push(FREEZE_AUTHORITY_ACTIVE.to_string());
    }
    indicators
}

#[async_trait]
impl SignalCollector for AuthorityCollector {
    fn name(&self) -> &'static str {
        "authority"
    }

    fn field(&self) -> SignalField {
        SignalField::HoneypotIndicators
    }

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError> {
        let account = self.source.mint_account(target.mint()).await?;

        if account.account_type.as_deref() != Some("mint") {
            return Err(CollectorError::InvalidData {
                field: SignalField::HoneypotIndicators,
                message: "account is not a parsed token mint".to_string(),
            });
        }

        let indicators = honeypot_indicators(&account);
        debug!(indicators = ?indicators, "Checked mint authorities");

        Ok(SignalFragment::HoneypotIndicators(indicators))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(mint_authority: Option<&str>, freeze_authority: Option<&str>) -> MintAccount {
        MintAccount {
            owner_program: crate::chain::SPL_TOKEN_PROGRAM_ID.to_string(),
            account_type: Some("mint".to_string()),
            is_initialized: true,
            decimals: Some(9),
            mint_authority: mint_authority.map(str::to_string),
            freeze_authority: freeze_authority.map(str::to_string),
        }
    }

    #[test]
    fn test_revoked_authorities_yield_no_indicators() {
        assert!(honeypot_indicators(&mint(None, None)).is_empty());
    }

    #[test]
    fn test_indicator_order_is_stable() {
        let indicators = honeypot_indicators(&mint(Some("auth"), Some("freeze")));
        assert_eq!(indicators, vec![MINT_AUTHORITY_ACTIVE, FREEZE_AUTHORITY_ACTIVE]);
    }

    #[test]
    fn test_freeze_only() {
        let indicators = honeypot_indicators(&mint(None, Some("freeze")));
        assert_eq!(indicators, vec![FREEZE_AUTHORITY_ACTIVE]);
    }
}
