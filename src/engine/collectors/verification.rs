use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::chain::{ChainDataSource, MintAccount};
use crate::engine::{CollectorError, SignalCollector};
use crate::models::{SignalField, SignalFragment, Target};

/// Confirms the target is an initialised mint owned by a token program.
pub struct VerificationCollector {
    source: Arc<dyn ChainDataSource>,
}

impl VerificationCollector {
    pub fn new(source: Arc<dyn ChainDataSource>) -> Self {
        Self { source }
    }
}

pub fn is_verified_mint(account: &MintAccount) -> bool {
    account.is_token_program_owned()
        && account.account_type.as_deref() == Some("mint")
        && account.is_initialized
}

#[async_trait]
impl SignalCollector for VerificationCollector {
    fn name(&self) -> &'static str {
        "verification"
    }

    fn field(&self) -> SignalField {
        SignalField::ContractVerified
    }

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError> {
        let account = self.source.mint_account(target.mint()).await?;
        let verified = is_verified_mint(&account);
        debug!(owner = %account.owner_program, verified, "Checked mint ownership");

        Ok(SignalFragment::ContractVerified(verified))
    }
}
