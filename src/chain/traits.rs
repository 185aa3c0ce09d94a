// Chain data source seam consumed by the signal collectors
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chain::ChainError;

/// Classic SPL Token program.
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
/// Token-2022 program.
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSupply {
    /// Raw base units.
    pub amount: u128,
    pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderBalance {
    pub address: String,
    /// Raw base units.
    pub amount: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintAccount {
    pub owner_program: String,
    /// Parsed account type reported by the node, `Some("mint")` for a mint.
    pub account_type: Option<String>,
    pub is_initialized: bool,
    pub decimals: Option<u8>,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
}

impl MintAccount {
    pub fn is_token_program_owned(&self) -> bool {
        self.owner_program == SPL_TOKEN_PROGRAM_ID || self.owner_program == TOKEN_2022_PROGRAM_ID
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub signature: String,
    pub slot: u64,
    pub failed: bool,
}

/// Raw chain facts about a mint. Implementations do not retry.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    async fn token_supply(&self, mint: &str) -> Result<TokenSupply, ChainError>;

    /// Largest token accounts for the mint, ordered by balance descending.
    async fn largest_accounts(&self, mint: &str) -> Result<Vec<HolderBalance>, ChainError>;

    async fn mint_account(&self, mint: &str) -> Result<MintAccount, ChainError>;

    /// Most recent signatures touching the mint address, newest first.
    async fn recent_signatures(
        &self,
        mint: &str,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, ChainError>;

    fn source_name(&self) -> &'static str {
        "chain"
    }
}
