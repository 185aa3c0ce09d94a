// Per-evaluation memoising view over a chain data source
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::chain::{
    ChainDataSource, ChainError, HolderBalance, MintAccount, SignatureRecord, TokenSupply,
};

type Slot<T> = Arc<OnceCell<Result<T, ChainError>>>;

/// One result slot per request key. Concurrent callers for the same key share
/// a single in-flight request.
struct Memo<K, T> {
    slots: Mutex<HashMap<K, Slot<T>>>,
}

impl<K: Eq + Hash, T> Memo<K, T> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: K) -> Slot<T> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key).or_default().clone()
    }

    fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Answers each distinct request at most once, so every collector in one
/// evaluation reads the same facts. Failures are shared too; nothing is retried.
///
/// Build a fresh snapshot per evaluation. It never expires entries.
pub struct ChainSnapshot {
    inner: Arc<dyn ChainDataSource>,
    supply: Memo<String, TokenSupply>,
    holders: Memo<String, Vec<HolderBalance>>,
    accounts: Memo<String, MintAccount>,
    signatures: Memo<(String, usize), Vec<SignatureRecord>>,
}

impl ChainSnapshot {
    pub fn new(inner: Arc<dyn ChainDataSource>) -> Self {
        Self {
            inner,
            supply: Memo::new(),
            holders: Memo::new(),
            accounts: Memo::new(),
            signatures: Memo::new(),
        }
    }

    /// Distinct requests seen so far.
    pub fn request_count(&self) -> usize {
        self.supply.len() + self.holders.len() + self.accounts.len() + self.signatures.len()
    }
}

#[async_trait]
impl ChainDataSource for ChainSnapshot {
    async fn token_supply(&self, mint: &str) -> Result<TokenSupply, ChainError> {
        let slot = self.supply.slot(mint.to_string());
        slot.get_or_init(|| self.inner.token_supply(mint))
            .await
            .clone()
    }

    async fn largest_accounts(&self, mint: &str) -> Result<Vec<HolderBalance>, ChainError> {
        let slot = self.holders.slot(mint.to_string());
        slot.get_or_init(|| self.inner.largest_accounts(mint))
            .await
            .clone()
    }

    async fn mint_account(&self, mint: &str) -> Result<MintAccount, ChainError> {
        let slot = self.accounts.slot(mint.to_string());
        slot.get_or_init(|| self.inner.mint_account(mint))
            .await
            .clone()
    }

    async fn recent_signatures(
        &self,
        mint: &str,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, ChainError> {
        let slot = self.signatures.slot((mint.to_string(), limit));
        let result = slot
            .get_or_init(|| {
                debug!(limit, "Fetching recent signatures for snapshot");
                self.inner.recent_signatures(mint, limit)
            })
            .await;
        result.clone()
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}
