// Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use token_verdict::{
    chain::{
        ChainDataSource, ChainError, HolderBalance, MintAccount, SignatureRecord, TokenSupply,
        SPL_TOKEN_PROGRAM_ID,
    },
    config::Settings,
    engine::{CollectorError, SignalCollector, VerdictEngine},
    models::{SignalField, SignalFragment, Target},
};

/// USDC mint, a well-formed base58 address.
pub const VALID_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub fn target() -> Target {
    Target::parse(VALID_MINT).unwrap()
}

#[derive(Clone)]
pub enum Behavior {
    Return(SignalFragment),
    Fail,
    /// Sleep, then return the fragment.
    Delay(Duration, SignalFragment),
    Panic,
    /// Return a fragment for some other field.
    Misroute(SignalFragment),
}

pub struct ScriptedCollector {
    name: &'static str,
    field: SignalField,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl ScriptedCollector {
    pub fn new(name: &'static str, field: SignalField, behavior: Behavior) -> Self {
        Self {
            name,
            field,
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalCollector for ScriptedCollector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn field(&self) -> SignalField {
        self.field
    }

    async fn collect(&self, _target: &Target) -> Result<SignalFragment, CollectorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Return(fragment) | Behavior::Misroute(fragment) => Ok(fragment.clone()),
            Behavior::Fail => Err(CollectorError::Chain(ChainError::HttpStatus { status: 503 })),
            Behavior::Delay(delay, fragment) => {
                tokio::time::sleep(*delay).await;
                Ok(fragment.clone())
            }
            Behavior::Panic => panic!("scripted collector panic"),
        }
    }
}

fn name_of(field: SignalField) -> &'static str {
    match field {
        SignalField::OwnershipPercent => "ownership",
        SignalField::LiquidityFlag => "liquidity",
        SignalField::ArbitrageRiskScore => "arbitrage",
        SignalField::HoneypotIndicators => "authority",
        SignalField::ContractVerified => "verification",
        SignalField::AnomalyCount => "anomaly",
    }
}

/// Neutral fragment for each field, with the given ownership percentage.
pub fn neutral_fragments(ownership_percent: f64) -> Vec<SignalFragment> {
    vec![
        SignalFragment::OwnershipPercent(ownership_percent),
        SignalFragment::LiquidityFlag(false),
        SignalFragment::ArbitrageRiskScore(0.0),
        SignalFragment::HoneypotIndicators(Vec::new()),
        SignalFragment::ContractVerified(true),
        SignalFragment::AnomalyCount(0),
    ]
}

/// Six scripted collectors returning neutral values.
pub fn neutral_collectors(ownership_percent: f64) -> Vec<Arc<ScriptedCollector>> {
    neutral_fragments(ownership_percent)
        .into_iter()
        .map(|fragment| {
            let field = fragment.field();
            Arc::new(ScriptedCollector::new(
                name_of(field),
                field,
                Behavior::Return(fragment),
            ))
        })
        .collect()
}

/// Neutral collectors with the collector for `field` replaced by `behavior`.
pub fn collectors_with(
    ownership_percent: f64,
    field: SignalField,
    behavior: Behavior,
) -> Vec<Arc<ScriptedCollector>> {
    neutral_collectors(ownership_percent)
        .into_iter()
        .map(|collector| {
            if collector.field() == field {
                Arc::new(ScriptedCollector::new(name_of(field), field, behavior.clone()))
            } else {
                collector
            }
        })
        .collect()
}

pub fn engine_from(collectors: &[Arc<ScriptedCollector>]) -> VerdictEngine {
    let collectors: Vec<Arc<dyn SignalCollector>> = collectors
        .iter()
        .map(|c| c.clone() as Arc<dyn SignalCollector>)
        .collect();
    VerdictEngine::new(collectors, &Settings::default())
}

/// In-memory chain with controllable facts.
#[derive(Clone)]
pub struct ScriptedChain {
    pub supply: u128,
    pub holders: Vec<u128>,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
    pub owner_program: String,
    pub signature_slots: Vec<u64>,
    pub failed_signatures: usize,
    pub unavailable: bool,
}

impl ScriptedChain {
    /// Widely held, revoked authorities, steady activity.
    pub fn healthy() -> Self {
        Self {
            supply: 1_000_000,
            holders: vec![10_000; 10],
            mint_authority: None,
            freeze_authority: None,
            owner_program: SPL_TOKEN_PROGRAM_ID.to_string(),
            signature_slots: (100..120).collect(),
            failed_signatures: 0,
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::healthy()
        }
    }

    fn check(&self) -> Result<(), ChainError> {
        if self.unavailable {
            Err(ChainError::HttpStatus { status: 503 })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainDataSource for ScriptedChain {
    async fn token_supply(&self, _mint: &str) -> Result<TokenSupply, ChainError> {
        self.check()?;
        Ok(TokenSupply {
            amount: self.supply,
            decimals: 6,
        })
    }

    async fn largest_accounts(&self, _mint: &str) -> Result<Vec<HolderBalance>, ChainError> {
        self.check()?;
        Ok(self
            .holders
            .iter()
            .enumerate()
            .map(|(i, amount)| HolderBalance {
                address: format!("holder-{}", i),
                amount: *amount,
            })
            .collect())
    }

    async fn mint_account(&self, _mint: &str) -> Result<MintAccount, ChainError> {
        self.check()?;
        Ok(MintAccount {
            owner_program: self.owner_program.clone(),
            account_type: Some("mint".to_string()),
            is_initialized: true,
            decimals: Some(6),
            mint_authority: self.mint_authority.clone(),
            freeze_authority: self.freeze_authority.clone(),
        })
    }

    async fn recent_signatures(
        &self,
        _mint: &str,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, ChainError> {
        self.check()?;
        Ok(self
            .signature_slots
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, slot)| SignatureRecord {
                signature: format!("sig-{}", i),
                slot: *slot,
                failed: i < self.failed_signatures,
            })
            .collect())
    }
}
