// Internal signal record used by the verdict engine.
// Nothing in this module is ever serialized into a response.
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The six internal signal fields. Each is owned by exactly one collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalField {
    OwnershipPercent,
    LiquidityFlag,
    ArbitrageRiskScore,
    HoneypotIndicators,
    ContractVerified,
    AnomalyCount,
}

impl SignalField {
    pub const ALL: [SignalField; 6] = [
        SignalField::OwnershipPercent,
        SignalField::LiquidityFlag,
        SignalField::ArbitrageRiskScore,
        SignalField::HoneypotIndicators,
        SignalField::ContractVerified,
        SignalField::AnomalyCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalField::OwnershipPercent => "ownership_percent",
            SignalField::LiquidityFlag => "liquidity_flag",
            SignalField::ArbitrageRiskScore => "arbitrage_risk_score",
            SignalField::HoneypotIndicators => "honeypot_indicators",
            SignalField::ContractVerified => "contract_verified",
            SignalField::AnomalyCount => "anomaly_count",
        }
    }
}

impl fmt::Display for SignalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single collector's contribution. The variant fixes which field it fills.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalFragment {
    OwnershipPercent(f64),
    LiquidityFlag(bool),
    ArbitrageRiskScore(f64),
    HoneypotIndicators(Vec<String>),
    ContractVerified(bool),
    AnomalyCount(u32),
}

impl SignalFragment {
    pub fn field(&self) -> SignalField {
        match self {
            SignalFragment::OwnershipPercent(_) => SignalField::OwnershipPercent,
            SignalFragment::LiquidityFlag(_) => SignalField::LiquidityFlag,
            SignalFragment::ArbitrageRiskScore(_) => SignalField::ArbitrageRiskScore,
            SignalFragment::HoneypotIndicators(_) => SignalField::HoneypotIndicators,
            SignalFragment::ContractVerified(_) => SignalField::ContractVerified,
            SignalFragment::AnomalyCount(_) => SignalField::AnomalyCount,
        }
    }
}

/// Values substituted for any field no collector produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalFallbacks {
    /// Unknown concentration is treated as fully concentrated.
    pub ownership_percent: f64,
    /// Unknown liquidity is treated as insufficient.
    pub liquidity_flag: bool,
    /// Top of the arbitrage collector's 0-10 scale.
    pub arbitrage_risk_score: f64,
    pub honeypot_indicators: Vec<String>,
    /// Verification is never assumed.
    pub contract_verified: bool,
    pub anomaly_count: u32,
}

impl Default for SignalFallbacks {
    fn default() -> Self {
        Self {
            ownership_percent: 100.0,
            liquidity_flag: true,
            arbitrage_risk_score: 10.0,
            honeypot_indicators: Vec::new(),
            contract_verified: false,
            anomaly_count: 0,
        }
    }
}

/// Which fields were actually collected and which fell back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalCoverage {
    collected: BTreeSet<SignalField>,
}

impl SignalCoverage {
    pub fn mark_collected(&mut self, field: SignalField) -> bool {
        self.collected.insert(field)
    }

    pub fn is_collected(&self, field: SignalField) -> bool {
        self.collected.contains(&field)
    }

    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    pub fn fallback_fields(&self) -> Vec<SignalField> {
        SignalField::ALL
            .iter()
            .copied()
            .filter(|field| !self.collected.contains(field))
            .collect()
    }

    pub fn fallback_count(&self) -> usize {
        SignalField::ALL.len() - self.collected.len()
    }

    pub fn is_complete(&self) -> bool {
        self.fallback_count() == 0
    }
}

/// Complete internal signal record. Every field has a value once merged.
#[derive(Debug, Clone, PartialEq)]
pub struct InternalSignalRecord {
    pub ownership_percent: f64,
    pub liquidity_flag: bool,
    pub arbitrage_risk_score: f64,
    pub honeypot_indicators: Vec<String>,
    pub contract_verified: bool,
    pub anomaly_count: u32,
    pub coverage: SignalCoverage,
}

impl InternalSignalRecord {
    /// Record built purely from fallbacks, with nothing marked as collected.
    pub fn from_fallbacks(fallbacks: &SignalFallbacks) -> Self {
        Self {
            ownership_percent: fallbacks.ownership_percent,
            liquidity_flag: fallbacks.liquidity_flag,
            arbitrage_risk_score: fallbacks.arbitrage_risk_score,
            honeypot_indicators: fallbacks.honeypot_indicators.clone(),
            contract_verified: fallbacks.contract_verified,
            anomaly_count: fallbacks.anomaly_count,
            coverage: SignalCoverage::default(),
        }
    }

    /// Neutral record with every field collected. Mostly useful in tests and benches.
    pub fn neutral() -> Self {
        let mut coverage = SignalCoverage::default();
        for field in SignalField::ALL {
            coverage.mark_collected(field);
        }
        Self {
            ownership_percent: 0.0,
            liquidity_flag: false,
            arbitrage_risk_score: 0.0,
            honeypot_indicators: Vec::new(),
            contract_verified: true,
            anomaly_count: 0,
            coverage,
        }
    }
}
