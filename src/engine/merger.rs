// Signal Merger - folds collector fragments into one complete internal record
use tracing::warn;

use crate::engine::collectors::arbitrage::MAX_ARBITRAGE_SCORE;
use crate::models::{InternalSignalRecord, SignalFallbacks, SignalField, SignalFragment};

/// Combines collector fragments, filling every missing field from the fallbacks.
///
/// Merging is total. A fragment that arrives twice for the same field keeps the
/// first value; a fragment carrying a non-finite or out-of-range number is
/// discarded and the field falls back.
#[derive(Debug, Clone)]
pub struct SignalMerger {
    fallbacks: SignalFallbacks,
}

impl SignalMerger {
    pub fn new(fallbacks: SignalFallbacks) -> Self {
        Self { fallbacks }
    }

    pub fn fallbacks(&self) -> &SignalFallbacks {
        &self.fallbacks
    }

    pub fn merge<I>(&self, fragments: I) -> InternalSignalRecord
    where
        I: IntoIterator<Item = SignalFragment>,
    {
        let mut record = InternalSignalRecord::from_fallbacks(&self.fallbacks);

        for fragment in fragments {
            let field = fragment.field();

            if record.coverage.is_collected(field) {
                warn!(field = %field, "Duplicate fragment for field ignored");
                continue;
            }
            if !Self::accept(&mut record, fragment) {
                warn!(field = %field, "Fragment value out of range, using fallback");
                continue;
            }
            record.coverage.mark_collected(field);
        }

        record
    }

    /// Writes the fragment into the record. Returns false when the value is rejected.
    fn accept(record: &mut InternalSignalRecord, fragment: SignalFragment) -> bool {
        match fragment {
            SignalFragment::OwnershipPercent(value) => {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    return false;
                }
                record.ownership_percent = value;
            }
            SignalFragment::LiquidityFlag(value) => record.liquidity_flag = value,
            SignalFragment::ArbitrageRiskScore(value) => {
                if !value.is_finite() || !(0.0..=MAX_ARBITRAGE_SCORE).contains(&value) {
                    return false;
                }
                record.arbitrage_risk_score = value;
            }
            SignalFragment::HoneypotIndicators(indicators) => {
                record.honeypot_indicators = indicators
                    .into_iter()
                    .map(|indicator| indicator.trim().to_string())
                    .filter(|indicator| !indicator.is_empty())
                    .collect();
            }
            SignalFragment::ContractVerified(value) => record.contract_verified = value,
            SignalFragment::AnomalyCount(value) => record.anomaly_count = value,
        }
        true
    }
}

impl Default for SignalMerger {
    fn default() -> Self {
        Self::new(SignalFallbacks::default())
    }
}

/// Fields the merger had to fill from fallbacks, for logging.
pub fn fallback_field_names(record: &InternalSignalRecord) -> Vec<&'static str> {
    record
        .coverage
        .fallback_fields()
        .into_iter()
        .map(|field: SignalField| field.as_str())
        .collect()
}
