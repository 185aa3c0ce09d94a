// Contract Builder - public verdict contract from a derivation
use chrono::Utc;
use uuid::Uuid;

use crate::engine::Derivation;
use crate::models::{
    Confidence, ContractViolation, InternalSignalRecord, PublicSignals, SignalField, Verdict,
    VerdictContract,
};

pub const FAIL_CLOSED_REASON: &str = "Unable to complete evaluation; manual review required";

/// Fresh identifier for one evaluation.
pub fn new_scan_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whitelisted signals. A field that fell back is left out.
pub fn public_signals(record: &InternalSignalRecord) -> PublicSignals {
    let coverage = &record.coverage;
    PublicSignals {
        ownership_percent: coverage
            .is_collected(SignalField::OwnershipPercent)
            .then_some(record.ownership_percent),
        liquidity_flag: coverage
            .is_collected(SignalField::LiquidityFlag)
            .then_some(record.liquidity_flag),
    }
}

pub fn build_contract(
    derivation: Derivation,
    record: &InternalSignalRecord,
    scan_id: &str,
) -> Result<VerdictContract, ContractViolation> {
    let contract = VerdictContract {
        verdict: derivation.verdict,
        confidence: derivation.confidence,
        reasons: derivation.reasons,
        signals: public_signals(record),
        scan_id: scan_id.to_string(),
        timestamp: Utc::now(),
    };
    contract.validate()?;
    Ok(contract)
}

/// The fixed cautious contract returned whenever an evaluation cannot complete.
pub fn fail_closed_contract(scan_id: &str) -> VerdictContract {
    let scan_id = if scan_id.trim().is_empty() {
        new_scan_id()
    } else {
        scan_id.to_string()
    };

    VerdictContract {
        verdict: Verdict::ActionRequired,
        confidence: Confidence::Low,
        reasons: vec![FAIL_CLOSED_REASON.to_string()],
        signals: PublicSignals::default(),
        scan_id,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalCoverage;

    fn derivation(reasons: Vec<&str>) -> Derivation {
        Derivation {
            verdict: Verdict::ActionRequired,
            confidence: Confidence::Medium,
            reasons: reasons.into_iter().map(str::to_string).collect(),
        }
    }

    #[test]
    fn test_only_whitelisted_signals_are_copied() {
        let record = InternalSignalRecord {
            ownership_percent: 42.0,
            liquidity_flag: true,
            honeypot_indicators: vec!["mint authority is still active".to_string()],
            ..InternalSignalRecord::neutral()
        };
        let contract = build_contract(derivation(vec!["x"]), &record, "scan").unwrap();
        let value = serde_json::to_value(&contract).unwrap();
        let signals = value["signals"].as_object().unwrap();

        assert_eq!(signals.len(), 2);
        assert_eq!(signals["ownershipPercent"], 42.0);
        assert_eq!(signals["liquidityFlag"], true);
    }

    #[test]
    fn test_fallback_signals_are_omitted() {
        let mut coverage = SignalCoverage::default();
        coverage.mark_collected(SignalField::LiquidityFlag);
        let record = InternalSignalRecord {
            coverage,
            ..InternalSignalRecord::neutral()
        };

        let signals = public_signals(&record);
        assert_eq!(signals.ownership_percent, None);
        assert_eq!(signals.liquidity_flag, Some(false));
    }

    #[test]
    fn test_empty_reasons_are_rejected() {
        let record = InternalSignalRecord::neutral();
        let result = build_contract(derivation(vec![]), &record, "scan");
        assert_eq!(result, Err(ContractViolation::EmptyReasons));
    }

    #[test]
    fn test_fail_closed_contract_shape() {
        let contract = fail_closed_contract("abc");
        assert_eq!(contract.verdict, Verdict::ActionRequired);
        assert_eq!(contract.confidence, Confidence::Low);
        assert_eq!(contract.reasons, vec![FAIL_CLOSED_REASON]);
        assert!(contract.signals.is_empty());
        assert_eq!(contract.scan_id, "abc");
        assert!(contract.validate().is_ok());
    }

    #[test]
    fn test_fail_closed_contract_never_has_blank_scan_id() {
        let contract = fail_closed_contract("");
        assert!(Uuid::parse_str(&contract.scan_id).is_ok());
    }

    #[test]
    fn test_scan_ids_are_unique() {
        assert_ne!(new_scan_id(), new_scan_id());
    }
}
