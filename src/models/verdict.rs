// Public verdict contract.
// The wire shape is additive-only: never rename or remove a field.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level recommendation. Variants are declared from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    SafeToProceed,
    ActionRequired,
    DoNotProceed,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::SafeToProceed => "SAFE_TO_PROCEED",
            Verdict::ActionRequired => "ACTION_REQUIRED",
            Verdict::DoNotProceed => "DO_NOT_PROCEED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI-facing whitelist of signals. A field that was not actually collected is omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublicSignals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity_flag: Option<bool>,
}

impl PublicSignals {
    pub fn is_empty(&self) -> bool {
        self.ownership_percent.is_none() && self.liquidity_flag.is_none()
    }
}

/// The result returned for every evaluation, on success and failure paths alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerdictContract {
    pub verdict: Verdict,
    pub confidence: Confidence,
    /// Most severe first. Never empty.
    pub reasons: Vec<String>,
    pub signals: PublicSignals,
    pub scan_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Top-level keys of the serialized contract.
pub const CONTRACT_KEYS: [&str; 6] = [
    "verdict",
    "confidence",
    "reasons",
    "signals",
    "scanId",
    "timestamp",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("reasons must contain at least one entry")]
    EmptyReasons,

    #[error("reason at position {index} is blank")]
    BlankReason { index: usize },

    #[error("scan id must not be empty")]
    EmptyScanId,
}

impl VerdictContract {
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.reasons.is_empty() {
            return Err(ContractViolation::EmptyReasons);
        }
        if let Some(index) = self.reasons.iter().position(|r| r.trim().is_empty()) {
            return Err(ContractViolation::BlankReason { index });
        }
        if self.scan_id.trim().is_empty() {
            return Err(ContractViolation::EmptyScanId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contract() -> VerdictContract {
        VerdictContract {
            verdict: Verdict::ActionRequired,
            confidence: Confidence::Medium,
            reasons: vec!["Liquidity is insufficient or unfavorably locked".to_string()],
            signals: PublicSignals {
                ownership_percent: Some(42.5),
                liquidity_flag: Some(true),
            },
            scan_id: "0b6b7e38-6f4f-4b8e-9a55-3f1f3f5b6c1d".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_serialized_keys_match_contract() {
        let value = serde_json::to_value(sample_contract()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort();
        let mut expected = CONTRACT_KEYS.to_vec();
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_enum_wire_names() {
        let value = serde_json::to_value(sample_contract()).unwrap();
        assert_eq!(value["verdict"], "ACTION_REQUIRED");
        assert_eq!(value["confidence"], "MEDIUM");
        assert_eq!(value["signals"]["ownershipPercent"], 42.5);
        assert_eq!(value["signals"]["liquidityFlag"], true);
    }

    #[test]
    fn test_missing_signals_are_omitted_not_null() {
        let mut contract = sample_contract();
        contract.signals = PublicSignals::default();
        let json = serde_json::to_string(&contract).unwrap();
        assert!(json.contains("\"signals\":{}"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let value = serde_json::to_value(sample_contract()).unwrap();
        let timestamp = value["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_deserialize_rejects_extra_keys() {
        let mut value = serde_json::to_value(sample_contract()).unwrap();
        value["debug"] = serde_json::json!("leak");
        assert!(serde_json::from_value::<VerdictContract>(value).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(sample_contract().validate().is_ok());

        let mut contract = sample_contract();
        contract.reasons.clear();
        assert_eq!(contract.validate(), Err(ContractViolation::EmptyReasons));

        let mut contract = sample_contract();
        contract.reasons.push("  ".to_string());
        assert_eq!(contract.validate(), Err(ContractViolation::BlankReason { index: 1 }));

        let mut contract = sample_contract();
        contract.scan_id = String::new();
        assert_eq!(contract.validate(), Err(ContractViolation::EmptyScanId));
    }

    #[test]
    fn test_verdict_severity_order() {
        assert!(Verdict::DoNotProceed > Verdict::ActionRequired);
        assert!(Verdict::ActionRequired > Verdict::SafeToProceed);
    }
}
