mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use common::*;
use serde_json::Value;
use token_verdict::{
    engine::fail_closed_contract,
    models::{SignalField, VerdictContract, CONTRACT_KEYS},
};

const INTERNAL_FIELD_NAMES: [&str; 8] = [
    "arbitrageRiskScore",
    "arbitrage_risk_score",
    "honeypotIndicators",
    "honeypot_indicators",
    "contractVerified",
    "contract_verified",
    "anomalyCount",
    "anomaly_count",
];

fn assert_contract_shape(value: &Value) {
    let object = value.as_object().expect("contract serializes as an object");
    let keys: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = CONTRACT_KEYS.iter().copied().collect();
    assert_eq!(keys, expected);

    assert!(matches!(
        value["verdict"].as_str(),
        Some("SAFE_TO_PROCEED" | "ACTION_REQUIRED" | "DO_NOT_PROCEED")
    ));
    assert!(matches!(
        value["confidence"].as_str(),
        Some("LOW" | "MEDIUM" | "HIGH")
    ));

    let reasons = value["reasons"].as_array().expect("reasons is an array");
    assert!(!reasons.is_empty());
    assert!(reasons
        .iter()
        .all(|r| r.as_str().map_or(false, |r| !r.trim().is_empty())));

    let signals = value["signals"].as_object().expect("signals is an object");
    assert!(signals
        .keys()
        .all(|k| k == "ownershipPercent" || k == "liquidityFlag"));

    assert!(!value["scanId"].as_str().unwrap_or_default().is_empty());
    assert!(value["timestamp"].as_str().unwrap_or_default().ends_with('Z'));

    let text = value.to_string();
    assert!(!text.contains("null"));
    for name in INTERNAL_FIELD_NAMES {
        assert!(!text.contains(name), "internal field {} leaked", name);
    }
}

async fn evaluate_json(collectors: &[Arc<ScriptedCollector>]) -> Value {
    let contract = engine_from(collectors).evaluate(&target()).await;
    serde_json::to_value(&contract).unwrap()
}

#[tokio::test]
async fn test_success_path_contract_shape() {
    for ownership in [0.0, 30.0, 65.0, 91.0, 100.0] {
        assert_contract_shape(&evaluate_json(&neutral_collectors(ownership)).await);
    }
}

#[tokio::test]
async fn test_partial_failure_contract_shape() {
    for field in SignalField::ALL {
        assert_contract_shape(&evaluate_json(&collectors_with(30.0, field, Behavior::Fail)).await);
        assert_contract_shape(&evaluate_json(&collectors_with(30.0, field, Behavior::Panic)).await);
    }
}

#[tokio::test]
async fn test_fail_closed_contract_shape() {
    let collectors: Vec<Arc<ScriptedCollector>> = SignalField::ALL
        .iter()
        .map(|field| Arc::new(ScriptedCollector::new("failing", *field, Behavior::Fail)))
        .collect();
    let value = evaluate_json(&collectors).await;

    assert_contract_shape(&value);
    assert_eq!(value["signals"], serde_json::json!({}));
}

#[test]
fn test_fixed_fail_closed_contract_shape() {
    let value = serde_json::to_value(fail_closed_contract("scan-1")).unwrap();
    assert_contract_shape(&value);
}

#[tokio::test]
async fn test_contract_round_trips_through_strict_deserializer() {
    let engine = engine_from(&neutral_collectors(91.0));
    let contract = engine.evaluate(&target()).await;

    let json = serde_json::to_string(&contract).unwrap();
    let parsed: VerdictContract = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, contract);
}

#[tokio::test]
async fn test_honeypot_detail_stays_in_reasons_only() {
    let collectors = collectors_with(
        30.0,
        SignalField::HoneypotIndicators,
        Behavior::Return(token_verdict::models::SignalFragment::HoneypotIndicators(vec![
            "mint authority is still active".to_string(),
        ])),
    );
    let value = evaluate_json(&collectors).await;

    assert_contract_shape(&value);
    assert_eq!(value["verdict"], "ACTION_REQUIRED");
    assert_eq!(
        value["reasons"][0],
        "Honeypot indicators detected: mint authority is still active"
    );
}
