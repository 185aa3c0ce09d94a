// Verdict Deriver - ordered, data-driven rule table over the internal record
use crate::config::RuleSettings;
use crate::models::{Confidence, InternalSignalRecord, SignalCoverage, SignalField, Verdict};

pub const DEFAULT_REASON: &str = "No elevated risk signals detected";

/// Independent dimension a rule belongs to. Only the first matching rule of an axis fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleAxis {
    Ownership,
    Liquidity,
    Honeypot,
    Anomaly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleCondition {
    /// Strictly greater than the given percentage.
    OwnershipAbove(f64),
    LiquidityFlagged,
    HoneypotIndicatorsPresent,
    AnomaliesPresent,
}

impl RuleCondition {
    pub fn axis(&self) -> RuleAxis {
        match self {
            RuleCondition::OwnershipAbove(_) => RuleAxis::Ownership,
            RuleCondition::LiquidityFlagged => RuleAxis::Liquidity,
            RuleCondition::HoneypotIndicatorsPresent => RuleAxis::Honeypot,
            RuleCondition::AnomaliesPresent => RuleAxis::Anomaly,
        }
    }

    /// The internal field this condition reads.
    pub fn field(&self) -> SignalField {
        match self {
            RuleCondition::OwnershipAbove(_) => SignalField::OwnershipPercent,
            RuleCondition::LiquidityFlagged => SignalField::LiquidityFlag,
            RuleCondition::HoneypotIndicatorsPresent => SignalField::HoneypotIndicators,
            RuleCondition::AnomaliesPresent => SignalField::AnomalyCount,
        }
    }

    /// Reason used when the rule fired on a fallback value rather than a measured one.
    pub fn unmeasured_reason(&self) -> &'static str {
        match self {
            RuleCondition::OwnershipAbove(_) => "Ownership concentration could not be determined",
            RuleCondition::LiquidityFlagged => "Liquidity could not be determined",
            RuleCondition::HoneypotIndicatorsPresent => "Honeypot indicators could not be determined",
            RuleCondition::AnomaliesPresent => "On-chain anomalies could not be determined",
        }
    }

    pub fn matches(&self, record: &InternalSignalRecord) -> bool {
        match self {
            RuleCondition::OwnershipAbove(threshold) => record.ownership_percent > *threshold,
            RuleCondition::LiquidityFlagged => record.liquidity_flag,
            RuleCondition::HoneypotIndicatorsPresent => !record.honeypot_indicators.is_empty(),
            RuleCondition::AnomaliesPresent => record.anomaly_count > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerdictRule {
    pub condition: RuleCondition,
    pub verdict: Verdict,
    pub reason: String,
}

impl VerdictRule {
    pub fn new(condition: RuleCondition, verdict: Verdict, reason: impl Into<String>) -> Self {
        Self {
            condition,
            verdict,
            reason: reason.into(),
        }
    }

    pub fn axis(&self) -> RuleAxis {
        self.condition.axis()
    }

    /// Reason text for a triggered rule. List-valued and counted signals carry their detail.
    /// A rule that fired on a fallback says the signal could not be determined.
    pub fn render_reason(&self, record: &InternalSignalRecord) -> String {
        if !record.coverage.is_collected(self.condition.field()) {
            return self.condition.unmeasured_reason().to_string();
        }
        match self.condition {
            RuleCondition::HoneypotIndicatorsPresent => {
                format!("{}: {}", self.reason, record.honeypot_indicators.join(", "))
            }
            RuleCondition::AnomaliesPresent => {
                format!("{}: {}", self.reason, record.anomaly_count)
            }
            _ => self.reason.clone(),
        }
    }
}

/// Ordered rules. Within an axis, more severe rules are listed first.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<VerdictRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<VerdictRule>) -> Self {
        Self { rules }
    }

    pub fn from_settings(settings: &RuleSettings) -> Self {
        Self::new(vec![
            VerdictRule::new(
                RuleCondition::OwnershipAbove(settings.do_not_proceed_ownership_percent),
                Verdict::DoNotProceed,
                "Ownership concentration exceeds safe threshold",
            ),
            VerdictRule::new(
                RuleCondition::OwnershipAbove(settings.action_required_ownership_percent),
                Verdict::ActionRequired,
                "Ownership concentration is elevated",
            ),
            VerdictRule::new(
                RuleCondition::LiquidityFlagged,
                Verdict::ActionRequired,
                "Liquidity is insufficient or unfavorably locked",
            ),
            VerdictRule::new(
                RuleCondition::HoneypotIndicatorsPresent,
                Verdict::ActionRequired,
                "Honeypot indicators detected",
            ),
            VerdictRule::new(
                RuleCondition::AnomaliesPresent,
                Verdict::ActionRequired,
                "On-chain anomalies detected",
            ),
        ])
    }

    pub fn rules(&self) -> &[VerdictRule] {
        &self.rules
    }

    /// Rules that fire for the record, in table order, honouring first match per axis.
    pub fn triggered<'a>(&'a self, record: &InternalSignalRecord) -> Vec<&'a VerdictRule> {
        let mut fired_axes: Vec<RuleAxis> = Vec::new();
        let mut triggered = Vec::new();

        for rule in &self.rules {
            if fired_axes.contains(&rule.axis()) {
                continue;
            }
            if rule.condition.matches(record) {
                fired_axes.push(rule.axis());
                triggered.push(rule);
            }
        }

        triggered
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::from_settings(&RuleSettings::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub verdict: Verdict,
    pub confidence: Confidence,
    /// Most severe first, never empty.
    pub reasons: Vec<String>,
}

/// No fallbacks is HIGH, fallbacks on at most half the fields is MEDIUM, otherwise LOW.
pub fn confidence_for(coverage: &SignalCoverage) -> Confidence {
    let fallbacks = coverage.fallback_count();
    if fallbacks == 0 {
        Confidence::High
    } else if fallbacks * 2 <= SignalField::ALL.len() {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerdictDeriver {
    table: RuleTable,
}

impl VerdictDeriver {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn derive(&self, record: &InternalSignalRecord) -> Derivation {
        let mut triggered = self.table.triggered(record);
        // Stable, so table order is kept among rules of equal severity
        triggered.sort_by(|a, b| b.verdict.cmp(&a.verdict));

        let verdict = triggered
            .first()
            .map(|rule| rule.verdict)
            .unwrap_or(Verdict::SafeToProceed);

        let mut reasons: Vec<String> = triggered
            .iter()
            .map(|rule| rule.render_reason(record))
            .collect();
        if reasons.is_empty() {
            reasons.push(DEFAULT_REASON.to_string());
        }

        Derivation {
            verdict,
            confidence: confidence_for(&record.coverage),
            reasons,
        }
    }
}
