// Signal collector seam and per-collector outcome types
use std::time::Duration;

use async_trait::async_trait;

use crate::engine::CollectorError;
use crate::models::{SignalField, SignalFragment, Target};

/// Core trait that every signal collector implements.
///
/// A collector owns exactly one internal field and must only ever return a
/// fragment for that field. Faults are returned, not panicked; the
/// orchestrator turns them into [`CollectorOutcome::Failed`].
#[async_trait]
pub trait SignalCollector: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// The field this collector is authoritative for.
    fn field(&self) -> SignalField;

    async fn collect(&self, target: &Target) -> Result<SignalFragment, CollectorError>;
}

/// How one collector settled.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectorOutcome {
    Collected(SignalFragment),
    TimedOut,
    Failed(String),
}

impl CollectorOutcome {
    pub fn is_collected(&self) -> bool {
        matches!(self, CollectorOutcome::Collected(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            CollectorOutcome::Collected(_) => "collected",
            CollectorOutcome::TimedOut => "timed_out",
            CollectorOutcome::Failed(_) => "failed",
        }
    }

    pub fn fragment(&self) -> Option<&SignalFragment> {
        match self {
            CollectorOutcome::Collected(fragment) => Some(fragment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectorReport {
    pub collector: &'static str,
    pub field: SignalField,
    pub outcome: CollectorOutcome,
    pub elapsed: Duration,
}
