// Verdict Engine - runs collectors concurrently and always returns a complete contract
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use futures::FutureExt;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::chain::{ChainDataSource, ChainSnapshot};
use crate::config::Settings;
use crate::engine::collectors::{standard_collectors, CollectorSettings};
use crate::engine::contract::{build_contract, fail_closed_contract, new_scan_id};
use crate::engine::merger::fallback_field_names;
use crate::engine::{
    CollectorOutcome, CollectorReport, EngineError, RuleTable, SignalCollector, SignalMerger,
    VerdictDeriver,
};
use crate::models::{SignalField, Target, VerdictContract};

/// Pipeline stages, logged as they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStage {
    Collecting,
    Merging,
    Deriving,
    Building,
    Done,
    FailClosedBuilding,
}

impl EvaluationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStage::Collecting => "COLLECTING",
            EvaluationStage::Merging => "MERGING",
            EvaluationStage::Deriving => "DERIVING",
            EvaluationStage::Building => "BUILDING",
            EvaluationStage::Done => "DONE",
            EvaluationStage::FailClosedBuilding => "FAIL_CLOSED_BUILDING",
        }
    }
}

impl fmt::Display for EvaluationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enter(stage: EvaluationStage) {
    debug!(stage = %stage, "Entering evaluation stage");
}

/// Where an evaluation's collectors come from.
enum CollectorSet {
    Fixed(Vec<Arc<dyn SignalCollector>>),
    /// Standard collectors rebuilt per evaluation over a fresh `ChainSnapshot`.
    Chain {
        source: Arc<dyn ChainDataSource>,
        settings: CollectorSettings,
    },
}

/// Main engine that fans out to collectors and derives the verdict.
///
/// Holds no per-evaluation state, so one instance can serve concurrent
/// requests behind an `Arc`.
pub struct VerdictEngine {
    collectors: CollectorSet,
    merger: SignalMerger,
    deriver: VerdictDeriver,
    collector_timeout: Duration,
}

impl VerdictEngine {
    pub fn new(collectors: Vec<Arc<dyn SignalCollector>>, settings: &Settings) -> Self {
        Self::with_collectors(CollectorSet::Fixed(collectors), settings)
    }

    /// Engine wired with the six standard collectors over one chain source.
    /// Each evaluation reads the chain through its own snapshot, so every
    /// distinct request is made once per scan.
    pub fn from_chain(source: Arc<dyn ChainDataSource>, settings: &Settings) -> Self {
        info!(
            source = source.source_name(),
            collectors = SignalField::ALL.len(),
            "Initialized verdict engine"
        );
        let collectors = CollectorSet::Chain {
            source,
            settings: CollectorSettings::from(settings),
        };
        Self::with_collectors(collectors, settings)
    }

    fn with_collectors(collectors: CollectorSet, settings: &Settings) -> Self {
        Self {
            collectors,
            merger: SignalMerger::new(settings.fallbacks.clone()),
            deriver: VerdictDeriver::new(RuleTable::from_settings(&settings.rules)),
            collector_timeout: settings.engine.collector_timeout(),
        }
    }

    pub fn collector_count(&self) -> usize {
        match &self.collectors {
            CollectorSet::Fixed(collectors) => collectors.len(),
            CollectorSet::Chain { .. } => SignalField::ALL.len(),
        }
    }

    pub fn collector_timeout(&self) -> Duration {
        self.collector_timeout
    }

    /// Evaluate one target. Never fails and never panics past this point.
    pub async fn evaluate(&self, target: &Target) -> VerdictContract {
        let scan_id = new_scan_id();
        let span = info_span!("evaluation", scan_id = %scan_id, target = %target);

        async {
            let started = Instant::now();
            let result = AssertUnwindSafe(self.run_pipeline(target, &scan_id))
                .catch_unwind()
                .await;

            match result {
                Ok(Ok(contract)) => {
                    info!(
                        verdict = %contract.verdict,
                        confidence = %contract.confidence,
                        reasons = contract.reasons.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Evaluation completed"
                    );
                    contract
                }
                Ok(Err(e)) => {
                    enter(EvaluationStage::FailClosedBuilding);
                    error!(error = %e, "Evaluation failed, returning fail-closed contract");
                    fail_closed_contract(&scan_id)
                }
                Err(_) => {
                    enter(EvaluationStage::FailClosedBuilding);
                    error!("Evaluation panicked, returning fail-closed contract");
                    fail_closed_contract(&scan_id)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run every collector concurrently and wait for all of them to settle.
    pub async fn collect(&self, target: &Target) -> Vec<CollectorReport> {
        let deadline = self.collector_timeout;
        let collectors = self.evaluation_collectors();
        join_all(
            collectors
                .iter()
                .map(|collector| run_collector(collector.as_ref(), target, deadline)),
        )
        .await
    }

    fn evaluation_collectors(&self) -> Vec<Arc<dyn SignalCollector>> {
        match &self.collectors {
            CollectorSet::Fixed(collectors) => collectors.clone(),
            CollectorSet::Chain { source, settings } => {
                let snapshot: Arc<dyn ChainDataSource> =
                    Arc::new(ChainSnapshot::new(source.clone()));
                standard_collectors(snapshot, settings)
            }
        }
    }

    async fn run_pipeline(
        &self,
        target: &Target,
        scan_id: &str,
    ) -> Result<VerdictContract, EngineError> {
        enter(EvaluationStage::Collecting);
        let reports = self.collect(target).await;

        let collected = reports.iter().filter(|r| r.outcome.is_collected()).count();
        if collected == 0 {
            return Err(EngineError::NoSignals {
                attempted: reports.len(),
            });
        }

        enter(EvaluationStage::Merging);
        let record = self.merger.merge(
            reports
                .into_iter()
                .filter_map(|report| match report.outcome {
                    CollectorOutcome::Collected(fragment) => Some(fragment),
                    _ => None,
                }),
        );
        if !record.coverage.is_complete() {
            warn!(
                fallback_fields = ?fallback_field_names(&record),
                "Using fallbacks for missing signals"
            );
        }

        enter(EvaluationStage::Deriving);
        let derivation = self.deriver.derive(&record);

        enter(EvaluationStage::Building);
        let contract = build_contract(derivation, &record, scan_id)?;

        enter(EvaluationStage::Done);
        Ok(contract)
    }
}

/// Run one collector under its deadline. Errors, panics and misrouted
/// fragments all settle as `Failed`.
async fn run_collector(
    collector: &dyn SignalCollector,
    target: &Target,
    deadline: Duration,
) -> CollectorReport {
    let started = Instant::now();
    let result = tokio::time::timeout(
        deadline,
        AssertUnwindSafe(collector.collect(target)).catch_unwind(),
    )
    .await;

    let outcome = match result {
        Err(_) => CollectorOutcome::TimedOut,
        Ok(Err(_)) => CollectorOutcome::Failed("collector panicked".to_string()),
        Ok(Ok(Err(e))) => CollectorOutcome::Failed(e.to_string()),
        Ok(Ok(Ok(fragment))) if fragment.field() != collector.field() => {
            CollectorOutcome::Failed(format!(
                "returned {} instead of {}",
                fragment.field(),
                collector.field()
            ))
        }
        Ok(Ok(Ok(fragment))) => CollectorOutcome::Collected(fragment),
    };

    let elapsed = started.elapsed();
    match &outcome {
        CollectorOutcome::Collected(_) => debug!(
            collector = collector.name(),
            outcome = outcome.label(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Collector settled"
        ),
        CollectorOutcome::TimedOut => warn!(
            collector = collector.name(),
            outcome = outcome.label(),
            timeout_ms = deadline.as_millis() as u64,
            "Collector timed out"
        ),
        CollectorOutcome::Failed(reason) => warn!(
            collector = collector.name(),
            outcome = outcome.label(),
            reason = %reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "Collector failed"
        ),
    }

    CollectorReport {
        collector: collector.name(),
        field: collector.field(),
        outcome,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(EvaluationStage::Collecting.to_string(), "COLLECTING");
        assert_eq!(EvaluationStage::FailClosedBuilding.to_string(), "FAIL_CLOSED_BUILDING");
    }

    #[tokio::test]
    async fn test_engine_without_collectors_fails_closed() {
        let engine = VerdictEngine::new(Vec::new(), &Settings::default());
        let target = Target::parse("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();

        let contract = engine.evaluate(&target).await;
        assert_eq!(contract.reasons, vec![crate::engine::FAIL_CLOSED_REASON]);
        assert!(contract.signals.is_empty());
    }
}
