// Verdict engine: collectors, merger, deriver, contract builder and orchestrator
pub mod errors;
pub mod traits;
pub mod collectors;
pub mod merger;
pub mod deriver;
pub mod contract;
pub mod orchestrator;

pub use errors::*;
pub use traits::*;
pub use merger::SignalMerger;
pub use deriver::{
    confidence_for, Derivation, RuleAxis, RuleCondition, RuleTable, VerdictDeriver, VerdictRule,
    DEFAULT_REASON,
};
pub use contract::{fail_closed_contract, new_scan_id, FAIL_CLOSED_REASON};
pub use orchestrator::{EvaluationStage, VerdictEngine};
