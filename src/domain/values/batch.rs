//! Per-plan outcomes and the aggregated batch report.

use alloy_primitives::{B256, U256};
use serde::Serialize;

/// Why a plan was left untouched this pass. Skips are always safe to
/// retry: no state was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NotDue { remaining_secs: i64 },
    InsufficientAllowance { required: U256, available: U256 },
    AllowanceCheckFailed { error: String },
}

/// Terminal outcome of one plan within one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    Executed {
        tx_hash: B256,
        amount_out: U256,
        decoded: bool,
    },
    Skipped(SkipReason),
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub plan_id: String,
    #[serde(flatten)]
    pub outcome: PlanOutcome,
}

/// Result of one orchestrator pass. `succeeded + skipped + failed`
/// always equals `processed`.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<PlanResult>,
}

impl BatchReport {
    pub fn record(&mut self, plan_id: &str, outcome: PlanOutcome) {
        self.processed += 1;
        match &outcome {
            PlanOutcome::Executed { .. } => self.succeeded += 1,
            PlanOutcome::Skipped(_) => self.skipped += 1,
            PlanOutcome::Failed { .. } => self.failed += 1,
        }
        self.results.push(PlanResult {
            plan_id: plan_id.to_string(),
            outcome,
        });
    }

    pub fn outcome_for(&self, plan_id: &str) -> Option<&PlanOutcome> {
        self.results
            .iter()
            .find(|r| r.plan_id == plan_id)
            .map(|r| &r.outcome)
    }
}
