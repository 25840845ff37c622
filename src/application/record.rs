use crate::domain::entities::execution::Execution;
use crate::domain::entities::plan::Plan;
use crate::domain::error::EngineError;
use crate::domain::ports::chain_client::Receipt;
use crate::domain::ports::plan_store::PlanStore;
use crate::domain::values::swap_event::DecodedAmounts;
use chrono::Utc;
use std::sync::Arc;

/// Commits a confirmed execution: advances the plan's schedule state, then
/// inserts the immutable execution record. The insert is keyed by
/// transaction hash and idempotent, so a retried commit after a partial
/// failure cannot duplicate history.
pub struct ExecutionRecorder {
    store: Arc<dyn PlanStore>,
}

impl ExecutionRecorder {
    pub fn new(store: Arc<dyn PlanStore>) -> Self {
        Self { store }
    }

    pub fn commit(
        &self,
        plan: &Plan,
        receipt: &Receipt,
        decoded: &DecodedAmounts,
        now: i64,
    ) -> Result<Execution, EngineError> {
        self.store
            .mark_executed(&plan.id, now, plan.approval_after_spend())?;

        let execution = Execution {
            tx_hash: receipt.tx_hash,
            plan_id: plan.id.clone(),
            // The event figure is authoritative; when decoding failed the
            // nominal plan amount is the best available record of what was
            // spent, while out/fee stay at the fallback zeros.
            amount_in: if decoded.decoded {
                decoded.amount_in
            } else {
                plan.amount_in
            },
            amount_out: decoded.amount_out,
            fee_amount: decoded.fee_amount,
            token_out: plan.token_out.address,
            decoded: decoded.decoded,
            executed_at: Utc::now(),
        };

        let inserted = self.store.insert_execution(&execution)?;
        if !inserted {
            tracing::warn!(plan_id = %plan.id, tx_hash = %execution.tx_hash, "execution record already present, skipping insert");
        }
        Ok(execution)
    }
}
