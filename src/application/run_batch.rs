use crate::application::authorize::{AuthDecision, AuthorizationGuard};
use crate::application::record::ExecutionRecorder;
use crate::application::submit::TransactionSubmitter;
use crate::domain::entities::plan::Plan;
use crate::domain::error::{ChainError, EngineError};
use crate::domain::ports::notifier::{Notifier, NotifyReason};
use crate::domain::ports::plan_store::PlanStore;
use crate::domain::values::batch::{BatchReport, PlanOutcome, SkipReason};
use crate::domain::values::schedule;
use crate::domain::values::swap_event;
use std::sync::Arc;

/// One pass over all active plans, strictly sequential, in the store's
/// natural return order. Every per-plan error is caught at the plan
/// boundary and converted into an outcome; only a store failure while
/// listing plans aborts the pass.
pub struct RunBatchUseCase {
    store: Arc<dyn PlanStore>,
    guard: AuthorizationGuard,
    submitter: TransactionSubmitter,
    recorder: ExecutionRecorder,
    notifier: Arc<dyn Notifier>,
    /// Executor contract address; the decoder filters receipt logs to this
    /// emitter.
    executor: alloy_primitives::Address,
}

impl RunBatchUseCase {
    pub fn new(
        store: Arc<dyn PlanStore>,
        guard: AuthorizationGuard,
        submitter: TransactionSubmitter,
        recorder: ExecutionRecorder,
        notifier: Arc<dyn Notifier>,
        executor: alloy_primitives::Address,
    ) -> Self {
        Self {
            store,
            guard,
            submitter,
            recorder,
            notifier,
            executor,
        }
    }

    pub async fn execute(&self, now: i64) -> Result<BatchReport, EngineError> {
        let plans = self.store.list_active_plans()?;
        tracing::info!(count = plans.len(), now, "starting batch pass");

        let mut report = BatchReport::default();
        for plan in &plans {
            let outcome = self.process_plan(plan, now).await;
            match &outcome {
                PlanOutcome::Executed { tx_hash, .. } => {
                    tracing::info!(plan_id = %plan.id, %tx_hash, "plan executed")
                }
                PlanOutcome::Skipped(reason) => {
                    tracing::debug!(plan_id = %plan.id, ?reason, "plan skipped")
                }
                PlanOutcome::Failed { error } => {
                    tracing::error!(plan_id = %plan.id, error, "plan failed")
                }
            }
            report.record(&plan.id, outcome);
        }

        tracing::info!(
            processed = report.processed,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            "batch pass complete"
        );
        Ok(report)
    }

    async fn process_plan(&self, plan: &Plan, now: i64) -> PlanOutcome {
        if !schedule::is_due(plan, now) {
            return PlanOutcome::Skipped(SkipReason::NotDue {
                remaining_secs: schedule::remaining_secs(plan, now),
            });
        }

        match self.guard.authorize(plan).await {
            AuthDecision::Authorized => {}
            AuthDecision::Insufficient { required, available } => {
                self.notify(plan, NotifyReason::AllowanceTooLow).await;
                return PlanOutcome::Skipped(SkipReason::InsufficientAllowance {
                    required,
                    available,
                });
            }
            AuthDecision::CheckFailed(error) => {
                return PlanOutcome::Skipped(SkipReason::AllowanceCheckFailed { error });
            }
        }

        let receipt = match self.submitter.submit(plan).await {
            Ok(receipt) => receipt,
            Err(e) => {
                if matches!(e, EngineError::Chain(ChainError::AllowanceExceeded)) {
                    self.remediate_allowance(plan).await;
                }
                return PlanOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let decoded = swap_event::decode_receipt(&receipt, self.executor, plan);

        match self.recorder.commit(plan, &receipt, &decoded, now) {
            Ok(execution) => PlanOutcome::Executed {
                tx_hash: execution.tx_hash,
                amount_out: execution.amount_out,
                decoded: execution.decoded,
            },
            // Confirmed on-chain but not fully recorded: the plan will look
            // due again next pass and the tx-hash-keyed insert reconciles
            // whichever write is missing.
            Err(e) => PlanOutcome::Failed {
                error: format!("confirmed but not recorded: {e}"),
            },
        }
    }

    /// An allowance revert after a passing pre-flight check means the local
    /// ledger overstates what the user authorized. Zero it so the next pass
    /// classifies the plan as insufficient without a wasted submission.
    async fn remediate_allowance(&self, plan: &Plan) {
        if plan.authorization.is_ledger() {
            if let Err(e) = self.store.reset_approval(&plan.id) {
                tracing::error!(plan_id = %plan.id, error = %e, "failed to reset approval ledger");
            }
        }
        self.notify(plan, NotifyReason::AllowanceRevoked).await;
    }

    async fn notify(&self, plan: &Plan, reason: NotifyReason) {
        if let Err(e) = self.notifier.notify(&plan.id, plan.user_wallet, reason).await {
            tracing::warn!(plan_id = %plan.id, error = e, "notification failed");
        }
    }
}
