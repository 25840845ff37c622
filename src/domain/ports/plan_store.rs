use crate::domain::entities::execution::Execution;
use crate::domain::entities::plan::Plan;
use crate::domain::error::EngineError;
use alloy_primitives::U256;

#[derive(Debug, Clone, Default)]
pub struct ExecutionFilter {
    pub plan_id: Option<String>,
    pub limit: Option<usize>,
}

/// Durable plan and execution state. The engine holds nothing across
/// passes; every pass re-reads active plans fresh from here.
pub trait PlanStore: Send + Sync {
    /// Active plans with their destination tokens joined, in the store's
    /// natural (insertion) order.
    fn list_active_plans(&self) -> Result<Vec<Plan>, EngineError>;

    fn get_plan(&self, id: &str) -> Result<Option<Plan>, EngineError>;

    fn add_plan(&self, plan: &Plan) -> Result<(), EngineError>;

    /// Advance `last_executed_at`; for the ledger variant, also write the
    /// recomputed remaining approval.
    fn mark_executed(
        &self,
        plan_id: &str,
        executed_at: i64,
        new_approval: Option<U256>,
    ) -> Result<(), EngineError>;

    /// Force the ledger variant's approval to zero so the next pass skips
    /// cheaply instead of re-attempting a doomed submission.
    fn reset_approval(&self, plan_id: &str) -> Result<(), EngineError>;

    /// Insert an execution record keyed by transaction hash. Returns false
    /// when a record with that hash already exists (retried commit).
    fn insert_execution(&self, execution: &Execution) -> Result<bool, EngineError>;

    fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, EngineError>;
}
