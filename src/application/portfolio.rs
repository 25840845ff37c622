use crate::domain::error::EngineError;
use crate::domain::ports::plan_store::{ExecutionFilter, PlanStore};
use crate::domain::ports::portfolio_store::PortfolioStore;
use crate::domain::ports::token_store::TokenStore;
use crate::domain::values::portfolio::{
    current_value, invested_value, percent_change, PortfolioSnapshot,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct SnapshotReport {
    pub users: usize,
    pub updated: usize,
    pub errors: usize,
}

/// Upserts one valuation row per user per day, summing each active plan's
/// execution history at current feed prices.
pub struct PortfolioUseCase {
    plans: Arc<dyn PlanStore>,
    tokens: Arc<dyn TokenStore>,
    portfolios: Arc<dyn PortfolioStore>,
    funding_decimals: u8,
}

impl PortfolioUseCase {
    pub fn new(
        plans: Arc<dyn PlanStore>,
        tokens: Arc<dyn TokenStore>,
        portfolios: Arc<dyn PortfolioStore>,
        funding_decimals: u8,
    ) -> Self {
        Self {
            plans,
            tokens,
            portfolios,
            funding_decimals,
        }
    }

    pub async fn execute(&self, date: NaiveDate) -> Result<SnapshotReport, EngineError> {
        let users = self.portfolios.list_users()?;
        let active_plans = self.plans.list_active_plans()?;
        tracing::info!(users = users.len(), plans = active_plans.len(), %date, "computing portfolio snapshots");

        let mut updated = 0;
        let mut errors = 0;
        for user in &users {
            match self.snapshot_user(user.wallet, date, &active_plans) {
                Ok(true) => updated += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(wallet = %user.wallet, error = %e, "portfolio snapshot failed");
                    errors += 1;
                }
            }
        }

        Ok(SnapshotReport {
            users: users.len(),
            updated,
            errors,
        })
    }

    /// Returns false when the user has no plans with execution history.
    fn snapshot_user(
        &self,
        wallet: alloy_primitives::Address,
        date: NaiveDate,
        active_plans: &[crate::domain::entities::plan::Plan],
    ) -> Result<bool, EngineError> {
        let mut invested = 0.0;
        let mut value = 0.0;
        let mut any = false;

        for plan in active_plans.iter().filter(|p| p.user_wallet == wallet) {
            let executions = self.plans.list_executions(&ExecutionFilter {
                plan_id: Some(plan.id.clone()),
                limit: None,
            })?;
            if executions.is_empty() {
                continue;
            }

            // Prefer the fresh token row; the joined copy on the plan may
            // predate the latest price refresh.
            let Some(token) = self.tokens.get_token(plan.token_out.address)? else {
                tracing::warn!(plan_id = %plan.id, token = %plan.token_out.address, "token missing for plan, excluded from valuation");
                continue;
            };

            invested += invested_value(&executions, self.funding_decimals);
            value += current_value(&executions, &token);
            any = true;
        }

        if !any {
            return Ok(false);
        }

        self.portfolios.upsert_daily_snapshot(&PortfolioSnapshot {
            user_wallet: wallet,
            date,
            invested_usd: invested,
            current_value_usd: value,
            percent_change: percent_change(invested, value),
        })?;
        Ok(true)
    }
}
