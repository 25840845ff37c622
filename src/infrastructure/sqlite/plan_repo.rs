use crate::domain::entities::execution::Execution;
use crate::domain::entities::plan::{Authorization, Plan};
use crate::domain::error::EngineError;
use crate::domain::ports::plan_store::{ExecutionFilter, PlanStore};
use crate::infrastructure::sqlite::{parse_address, parse_b256, parse_u256, token_from_row};
use alloy_primitives::U256;
use chrono::DateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// Plan columns 0..9, then the token block.
const PLAN_SELECT: &str = "SELECT p.id, p.user_wallet, p.recipient, p.amount_in, p.frequency, \
    p.last_executed_at, p.active, p.auth_kind, p.ledger_plan_id, p.approval_amount, \
    t.address, t.symbol, t.decimals, t.is_wrapped, t.fee_tier, t.price_usd, t.fdv_usd, \
    t.market_cap_usd, t.volume_24h_usd, t.total_supply, t.market_updated_at \
    FROM plans p JOIN tokens t ON t.address = p.token_out";

pub struct SqlitePlanRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePlanRepo {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn row_to_plan(row: &Row) -> Result<Plan, rusqlite::Error> {
        let user_wallet: String = row.get(1)?;
        let recipient: String = row.get(2)?;
        let amount_in: String = row.get(3)?;
        let auth_kind: String = row.get(7)?;

        let authorization = match auth_kind.as_str() {
            "ledger" => {
                let plan_id: i64 = row.get(8)?;
                let approval: Option<String> = row.get(9)?;
                Authorization::Ledger {
                    plan_id: plan_id as u64,
                    approval_amount: approval
                        .as_deref()
                        .map(|s| parse_u256(9, s))
                        .transpose()?
                        .unwrap_or(U256::ZERO),
                }
            }
            _ => Authorization::OnChain,
        };

        Ok(Plan {
            id: row.get(0)?,
            user_wallet: parse_address(1, &user_wallet)?,
            recipient: parse_address(2, &recipient)?,
            token_out: token_from_row(row, 10)?,
            amount_in: parse_u256(3, &amount_in)?,
            frequency: row.get(4)?,
            last_executed_at: row.get(5)?,
            active: row.get(6)?,
            authorization,
        })
    }

    fn row_to_execution(row: &Row) -> Result<Execution, rusqlite::Error> {
        let tx_hash: String = row.get(0)?;
        let amount_in: String = row.get(2)?;
        let amount_out: String = row.get(3)?;
        let fee_amount: String = row.get(4)?;
        let token_out: String = row.get(5)?;
        let executed_at: String = row.get(7)?;

        Ok(Execution {
            tx_hash: parse_b256(0, &tx_hash)?,
            plan_id: row.get(1)?,
            amount_in: parse_u256(2, &amount_in)?,
            amount_out: parse_u256(3, &amount_out)?,
            fee_amount: parse_u256(4, &fee_amount)?,
            token_out: parse_address(5, &token_out)?,
            decoded: row.get(6)?,
            executed_at: DateTime::parse_from_rfc3339(&executed_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
        })
    }
}

impl PlanStore for SqlitePlanRepo {
    fn list_active_plans(&self) -> Result<Vec<Plan>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let sql = format!("{PLAN_SELECT} WHERE p.active = 1 ORDER BY p.rowid");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let plans = stmt
            .query_map([], Self::row_to_plan)
            .map_err(|e| EngineError::Store(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::Store(format!("Failed to read plan: {e}")))?;
        Ok(plans)
    }

    fn get_plan(&self, id: &str) -> Result<Option<Plan>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let sql = format!("{PLAN_SELECT} WHERE p.id = ?1");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![id], Self::row_to_plan)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        rows.next()
            .transpose()
            .map_err(|e| EngineError::Store(format!("Failed to read plan: {e}")))
    }

    fn add_plan(&self, plan: &Plan) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let (auth_kind, ledger_plan_id, approval_amount) = match &plan.authorization {
            Authorization::OnChain => ("onchain", None, None),
            Authorization::Ledger {
                plan_id,
                approval_amount,
            } => (
                "ledger",
                Some(*plan_id as i64),
                Some(approval_amount.to_string()),
            ),
        };
        conn.execute(
            "INSERT INTO plans (id, user_wallet, recipient, token_out, amount_in, frequency, \
             last_executed_at, active, auth_kind, ledger_plan_id, approval_amount, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                plan.id,
                plan.user_wallet.to_string(),
                plan.recipient.to_string(),
                plan.token_out.address.to_string(),
                plan.amount_in.to_string(),
                plan.frequency,
                plan.last_executed_at,
                plan.active,
                auth_kind,
                ledger_plan_id,
                approval_amount,
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| EngineError::Store(format!("Failed to add plan: {e}")))?;
        Ok(())
    }

    fn mark_executed(
        &self,
        plan_id: &str,
        executed_at: i64,
        new_approval: Option<U256>,
    ) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let rows = conn
            .execute(
                "UPDATE plans SET last_executed_at = ?1, \
                 approval_amount = COALESCE(?2, approval_amount) WHERE id = ?3",
                params![executed_at, new_approval.map(|a| a.to_string()), plan_id],
            )
            .map_err(|e| EngineError::Store(format!("Failed to mark executed: {e}")))?;
        if rows == 0 {
            return Err(EngineError::NotFound(format!("plan {plan_id}")));
        }
        Ok(())
    }

    fn reset_approval(&self, plan_id: &str) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        conn.execute(
            "UPDATE plans SET approval_amount = '0' WHERE id = ?1 AND auth_kind = 'ledger'",
            params![plan_id],
        )
        .map_err(|e| EngineError::Store(format!("Failed to reset approval: {e}")))?;
        Ok(())
    }

    fn insert_execution(&self, execution: &Execution) -> Result<bool, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let rows = conn
            .execute(
                "INSERT OR IGNORE INTO executions \
                 (tx_hash, plan_id, amount_in, amount_out, fee_amount, token_out, decoded, executed_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    execution.tx_hash.to_string(),
                    execution.plan_id,
                    execution.amount_in.to_string(),
                    execution.amount_out.to_string(),
                    execution.fee_amount.to_string(),
                    execution.token_out.to_string(),
                    execution.decoded,
                    execution.executed_at.to_rfc3339(),
                ],
            )
            .map_err(|e| EngineError::Store(format!("Failed to insert execution: {e}")))?;
        Ok(rows > 0)
    }

    fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;

        let mut sql = String::from(
            "SELECT tx_hash, plan_id, amount_in, amount_out, fee_amount, token_out, decoded, executed_at \
             FROM executions",
        );
        if filter.plan_id.is_some() {
            sql.push_str(" WHERE plan_id = ?1");
        }
        sql.push_str(" ORDER BY rowid DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        let rows = match &filter.plan_id {
            Some(plan_id) => stmt
                .query_map(params![plan_id], Self::row_to_execution)
                .map_err(|e| EngineError::Store(e.to_string()))?
                .collect::<Result<Vec<_>, _>>(),
            None => stmt
                .query_map([], Self::row_to_execution)
                .map_err(|e| EngineError::Store(e.to_string()))?
                .collect::<Result<Vec<_>, _>>(),
        };
        rows.map_err(|e| EngineError::Store(format!("Failed to read execution: {e}")))
    }
}
