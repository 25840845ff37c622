//! Daily portfolio valuation.
//!
//! Pure arithmetic over committed execution records: invested capital is
//! the sum of executed amount-in minus fees in funding-asset units, current
//! value is the sum of amount-out scaled by token decimals at the current
//! feed price. Floating point is acceptable here — these figures are
//! reporting only and never flow back into on-chain amounts.

use crate::domain::entities::execution::Execution;
use crate::domain::entities::token::Token;
use alloy_primitives::{Address, U256};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One (wallet, date) row of the daily change table. Upserted, so re-runs
/// within a day overwrite rather than accumulate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub user_wallet: Address,
    pub date: NaiveDate,
    pub invested_usd: f64,
    pub current_value_usd: f64,
    pub percent_change: f64,
}

/// Scale a smallest-unit amount to a decimal figure.
pub fn scale_amount(amount: U256, decimals: u8) -> f64 {
    // Reporting-grade precision; amounts beyond f64 range degrade gracefully.
    let raw: f64 = amount.to_string().parse().unwrap_or(0.0);
    raw / 10f64.powi(decimals as i32)
}

/// Net invested capital for a set of executions, in funding-asset units.
pub fn invested_value(executions: &[Execution], funding_decimals: u8) -> f64 {
    executions
        .iter()
        .map(|e| {
            scale_amount(e.amount_in, funding_decimals) - scale_amount(e.fee_amount, funding_decimals)
        })
        .sum()
}

/// Current USD value of the tokens bought by a set of executions. Zero
/// when the feed has no price yet.
pub fn current_value(executions: &[Execution], token: &Token) -> f64 {
    let total: f64 = executions
        .iter()
        .map(|e| scale_amount(e.amount_out, token.decimals))
        .sum();
    total * token.price_usd().unwrap_or(0.0)
}

pub fn percent_change(invested: f64, current: f64) -> f64 {
    if invested > 0.0 {
        (current - invested) / invested * 100.0
    } else {
        0.0
    }
}
