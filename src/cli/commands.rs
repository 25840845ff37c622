use crate::domain::entities::plan::{Authorization, Plan};
use crate::domain::error::EngineError;
use crate::DcaEngine;
use alloy_primitives::{Address, U256};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "autodca", about = "Scheduled DCA plan executor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh token prices, then execute one batch pass over all active plans
    Run {
        /// Skip the price refresh step
        #[arg(long)]
        skip_prices: bool,
    },
    /// Refresh token market data from the price feed
    Prices,
    /// Compute and upsert today's portfolio snapshots
    Portfolio {
        /// Date to snapshot (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List active plans
    Plans,
    /// List execution history
    History {
        /// Filter to one plan
        #[arg(long)]
        plan: Option<String>,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Register a plan
    PlanAdd {
        /// JSON with id, user_wallet, recipient, token_out, amount_in,
        /// frequency, and for the ledger variant plan_id + approval_amount
        json: String,
    },
    /// Register a token
    TokenAdd {
        /// JSON with address, symbol, decimals, is_wrapped, fee_tier
        json: String,
    },
    /// Register a user
    UserAdd {
        /// JSON with wallet, fid
        json: String,
    },
}

/// Build a plan from the `plan-add` JSON payload. The destination token
/// must already be registered; a `plan_id` field selects the ledger
/// variant.
pub fn parse_plan(engine: &DcaEngine, json: &str) -> Result<Plan, EngineError> {
    let data: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| EngineError::Parse(format!("plan json: {e}")))?;

    let field = |name: &str| -> Result<&str, EngineError> {
        data[name]
            .as_str()
            .ok_or_else(|| EngineError::Parse(format!("Missing required field: {name}")))
    };

    let token_address: Address = field("token_out")?
        .parse()
        .map_err(|e| EngineError::Parse(format!("token_out: {e}")))?;
    let token = engine
        .get_token(token_address)?
        .ok_or_else(|| EngineError::NotFound(format!("token {token_address}; add it first")))?;

    let authorization = match data.get("plan_id") {
        Some(plan_id) => Authorization::Ledger {
            plan_id: plan_id
                .as_u64()
                .ok_or_else(|| EngineError::Parse("plan_id must be an integer".into()))?,
            approval_amount: data["approval_amount"]
                .as_str()
                .unwrap_or("0")
                .parse::<U256>()
                .map_err(|e| EngineError::Parse(format!("approval_amount: {e}")))?,
        },
        None => Authorization::OnChain,
    };

    Ok(Plan::new(
        field("id")?,
        field("user_wallet")?
            .parse::<Address>()
            .map_err(|e| EngineError::Parse(format!("user_wallet: {e}")))?,
        field("recipient")?
            .parse::<Address>()
            .map_err(|e| EngineError::Parse(format!("recipient: {e}")))?,
        token,
        field("amount_in")?
            .parse::<U256>()
            .map_err(|e| EngineError::Parse(format!("amount_in: {e}")))?,
        data["frequency"]
            .as_i64()
            .ok_or_else(|| EngineError::Parse("Missing required field: frequency".into()))?,
        authorization,
    ))
}
