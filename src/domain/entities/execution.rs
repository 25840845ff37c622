use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one confirmed execution. Keyed by transaction hash;
/// written exactly once and never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub tx_hash: B256,
    pub plan_id: String,
    /// Amount actually executed per the on-chain event, which is
    /// authoritative over the plan's nominal amount.
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    pub token_out: Address,
    /// False when the receipt carried no decodable execution event and the
    /// amounts above are fallback zeros.
    pub decoded: bool,
    pub executed_at: DateTime<Utc>,
}
