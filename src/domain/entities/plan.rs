use crate::domain::entities::token::Token;
use alloy_primitives::{b256, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Topic hash of `SwapExecuted(address indexed user, address recipient,
/// address toToken, uint256 amountIn, uint256 indexed amountOut, uint256 feeAmount)`.
pub const SWAP_EXECUTED_TOPIC: B256 =
    b256!("ad671c9d50262b75ba17bdf7e330ae0d7da971800b2526584a85f83d23296b15");

/// Topic hash of `DCAPlanExecuted(address tokenOut, uint256 amountIn,
/// uint256 amountOut, uint256 feeAmount)` — all parameters non-indexed.
pub const DCA_PLAN_EXECUTED_TOPIC: B256 =
    b256!("5bb85ced8e36830fbb0c473b21ff268ddd67f189a58d75e3c1053f5b13a2469d");

/// How a plan's spending authorization is established, and with it which
/// executor entry point and event shape the plan uses. The two shapes come
/// from two incompatible executor contracts; everything variant-specific
/// hangs off this enum so the rest of the engine never branches ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Authorization {
    /// Allowance is read live from the funding token's allowance mapping.
    /// Executes through the aggregator-calldata entry points.
    OnChain,
    /// Remaining authorization is tracked in the local store and decremented
    /// after each execution. Executes through the pool-fee entry point
    /// keyed by the contract-side numeric plan id.
    Ledger { plan_id: u64, approval_amount: U256 },
}

impl Authorization {
    /// The execution-event topic this variant's confirmations carry.
    pub fn event_topic(&self) -> B256 {
        match self {
            Authorization::OnChain => SWAP_EXECUTED_TOPIC,
            Authorization::Ledger { .. } => DCA_PLAN_EXECUTED_TOPIC,
        }
    }

    /// Whether execution needs aggregator calldata fetched up front.
    pub fn needs_calldata(&self) -> bool {
        matches!(self, Authorization::OnChain)
    }

    pub fn is_ledger(&self) -> bool {
        matches!(self, Authorization::Ledger { .. })
    }
}

/// A recurring purchase instruction: convert `amount_in` of the funding
/// asset into `token_out` at most once per `frequency` seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Store key: the on-chain plan hash, or a stringified numeric id for
    /// the ledger variant.
    pub id: String,
    pub user_wallet: Address,
    pub recipient: Address,
    pub token_out: Token,
    /// Smallest-unit amount of the funding asset spent per execution.
    pub amount_in: U256,
    /// Minimum seconds between executions. Always >= 1.
    pub frequency: i64,
    /// Unix seconds of the last committed execution. Advances only after a
    /// submitted and decoded execution.
    pub last_executed_at: i64,
    pub active: bool,
    pub authorization: Authorization,
}

impl Plan {
    pub fn new(
        id: impl Into<String>,
        user_wallet: Address,
        recipient: Address,
        token_out: Token,
        amount_in: U256,
        frequency: i64,
        authorization: Authorization,
    ) -> Self {
        Self {
            id: id.into(),
            user_wallet,
            recipient,
            token_out,
            amount_in,
            frequency,
            last_executed_at: 0,
            active: true,
            authorization,
        }
    }

    /// Remaining locally tracked approval, for the ledger variant.
    pub fn approval_amount(&self) -> Option<U256> {
        match &self.authorization {
            Authorization::Ledger { approval_amount, .. } => Some(*approval_amount),
            Authorization::OnChain => None,
        }
    }

    /// Approval left after spending the nominal amount once. Clamped at
    /// zero — the ledger never goes negative.
    pub fn approval_after_spend(&self) -> Option<U256> {
        self.approval_amount()
            .map(|a| a.saturating_sub(self.amount_in))
    }
}
