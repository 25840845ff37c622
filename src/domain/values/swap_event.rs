//! Execution-event decoding.
//!
//! Confirmed receipts carry the executed amounts in one of two event
//! shapes, selected by the plan variant:
//!
//! - `SwapExecuted(address indexed user, address recipient, address toToken,
//!   uint256 amountIn, uint256 indexed amountOut, uint256 feeAmount)` —
//!   the aggregator-swap contract. The fee field is not reliably emitted,
//!   so the fee is derived instead (see [`derived_fee`]).
//! - `DCAPlanExecuted(address tokenOut, uint256 amountIn, uint256 amountOut,
//!   uint256 feeAmount)` — the pool-fee contract, all non-indexed.
//!
//! Decoding never fails: a missing event or truncated data payload yields
//! zero amounts with `decoded: false` so the execution record is still
//! written and the plan never silently disappears from history.

use crate::domain::entities::plan::{Authorization, Plan};
use crate::domain::ports::chain_client::{EventLog, Receipt};
use crate::domain::values::abi;
use alloy_primitives::{Address, U256};
use serde::Serialize;

/// Amounts extracted from a confirmation receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedAmounts {
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    /// False when the fallback zeros are in use.
    pub decoded: bool,
}

impl DecodedAmounts {
    fn fallback() -> Self {
        Self {
            amount_in: U256::ZERO,
            amount_out: U256::ZERO,
            fee_amount: U256::ZERO,
            decoded: false,
        }
    }
}

/// Fee charged by the aggregator-swap contract path, which does not emit
/// it: 3% of the executed amount-in, rounded toward zero. Single source of
/// truth — must track the contract's actual fee schedule.
pub fn derived_fee(amount_in: U256) -> U256 {
    amount_in * U256::from(3) / U256::from(100)
}

/// Extract executed amounts for `plan` from `receipt`. Filters logs to
/// those emitted by `executor` whose first topic matches the plan
/// variant's event signature.
pub fn decode_receipt(receipt: &Receipt, executor: Address, plan: &Plan) -> DecodedAmounts {
    let topic = plan.authorization.event_topic();
    let log = receipt
        .logs
        .iter()
        .find(|log| log.address == executor && log.topics.first() == Some(&topic));

    let Some(log) = log else {
        tracing::warn!(plan_id = %plan.id, tx_hash = %receipt.tx_hash, "no execution event in receipt, recording fallback amounts");
        return DecodedAmounts::fallback();
    };

    let decoded = match plan.authorization {
        Authorization::OnChain => decode_swap_executed(log),
        Authorization::Ledger { .. } => decode_plan_executed(log),
    };

    decoded.unwrap_or_else(|| {
        tracing::warn!(plan_id = %plan.id, tx_hash = %receipt.tx_hash, data_len = log.data.len(), "malformed execution event data, recording fallback amounts");
        DecodedAmounts::fallback()
    })
}

/// SwapExecuted: amountOut is indexed (topic 2); data words are
/// [recipient, toToken, amountIn]. Fee derived, not read.
fn decode_swap_executed(log: &EventLog) -> Option<DecodedAmounts> {
    if log.topics.len() < 3 {
        return None;
    }
    let user = abi::topic_address(log.topics[1]);
    let recipient = abi::word_address(&log.data, 0)?;
    let to_token = abi::word_address(&log.data, 1)?;
    let amount_out = abi::topic_u256(log.topics[2]);
    let amount_in = abi::word_u256(&log.data, 2)?;
    tracing::debug!(%user, %recipient, %to_token, "decoded swap event");
    Some(DecodedAmounts {
        amount_in,
        amount_out,
        fee_amount: derived_fee(amount_in),
        decoded: true,
    })
}

/// DCAPlanExecuted: data words are [tokenOut, amountIn, amountOut, feeAmount].
fn decode_plan_executed(log: &EventLog) -> Option<DecodedAmounts> {
    Some(DecodedAmounts {
        amount_in: abi::word_u256(&log.data, 1)?,
        amount_out: abi::word_u256(&log.data, 2)?,
        fee_amount: abi::word_u256(&log.data, 3)?,
        decoded: true,
    })
}
