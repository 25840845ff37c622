use crate::domain::entities::plan::{Authorization, Plan};
use crate::domain::error::EngineError;
use crate::domain::ports::chain_client::{ChainClient, ExecutorCall, Receipt};
use crate::domain::ports::swap_provider::SwapProvider;
use alloy_primitives::Address;
use std::sync::Arc;

/// Default pool fee when a ledger-variant token has no fee tier stored.
const DEFAULT_POOL_FEE: u32 = 3000;

/// Builds the executor call appropriate to the plan variant, fetching
/// aggregator calldata where the variant needs it, and submits it through
/// the chain client. Blocks until one confirmation.
pub struct TransactionSubmitter {
    chain: Arc<dyn ChainClient>,
    swaps: Arc<dyn SwapProvider>,
    funding_token: Address,
}

impl TransactionSubmitter {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        swaps: Arc<dyn SwapProvider>,
        funding_token: Address,
    ) -> Self {
        Self {
            chain,
            swaps,
            funding_token,
        }
    }

    pub async fn submit(&self, plan: &Plan) -> Result<Receipt, EngineError> {
        let call = self.build_call(plan).await?;
        tracing::info!(plan_id = %plan.id, call = call_name(&call), "submitting execution");
        let receipt = self.chain.submit(call).await?;
        tracing::info!(plan_id = %plan.id, tx_hash = %receipt.tx_hash, block = receipt.block_number, "execution confirmed");
        Ok(receipt)
    }

    async fn build_call(&self, plan: &Plan) -> Result<ExecutorCall, EngineError> {
        match &plan.authorization {
            Authorization::Ledger { plan_id, .. } => Ok(ExecutorCall::PoolFeeSwap {
                user: plan.user_wallet,
                plan_id: *plan_id,
                amount_in: plan.amount_in,
                pool_fee: plan.token_out.fee_tier.unwrap_or(DEFAULT_POOL_FEE),
            }),
            Authorization::OnChain => {
                let swap_data = self
                    .swaps
                    .quote(
                        self.funding_token,
                        plan.token_out.address,
                        plan.amount_in,
                        self.chain.executor_address(),
                        plan.recipient,
                    )
                    .await
                    .map_err(EngineError::Provider)?;

                if plan.token_out.is_wrapped {
                    Ok(ExecutorCall::NativeSwap {
                        user: plan.user_wallet,
                        token_out: plan.token_out.address,
                        recipient: plan.recipient,
                        amount_in: plan.amount_in,
                        swap_data,
                    })
                } else {
                    Ok(ExecutorCall::Swap {
                        user: plan.user_wallet,
                        token_out: plan.token_out.address,
                        recipient: plan.recipient,
                        amount_in: plan.amount_in,
                        swap_data,
                    })
                }
            }
        }
    }
}

fn call_name(call: &ExecutorCall) -> &'static str {
    match call {
        ExecutorCall::Swap { .. } => "executeSwap",
        ExecutorCall::NativeSwap { .. } => "executeNativeSwap",
        ExecutorCall::PoolFeeSwap { .. } => "executeDCAPlan",
    }
}
