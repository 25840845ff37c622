use alloy_primitives::{Address, U256};

/// Produces opaque swap calldata for one execution. Consumed, not
/// implemented, by the engine: any non-success response or a response
/// missing the calldata field is a hard failure for that plan.
#[async_trait::async_trait]
pub trait SwapProvider: Send + Sync {
    async fn quote(
        &self,
        src_token: Address,
        dst_token: Address,
        amount: U256,
        spender: Address,
        origin: Address,
    ) -> Result<Vec<u8>, String>;
}
