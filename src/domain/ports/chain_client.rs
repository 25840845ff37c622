use crate::domain::error::ChainError;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// One emitted event log from a confirmed transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Vec<u8>,
}

/// Confirmed record of a submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: B256,
    pub block_number: u64,
    pub status: bool,
    pub logs: Vec<EventLog>,
}

/// The executor contract call for one plan execution, selected from the
/// plan variant and the destination token's wrapped flag.
#[derive(Debug, Clone)]
pub enum ExecutorCall {
    /// `executeSwap(address,address,address,uint256,bytes)`
    Swap {
        user: Address,
        token_out: Address,
        recipient: Address,
        amount_in: U256,
        swap_data: Vec<u8>,
    },
    /// `executeNativeSwap(address,address,address,uint256,bytes)` — same
    /// arguments, native-asset path for wrapped destination tokens.
    NativeSwap {
        user: Address,
        token_out: Address,
        recipient: Address,
        amount_in: U256,
        swap_data: Vec<u8>,
    },
    /// `executeDCAPlan(address,uint256,uint256,uint24)` — pool-fee path
    /// keyed by the contract-side plan id, no aggregator calldata.
    PoolFeeSwap {
        user: Address,
        plan_id: u64,
        amount_in: U256,
        pool_fee: u32,
    },
}

/// Blockchain RPC boundary: the allowance read and the submit-and-confirm
/// write. Submission blocks until one confirmation.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the executor contract this client submits to. Also the
    /// spender for allowance checks and the emitter the decoder filters on.
    fn executor_address(&self) -> Address;

    /// `allowance(owner, executor)` read on `token`.
    async fn allowance(&self, token: Address, owner: Address) -> Result<U256, ChainError>;

    /// Submit the call and wait for one confirmation.
    async fn submit(&self, call: ExecutorCall) -> Result<Receipt, ChainError>;
}
