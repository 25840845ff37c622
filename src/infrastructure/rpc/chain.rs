use crate::domain::error::ChainError;
use crate::domain::ports::chain_client::{ChainClient, EventLog, ExecutorCall, Receipt};
use crate::domain::values::abi::CallEncoder;
use alloy_primitives::{hex, Address, B256, U256};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// JSON-RPC chain client. Reads go through `eth_call`; submissions go
/// through `eth_sendTransaction` from the configured signer account — the
/// node or managed wallet holds the key — then poll for the receipt until
/// one confirmation.
pub struct JsonRpcChain {
    client: reqwest::Client,
    url: String,
    signer: Address,
    executor: Address,
    poll_interval: Duration,
    max_polls: u32,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    message: String,
    data: Option<Value>,
}

impl JsonRpcChain {
    pub fn new(url: String, signer: Address, executor: Address) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            signer,
            executor,
            poll_interval: Duration::from_secs(2),
            max_polls: 60,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Rpc(format!("{method}: {e}")))?;

        if !resp.status().is_success() {
            return Err(ChainError::Rpc(format!("{method}: HTTP {}", resp.status())));
        }

        let parsed: RpcResponse = resp
            .json()
            .await
            .map_err(|e| ChainError::Rpc(format!("{method}: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(classify_rpc_error(&err));
        }
        parsed
            .result
            .ok_or_else(|| ChainError::Rpc(format!("{method}: empty response")))
    }

    async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let result = self
            .rpc(
                "eth_call",
                json!([{ "to": to.to_string(), "data": hex::encode_prefixed(data) }, "latest"]),
            )
            .await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| ChainError::Rpc("eth_call: non-string result".into()))?;
        hex::decode(hex_str).map_err(|e| ChainError::Rpc(format!("eth_call: {e}")))
    }

    /// Replay a mined-but-reverted transaction as a call to recover the
    /// `Error(string)` revert reason.
    async fn revert_reason(&self, data: &[u8]) -> ChainError {
        let replay = self
            .rpc(
                "eth_call",
                json!([{
                    "from": self.signer.to_string(),
                    "to": self.executor.to_string(),
                    "data": hex::encode_prefixed(data),
                }, "latest"]),
            )
            .await;
        match replay {
            Ok(_) => ChainError::Reverted("execution reverted".into()),
            Err(e) => e,
        }
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<Value, ChainError> {
        for _ in 0..self.max_polls {
            let result = self
                .rpc("eth_getTransactionReceipt", json!([tx_hash.to_string()]))
                .await?;
            if !result.is_null() {
                return Ok(result);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
        Err(ChainError::Timeout(tx_hash.to_string()))
    }
}

#[async_trait::async_trait]
impl ChainClient for JsonRpcChain {
    fn executor_address(&self) -> Address {
        self.executor
    }

    async fn allowance(&self, token: Address, owner: Address) -> Result<U256, ChainError> {
        let data = CallEncoder::new("allowance(address,address)")
            .address(owner)
            .address(self.executor)
            .encode();
        let out = self.eth_call(token, &data).await?;
        if out.len() < 32 {
            return Err(ChainError::Rpc(format!(
                "allowance returned {} bytes",
                out.len()
            )));
        }
        Ok(U256::from_be_slice(&out[..32]))
    }

    async fn submit(&self, call: ExecutorCall) -> Result<Receipt, ChainError> {
        let data = encode_call(&call);
        let result = self
            .rpc(
                "eth_sendTransaction",
                json!([{
                    "from": self.signer.to_string(),
                    "to": self.executor.to_string(),
                    "data": hex::encode_prefixed(&data),
                }]),
            )
            .await?;
        let tx_hash: B256 = result
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ChainError::Rpc("eth_sendTransaction: bad tx hash".into()))?;

        let raw = self.wait_for_receipt(tx_hash).await?;
        let receipt = parse_receipt(tx_hash, &raw)?;
        if !receipt.status {
            return Err(self.revert_reason(&data).await);
        }
        Ok(receipt)
    }
}

pub(crate) fn encode_call(call: &ExecutorCall) -> Vec<u8> {
    match call {
        ExecutorCall::Swap {
            user,
            token_out,
            recipient,
            amount_in,
            swap_data,
        } => CallEncoder::new("executeSwap(address,address,address,uint256,bytes)")
            .address(*user)
            .address(*token_out)
            .address(*recipient)
            .uint(*amount_in)
            .bytes(swap_data.clone())
            .encode(),
        ExecutorCall::NativeSwap {
            user,
            token_out,
            recipient,
            amount_in,
            swap_data,
        } => CallEncoder::new("executeNativeSwap(address,address,address,uint256,bytes)")
            .address(*user)
            .address(*token_out)
            .address(*recipient)
            .uint(*amount_in)
            .bytes(swap_data.clone())
            .encode(),
        ExecutorCall::PoolFeeSwap {
            user,
            plan_id,
            amount_in,
            pool_fee,
        } => CallEncoder::new("executeDCAPlan(address,uint256,uint256,uint24)")
            .address(*user)
            .uint(U256::from(*plan_id))
            .uint(*amount_in)
            .uint(U256::from(*pool_fee))
            .encode(),
    }
}

/// Map a node error to the taxonomy. The allowance revert string is what
/// OpenZeppelin ERC20 emits and is the one condition that triggers ledger
/// remediation upstream.
fn classify_rpc_error(err: &RpcErrorBody) -> ChainError {
    let mut reason = err.message.clone();
    if let Some(revert) = err
        .data
        .as_ref()
        .and_then(|d| d.as_str())
        .and_then(decode_error_string)
    {
        reason = revert;
    }
    if reason.contains("transfer amount exceeds allowance") {
        ChainError::AllowanceExceeded
    } else if reason.contains("revert") || err.data.is_some() {
        ChainError::Reverted(reason)
    } else {
        ChainError::Rpc(reason)
    }
}

/// Decode ABI `Error(string)` revert data (selector 0x08c379a0).
fn decode_error_string(hex_data: &str) -> Option<String> {
    let bytes = hex::decode(hex_data).ok()?;
    if bytes.len() < 4 + 64 || bytes[..4] != [0x08, 0xc3, 0x79, 0xa0] {
        return None;
    }
    let words = &bytes[4..];
    let len: usize = U256::from_be_slice(&words[32..64]).try_into().ok()?;
    let start = 64usize;
    let end = start.checked_add(len)?;
    if words.len() < end {
        return None;
    }
    String::from_utf8(words[start..end].to_vec()).ok()
}

fn parse_receipt(tx_hash: B256, raw: &Value) -> Result<Receipt, ChainError> {
    let status = raw["status"].as_str() == Some("0x1");
    let block_number = raw["blockNumber"]
        .as_str()
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
        .unwrap_or_default();

    let mut logs = Vec::new();
    if let Some(raw_logs) = raw["logs"].as_array() {
        for log in raw_logs {
            let address: Address = log["address"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| ChainError::Rpc("receipt log: bad address".into()))?;
            let topics = log["topics"]
                .as_array()
                .map(|ts| {
                    ts.iter()
                        .filter_map(|t| t.as_str())
                        .filter_map(|t| t.parse().ok())
                        .collect()
                })
                .unwrap_or_default();
            let data = log["data"]
                .as_str()
                .map(|s| hex::decode(s).unwrap_or_default())
                .unwrap_or_default();
            logs.push(EventLog {
                address,
                topics,
                data,
            });
        }
    }

    Ok(Receipt {
        tx_hash,
        block_number,
        status,
        logs,
    })
}
