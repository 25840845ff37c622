use crate::domain::ports::swap_provider::SwapProvider;
use alloy_primitives::{hex, Address, U256};
use reqwest::Client;
use serde::Deserialize;

/// 1inch-style swap aggregator. Returns the transaction calldata for a
/// swap routed through the executor contract; anything other than a 2xx
/// response carrying `tx.data` is a hard failure.
pub struct OneInchProvider {
    client: Client,
    base_url: String,
    api_key: String,
    slippage: String,
    /// Referral tag forwarded with every quote.
    referrer: String,
    /// Fee parameter, percent, charged on top of the swap.
    fee: String,
}

#[derive(Deserialize)]
struct SwapResponse {
    tx: Option<SwapTx>,
}

#[derive(Deserialize)]
struct SwapTx {
    data: Option<String>,
}

impl OneInchProvider {
    pub fn new(base_url: String, api_key: String, referrer: Address) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            slippage: "5".into(),
            referrer: referrer.to_string(),
            fee: "3".into(),
        }
    }
}

#[async_trait::async_trait]
impl SwapProvider for OneInchProvider {
    async fn quote(
        &self,
        src_token: Address,
        dst_token: Address,
        amount: U256,
        spender: Address,
        origin: Address,
    ) -> Result<Vec<u8>, String> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("src", src_token.to_string()),
                ("dst", dst_token.to_string()),
                ("amount", amount.to_string()),
                ("from", spender.to_string()),
                ("origin", origin.to_string()),
                ("slippage", self.slippage.clone()),
                ("disableEstimate", "true".into()),
                ("referrer", self.referrer.clone()),
                ("fee", self.fee.clone()),
            ])
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Aggregator request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("Aggregator API {status}: {body}"));
        }

        let parsed: SwapResponse = resp
            .json()
            .await
            .map_err(|e| format!("Aggregator parse error: {e}"))?;

        let data = parsed
            .tx
            .and_then(|tx| tx.data)
            .ok_or("No swap calldata in aggregator response")?;
        hex::decode(&data).map_err(|e| format!("Bad swap calldata hex: {e}"))
    }
}
