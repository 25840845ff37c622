use crate::domain::entities::token::MarketData;
use crate::domain::ports::price_feed::PriceFeed;
use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;

/// GeckoTerminal market data feed. Public endpoint, no auth.
pub struct GeckoTerminalFeed {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    data: Option<TokenData>,
}

#[derive(Deserialize)]
struct TokenData {
    attributes: Attributes,
}

/// The feed reports numbers as strings and omits fields it has no data for.
#[derive(Deserialize)]
struct Attributes {
    #[serde(default)]
    price_usd: Option<String>,
    #[serde(default)]
    fdv_usd: Option<String>,
    #[serde(default)]
    market_cap_usd: Option<String>,
    #[serde(default)]
    volume_usd: Option<VolumeUsd>,
    #[serde(default)]
    normalized_total_supply: Option<String>,
}

#[derive(Deserialize)]
struct VolumeUsd {
    #[serde(default)]
    h24: Option<String>,
}

impl GeckoTerminalFeed {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Default endpoint for the Base network.
    pub fn base_network() -> Self {
        Self::new("https://api.geckoterminal.com/api/v2/networks/base/tokens".into())
    }
}

fn parse_field(value: Option<String>) -> Option<f64> {
    value.and_then(|s| s.parse().ok())
}

#[async_trait::async_trait]
impl PriceFeed for GeckoTerminalFeed {
    fn name(&self) -> &str {
        "geckoterminal"
    }

    async fn fetch(&self, token: Address) -> Result<MarketData, String> {
        let url = format!("{}/{}", self.base_url, token);
        let resp = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Feed request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("Feed API {} for {token}", resp.status()));
        }

        let parsed: TokenResponse = resp
            .json()
            .await
            .map_err(|e| format!("Feed parse error: {e}"))?;
        let attributes = parsed
            .data
            .map(|d| d.attributes)
            .ok_or("Feed response missing token data")?;

        Ok(MarketData {
            price_usd: parse_field(attributes.price_usd),
            fdv_usd: parse_field(attributes.fdv_usd),
            market_cap_usd: parse_field(attributes.market_cap_usd),
            volume_24h_usd: parse_field(attributes.volume_usd.and_then(|v| v.h24)),
            total_supply: parse_field(attributes.normalized_total_supply),
        })
    }
}
