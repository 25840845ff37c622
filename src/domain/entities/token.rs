use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A swappable asset known to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Wrapped-native assets (e.g. WETH) take the native-swap entry point
    /// and require no spending allowance.
    pub is_wrapped: bool,
    /// Pool fee parameter passed to the pool-fee executor entry point.
    pub fee_tier: Option<u32>,
    /// Market snapshot maintained by the price feed, not by the engine.
    pub market: Option<MarketData>,
}

/// Market data as reported by the external price feed. Every field is
/// optional because the feed omits fields for thinly listed tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    pub price_usd: Option<f64>,
    pub fdv_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub total_supply: Option<f64>,
}

impl Token {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
            is_wrapped: false,
            fee_tier: None,
            market: None,
        }
    }

    pub fn wrapped(mut self) -> Self {
        self.is_wrapped = true;
        self
    }

    pub fn with_fee_tier(mut self, fee_tier: u32) -> Self {
        self.fee_tier = Some(fee_tier);
        self
    }

    /// Current USD price, if the feed has reported one.
    pub fn price_usd(&self) -> Option<f64> {
        self.market.as_ref().and_then(|m| m.price_usd)
    }
}
