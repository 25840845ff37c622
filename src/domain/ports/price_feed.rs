use crate::domain::entities::token::MarketData;
use alloy_primitives::Address;

/// External market-data source for stored tokens.
#[async_trait::async_trait]
pub trait PriceFeed: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, token: Address) -> Result<MarketData, String>;
}
