use crate::domain::error::EngineError;
use crate::domain::ports::price_feed::PriceFeed;
use crate::domain::ports::token_store::TokenStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Spacing between feed calls to stay under the public rate limit.
const FEED_CALL_GAP: Duration = Duration::from_millis(100);

#[derive(Debug, Serialize)]
pub struct PriceRefreshReport {
    pub total: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Refreshes every stored token's market snapshot from the price feed.
/// One token failing never stops the rest.
pub struct UpdatePricesUseCase {
    tokens: Arc<dyn TokenStore>,
    feed: Arc<dyn PriceFeed>,
}

impl UpdatePricesUseCase {
    pub fn new(tokens: Arc<dyn TokenStore>, feed: Arc<dyn PriceFeed>) -> Self {
        Self { tokens, feed }
    }

    pub async fn execute(&self) -> Result<PriceRefreshReport, EngineError> {
        let tokens = self.tokens.list_tokens()?;
        tracing::info!(count = tokens.len(), feed = self.feed.name(), "refreshing token prices");

        let mut updated = 0;
        let mut failed = 0;
        for (i, token) in tokens.iter().enumerate() {
            match self.feed.fetch(token.address).await {
                Ok(data) => match self.tokens.update_market_data(token.address, &data) {
                    Ok(()) => {
                        tracing::debug!(symbol = %token.symbol, price = ?data.price_usd, "price updated");
                        updated += 1;
                    }
                    Err(e) => {
                        tracing::warn!(symbol = %token.symbol, error = %e, "failed to store market data");
                        failed += 1;
                    }
                },
                Err(e) => {
                    tracing::warn!(symbol = %token.symbol, error = e, "price fetch failed");
                    failed += 1;
                }
            }
            if i + 1 < tokens.len() {
                tokio::time::sleep(FEED_CALL_GAP).await;
            }
        }

        Ok(PriceRefreshReport {
            total: tokens.len(),
            updated,
            failed,
        })
    }
}
