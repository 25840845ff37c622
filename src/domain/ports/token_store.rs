use crate::domain::entities::token::{MarketData, Token};
use crate::domain::error::EngineError;
use alloy_primitives::Address;

pub trait TokenStore: Send + Sync {
    fn list_tokens(&self) -> Result<Vec<Token>, EngineError>;

    fn get_token(&self, address: Address) -> Result<Option<Token>, EngineError>;

    fn add_token(&self, token: &Token) -> Result<(), EngineError>;

    /// Overwrite the market snapshot for one token.
    fn update_market_data(&self, address: Address, data: &MarketData) -> Result<(), EngineError>;
}
