pub mod migrations;
pub mod plan_repo;
pub mod portfolio_repo;
pub mod token_repo;

use crate::domain::entities::token::{MarketData, Token};
use alloy_primitives::{Address, B256, U256};
use rusqlite::types::Type;
use rusqlite::Row;

fn conv_err(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

pub(crate) fn parse_address(idx: usize, s: &str) -> Result<Address, rusqlite::Error> {
    s.parse().map_err(|e| conv_err(idx, e))
}

pub(crate) fn parse_u256(idx: usize, s: &str) -> Result<U256, rusqlite::Error> {
    s.parse().map_err(|e| conv_err(idx, e))
}

pub(crate) fn parse_b256(idx: usize, s: &str) -> Result<B256, rusqlite::Error> {
    s.parse().map_err(|e| conv_err(idx, e))
}

/// Map the token column block starting at `base`:
/// address, symbol, decimals, is_wrapped, fee_tier, price_usd, fdv_usd,
/// market_cap_usd, volume_24h_usd, total_supply, market_updated_at.
pub(crate) fn token_from_row(row: &Row, base: usize) -> Result<Token, rusqlite::Error> {
    let address: String = row.get(base)?;
    let market_updated_at: Option<String> = row.get(base + 10)?;

    let market = if market_updated_at.is_some() {
        Some(MarketData {
            price_usd: row.get(base + 5)?,
            fdv_usd: row.get(base + 6)?,
            market_cap_usd: row.get(base + 7)?,
            volume_24h_usd: row.get(base + 8)?,
            total_supply: row.get(base + 9)?,
        })
    } else {
        None
    };

    Ok(Token {
        address: parse_address(base, &address)?,
        symbol: row.get(base + 1)?,
        decimals: row.get(base + 2)?,
        is_wrapped: row.get(base + 3)?,
        fee_tier: row.get(base + 4)?,
        market,
    })
}

pub(crate) const TOKEN_COLUMNS: &str =
    "address, symbol, decimals, is_wrapped, fee_tier, price_usd, fdv_usd, \
     market_cap_usd, volume_24h_usd, total_supply, market_updated_at";
