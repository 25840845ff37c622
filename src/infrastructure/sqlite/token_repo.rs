use crate::domain::entities::token::{MarketData, Token};
use crate::domain::error::EngineError;
use crate::domain::ports::token_store::TokenStore;
use crate::infrastructure::sqlite::{token_from_row, TOKEN_COLUMNS};
use alloy_primitives::Address;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct SqliteTokenRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTokenRepo {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn row_to_token(row: &Row) -> Result<Token, rusqlite::Error> {
        token_from_row(row, 0)
    }
}

impl TokenStore for SqliteTokenRepo {
    fn list_tokens(&self) -> Result<Vec<Token>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM tokens ORDER BY rowid");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let tokens = stmt
            .query_map([], Self::row_to_token)
            .map_err(|e| EngineError::Store(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::Store(format!("Failed to read token: {e}")))?;
        Ok(tokens)
    }

    fn get_token(&self, address: Address) -> Result<Option<Token>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE address = ?1");
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![address.to_string()], Self::row_to_token)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        rows.next()
            .transpose()
            .map_err(|e| EngineError::Store(format!("Failed to read token: {e}")))
    }

    fn add_token(&self, token: &Token) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        conn.execute(
            "INSERT INTO tokens (address, symbol, decimals, is_wrapped, fee_tier) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                token.address.to_string(),
                token.symbol,
                token.decimals,
                token.is_wrapped,
                token.fee_tier,
            ],
        )
        .map_err(|e| EngineError::Store(format!("Failed to add token: {e}")))?;
        Ok(())
    }

    fn update_market_data(&self, address: Address, data: &MarketData) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let rows = conn
            .execute(
                "UPDATE tokens SET price_usd = ?1, fdv_usd = ?2, market_cap_usd = ?3, \
                 volume_24h_usd = ?4, total_supply = ?5, market_updated_at = ?6 \
                 WHERE address = ?7",
                params![
                    data.price_usd,
                    data.fdv_usd,
                    data.market_cap_usd,
                    data.volume_24h_usd,
                    data.total_supply,
                    chrono::Utc::now().to_rfc3339(),
                    address.to_string(),
                ],
            )
            .map_err(|e| EngineError::Store(format!("Failed to update market data: {e}")))?;
        if rows == 0 {
            return Err(EngineError::NotFound(format!("token {address}")));
        }
        Ok(())
    }
}
