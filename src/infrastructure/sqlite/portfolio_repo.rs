use crate::domain::entities::user::User;
use crate::domain::error::EngineError;
use crate::domain::ports::portfolio_store::PortfolioStore;
use crate::domain::values::portfolio::PortfolioSnapshot;
use crate::infrastructure::sqlite::parse_address;
use alloy_primitives::Address;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct SqlitePortfolioRepo {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePortfolioRepo {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

impl PortfolioStore for SqlitePortfolioRepo {
    fn list_users(&self) -> Result<Vec<User>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT wallet, fid FROM users ORDER BY rowid")
            .map_err(|e| EngineError::Store(e.to_string()))?;
        let users = stmt
            .query_map([], |row| {
                let wallet: String = row.get(0)?;
                Ok(User {
                    wallet: parse_address(0, &wallet)?,
                    fid: row.get(1)?,
                })
            })
            .map_err(|e| EngineError::Store(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::Store(format!("Failed to read user: {e}")))?;
        Ok(users)
    }

    fn add_user(&self, user: &User) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        conn.execute(
            "INSERT INTO users (wallet, fid) VALUES (?1, ?2)",
            params![user.wallet.to_string(), user.fid],
        )
        .map_err(|e| EngineError::Store(format!("Failed to add user: {e}")))?;
        Ok(())
    }

    fn upsert_daily_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<(), EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        conn.execute(
            "INSERT INTO portfolio_daily (user_wallet, date, invested_usd, current_value_usd, percent_change) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_wallet, date) DO UPDATE SET \
             invested_usd = excluded.invested_usd, \
             current_value_usd = excluded.current_value_usd, \
             percent_change = excluded.percent_change",
            params![
                snapshot.user_wallet.to_string(),
                snapshot.date.to_string(),
                snapshot.invested_usd,
                snapshot.current_value_usd,
                snapshot.percent_change,
            ],
        )
        .map_err(|e| EngineError::Store(format!("Failed to upsert snapshot: {e}")))?;
        Ok(())
    }

    fn get_snapshot(
        &self,
        wallet: Address,
        date: NaiveDate,
    ) -> Result<Option<PortfolioSnapshot>, EngineError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| EngineError::Store(e.to_string()))?;
        conn.query_row(
            "SELECT invested_usd, current_value_usd, percent_change FROM portfolio_daily \
             WHERE user_wallet = ?1 AND date = ?2",
            params![wallet.to_string(), date.to_string()],
            |row| {
                Ok(PortfolioSnapshot {
                    user_wallet: wallet,
                    date,
                    invested_usd: row.get(0)?,
                    current_value_usd: row.get(1)?,
                    percent_change: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(|e| EngineError::Store(format!("Failed to read snapshot: {e}")))
    }
}
