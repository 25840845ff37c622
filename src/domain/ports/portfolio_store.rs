use crate::domain::entities::user::User;
use crate::domain::error::EngineError;
use crate::domain::values::portfolio::PortfolioSnapshot;
use alloy_primitives::Address;
use chrono::NaiveDate;

pub trait PortfolioStore: Send + Sync {
    fn list_users(&self) -> Result<Vec<User>, EngineError>;

    fn add_user(&self, user: &User) -> Result<(), EngineError>;

    /// Insert or overwrite the (wallet, date) snapshot row.
    fn upsert_daily_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<(), EngineError>;

    fn get_snapshot(
        &self,
        wallet: Address,
        date: NaiveDate,
    ) -> Result<Option<PortfolioSnapshot>, EngineError>;
}
