use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Wallet identity plus the external-system handle. Read-only from the
/// engine's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub wallet: Address,
    pub fid: Option<i64>,
}
