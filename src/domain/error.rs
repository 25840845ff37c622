use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Swap provider error: {0}")]
    Provider(String),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors from the blockchain RPC boundary. `AllowanceExceeded` is kept
/// separate from generic reverts because it triggers ledger remediation
/// instead of a plain per-plan failure.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Transfer amount exceeds allowance")]
    AllowanceExceeded,

    #[error("Timed out waiting for confirmation of {0}")]
    Timeout(String),
}

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Store(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::InvalidInput(s.to_string())
    }
}
