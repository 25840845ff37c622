use alloy_primitives::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyReason {
    /// Pre-flight check found the allowance below the plan amount.
    AllowanceTooLow,
    /// A submission reverted on allowance after passing pre-flight.
    AllowanceRevoked,
}

/// Fire-and-forget user notification. Callers must swallow failures — a
/// broken notifier never aborts plan processing.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        plan_id: &str,
        wallet: Address,
        reason: NotifyReason,
    ) -> Result<(), String>;
}
