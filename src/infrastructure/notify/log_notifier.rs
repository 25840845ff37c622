use crate::domain::ports::notifier::{Notifier, NotifyReason};
use alloy_primitives::Address;

/// Stub notifier: records the need for more approval in the logs until a
/// real delivery channel exists.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        plan_id: &str,
        wallet: Address,
        reason: NotifyReason,
    ) -> Result<(), String> {
        tracing::info!(plan_id, %wallet, ?reason, "user needs to approve more tokens");
        Ok(())
    }
}
