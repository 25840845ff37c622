use crate::domain::entities::plan::{Authorization, Plan};
use crate::domain::ports::chain_client::ChainClient;
use alloy_primitives::{Address, U256};
use std::sync::Arc;

/// Pre-flight spending authorization decision. A failed check is a skip,
/// never a hard failure — the plan stays untouched for the next pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Authorized,
    Insufficient { required: U256, available: U256 },
    CheckFailed(String),
}

/// Decides whether a plan may spend before anything is submitted.
pub struct AuthorizationGuard {
    chain: Arc<dyn ChainClient>,
    /// The funding asset whose allowance mapping backs the on-chain variant.
    funding_token: Address,
}

impl AuthorizationGuard {
    pub fn new(chain: Arc<dyn ChainClient>, funding_token: Address) -> Self {
        Self {
            chain,
            funding_token,
        }
    }

    pub async fn authorize(&self, plan: &Plan) -> AuthDecision {
        // Native-asset swaps move no funding token, so there is no
        // allowance to check.
        if plan.token_out.is_wrapped {
            return AuthDecision::Authorized;
        }

        match &plan.authorization {
            Authorization::OnChain => {
                match self.chain.allowance(self.funding_token, plan.user_wallet).await {
                    Ok(allowance) if allowance >= plan.amount_in => AuthDecision::Authorized,
                    Ok(allowance) => AuthDecision::Insufficient {
                        required: plan.amount_in,
                        available: allowance,
                    },
                    Err(e) => AuthDecision::CheckFailed(e.to_string()),
                }
            }
            Authorization::Ledger { approval_amount, .. } => {
                if *approval_amount >= plan.amount_in {
                    AuthDecision::Authorized
                } else {
                    AuthDecision::Insufficient {
                        required: plan.amount_in,
                        available: *approval_amount,
                    }
                }
            }
        }
    }
}
