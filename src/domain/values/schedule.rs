//! Due-plan selection.
//!
//! A plan is due when it is active and at least `frequency` seconds have
//! elapsed since `last_executed_at`. The arithmetic is signed so a
//! `last_executed_at` in the future (clock skew, bad data) yields a
//! negative elapsed time and can never satisfy a positive frequency.

use crate::domain::entities::plan::Plan;

pub fn is_due(plan: &Plan, now: i64) -> bool {
    plan.active && now - plan.last_executed_at >= plan.frequency
}

/// Seconds until the plan becomes due. Zero when already due.
pub fn remaining_secs(plan: &Plan, now: i64) -> i64 {
    (plan.frequency - (now - plan.last_executed_at)).max(0)
}
