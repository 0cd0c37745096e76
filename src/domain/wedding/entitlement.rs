//! Entitlement computation.
//!
//! A wedding's plan, publication status, and expiry change only as a side
//! effect of a payment completing. The grant is a pure function of the
//! paid plan and the completion timestamp; `expires_at` is recomputed in
//! full, never incrementally adjusted.

use serde::Serialize;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::Plan;

use super::WeddingStatus;

/// The wedding fields written when a payment completes.
///
/// Computed in the domain layer and applied by the finalizer inside the
/// same transaction that finalizes the payment record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitlementGrant {
    pub status: WeddingStatus,
    pub plan: Plan,
    pub paid_at: Timestamp,
    /// `None` means the entitlement never expires.
    pub expires_at: Option<Timestamp>,
}

impl EntitlementGrant {
    /// Computes the grant for a completed payment of `plan` at `paid_at`.
    pub fn for_paid_plan(plan: Plan, paid_at: Timestamp) -> Self {
        Self {
            status: WeddingStatus::Published,
            plan,
            paid_at,
            expires_at: compute_expiry(plan, paid_at),
        }
    }
}

/// Expiry as a pure function of plan and completion time.
///
/// FREE is not reachable through payment; its 7-day demo window is set at
/// wedding creation.
pub fn compute_expiry(plan: Plan, paid_at: Timestamp) -> Option<Timestamp> {
    plan.duration_days().map(|days| paid_at.add_days(days))
}
