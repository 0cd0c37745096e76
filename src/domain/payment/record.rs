//! PaymentRecord aggregate.
//!
//! The persistent ledger row for one payment attempt. Records are created
//! PENDING, finalized at most once, and never deleted (financial audit
//! trail). The terminal transition itself is enforced by the
//! `PaymentFinalizer` port with an atomic conditional update; this type
//! only carries state and creation-time validation.

use serde::Serialize;

use crate::domain::foundation::{PaymentId, Timestamp, WeddingId};

use super::{PaymentMethod, PaymentStatus, Plan};

/// One payment attempt for a wedding page.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecord {
    /// Payment id; also the provider-visible order reference.
    pub id: PaymentId,

    /// The wedding being entitled by this payment.
    pub wedding_id: WeddingId,

    /// Amount in VND, smallest whole unit.
    pub amount: i64,

    /// The requested plan tier.
    pub plan: Plan,

    /// How the customer pays.
    pub method: PaymentMethod,

    /// Current status. Monotonic: terminal states never change.
    pub status: PaymentStatus,

    /// Provider transaction reference, set only on provider-path completion.
    pub provider_transaction_id: Option<String>,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the payment completed. Set exactly once.
    pub paid_at: Option<Timestamp>,
}

impl PaymentRecord {
    /// Creates a new PENDING payment record for a purchasable plan.
    ///
    /// The amount is taken from the plan's configured price; callers must
    /// have already checked `plan.price_vnd()` is present.
    pub fn create(
        wedding_id: WeddingId,
        plan: Plan,
        amount: i64,
        method: PaymentMethod,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            wedding_id,
            amount,
            plan,
            method,
            status: PaymentStatus::Pending,
            provider_transaction_id: None,
            created_at,
            paid_at: None,
        }
    }

}
