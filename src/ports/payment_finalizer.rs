//! Payment finalizer port: the idempotency boundary.
//!
//! Finalization is the only write that moves a payment out of PENDING.
//! Implementations must enforce the PENDING guard with a strict atomic
//! check-and-set against the store (a conditional update inside a
//! transaction), so that concurrent finalize calls for the same payment
//! resolve to exactly one `Applied` and the rest `AlreadyFinalized`. The
//! provider sends the browser return-redirect and the server-to-server
//! IPN independently, so near-simultaneous calls are the expected case,
//! not an edge case.
//!
//! On `complete`, the wedding entitlement update is part of the same
//! atomic unit: a crash between the two writes must never leave a
//! COMPLETED payment with an unentitled wedding.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId};
use crate::domain::wedding::EntitlementGrant;

/// Outcome of a finalize attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeResult {
    /// This call performed the PENDING -> terminal transition.
    Applied,

    /// The payment was already in a terminal state; nothing changed.
    AlreadyFinalized,

    /// No payment row exists for the given id.
    NotFound,
}

/// Port for the atomic terminal transition of a payment record.
#[async_trait]
pub trait PaymentFinalizer: Send + Sync {
    /// Marks the payment COMPLETED and applies the entitlement grant to
    /// the owning wedding, atomically.
    ///
    /// `provider_transaction_id` is recorded when the confirmation came
    /// through the provider; manual bank-transfer confirmations pass
    /// `None`. `paid_at` is taken from the grant and is set exactly once.
    async fn complete(
        &self,
        payment_id: &PaymentId,
        provider_transaction_id: Option<String>,
        grant: &EntitlementGrant,
    ) -> Result<FinalizeResult, DomainError>;

    /// Marks the payment FAILED. No wedding field changes.
    async fn fail(&self, payment_id: &PaymentId) -> Result<FinalizeResult, DomainError>;
}
