//! Payment repository port.
//!
//! Persistence contract for the payment ledger. Records are append-only
//! apart from finalization, which goes through the `PaymentFinalizer`
//! port so the terminal transition is guarded atomically.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PaymentId};
use crate::domain::payment::PaymentRecord;

/// Repository port for payment ledger rows.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Persists a new PENDING payment record.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, record: &PaymentRecord) -> Result<(), DomainError>;

    /// Finds a payment by id. Returns `None` if unknown.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<PaymentRecord>, DomainError>;
}
