//! GetPaymentStatusHandler - Read-only status poll.
//!
//! Clients poll this while waiting for a bank transfer to be confirmed or
//! for the provider callback to land. Purely read-only; it may run
//! concurrently with finalization and returns either the pre- or
//! post-finalization state.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId, Timestamp, UserId};
use crate::domain::payment::PaymentStatus;
use crate::ports::{PaymentRepository, WeddingReader};

/// Query for one payment's status.
#[derive(Debug, Clone)]
pub struct GetPaymentStatusQuery {
    pub user_id: UserId,
    pub payment_id: PaymentId,
}

/// Client-facing view of a payment's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentStatusView {
    pub status: PaymentStatus,
    pub paid_at: Option<Timestamp>,
}

/// Handler for the status poll.
pub struct GetPaymentStatusHandler {
    payments: Arc<dyn PaymentRepository>,
    weddings: Arc<dyn WeddingReader>,
}

impl GetPaymentStatusHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>, weddings: Arc<dyn WeddingReader>) -> Self {
        Self { payments, weddings }
    }

    pub async fn handle(
        &self,
        query: GetPaymentStatusQuery,
    ) -> Result<PaymentStatusView, DomainError> {
        let not_found = || {
            DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")
                .with_detail("payment_id", query.payment_id.to_string())
        };

        let record = self
            .payments
            .find_by_id(&query.payment_id)
            .await?
            .ok_or_else(not_found)?;

        // Ownership check via the owning wedding; foreign payments look
        // absent rather than forbidden.
        let owned = self
            .weddings
            .find_by_id(&record.wedding_id)
            .await?
            .map(|w| w.owner_user_id == query.user_id)
            .unwrap_or(false);
        if !owned {
            return Err(not_found());
        }

        Ok(PaymentStatusView {
            status: record.status,
            paid_at: record.paid_at,
        })
    }
}
