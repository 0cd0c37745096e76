//! ConfirmBankTransferHandler - Operator confirmation of a bank transfer.
//!
//! Bank transfers cannot be machine-verified, so an operator matches the
//! statement line against the pending payment and confirms or rejects it.
//! Authentication (a shared admin credential) happens at the HTTP
//! boundary; this handler only drives the same atomic finalizer as the
//! provider callback, so the idempotency guarantee is identical.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};
use crate::domain::payment::PaymentStatus;
use crate::domain::wedding::EntitlementGrant;
use crate::ports::{Clock, FinalizeResult, PaymentFinalizer, PaymentRepository};

/// What the operator decided about the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualAction {
    /// The transfer arrived; complete the payment and entitle the wedding.
    Confirm,
    /// The transfer never arrived or does not match; fail the payment.
    Reject,
}

/// Command for a manual confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmBankTransferCommand {
    pub payment_id: PaymentId,
    pub action: ManualAction,
}

/// Result of a manual confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmBankTransferResult {
    /// Terminal status after the call.
    pub status: PaymentStatus,
    /// True if this call performed the transition.
    pub applied: bool,
}

/// Handler for operator bank-transfer confirmations.
pub struct ConfirmBankTransferHandler {
    payments: Arc<dyn PaymentRepository>,
    finalizer: Arc<dyn PaymentFinalizer>,
    clock: Arc<dyn Clock>,
}

impl ConfirmBankTransferHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        finalizer: Arc<dyn PaymentFinalizer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            finalizer,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmBankTransferCommand,
    ) -> Result<ConfirmBankTransferResult, DomainError> {
        let record = self
            .payments
            .find_by_id(&cmd.payment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")
                    .with_detail("payment_id", cmd.payment_id.to_string())
            })?;

        let result = match cmd.action {
            ManualAction::Confirm => {
                let grant = EntitlementGrant::for_paid_plan(record.plan, self.clock.now());
                self.finalizer.complete(&record.id, None, &grant).await?
            }
            ManualAction::Reject => self.finalizer.fail(&record.id).await?,
        };

        match result {
            FinalizeResult::Applied => {
                let status = match cmd.action {
                    ManualAction::Confirm => PaymentStatus::Completed,
                    ManualAction::Reject => PaymentStatus::Failed,
                };
                info!(
                    payment_id = %record.id,
                    wedding_id = %record.wedding_id,
                    ?status,
                    "payment finalized manually"
                );
                Ok(ConfirmBankTransferResult {
                    status,
                    applied: true,
                })
            }
            FinalizeResult::AlreadyFinalized => {
                let status = self
                    .payments
                    .find_by_id(&record.id)
                    .await?
                    .map(|r| r.status)
                    .unwrap_or(record.status);
                Ok(ConfirmBankTransferResult {
                    status,
                    applied: false,
                })
            }
            FinalizeResult::NotFound => Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                "Payment not found",
            )),
        }
    }
}
