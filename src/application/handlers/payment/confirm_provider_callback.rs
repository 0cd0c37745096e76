//! ConfirmProviderCallbackHandler - Shared logic for both provider
//! delivery modes.
//!
//! The browser return-redirect and the server-to-server IPN carry the
//! same signed parameter set and either may arrive first, more than once,
//! or not at all. Both run through this handler: verify the secure hash,
//! resolve the ledger row, and drive the atomic finalizer. The terminal
//! transition applies exactly once no matter how many deliveries land.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{PaymentId, StateMachine, WeddingId};
use crate::domain::payment::{
    CallbackError, PaymentStatus, SecureHashSigner, VnpayCallback,
};
use crate::domain::wedding::EntitlementGrant;
use crate::ports::{Clock, FinalizeResult, PaymentFinalizer, PaymentRepository};

/// Command carrying the raw callback parameter set from either delivery
/// mode.
#[derive(Debug, Clone)]
pub struct ConfirmProviderCallbackCommand {
    pub params: HashMap<String, String>,
}

/// Success-shaped acknowledgment for a processed callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAck {
    pub payment_id: PaymentId,
    pub wedding_id: WeddingId,
    /// Terminal status after processing.
    pub status: PaymentStatus,
    /// True if the record was already terminal before this call; acked
    /// as "already confirmed" so the provider stops retrying.
    pub already_finalized: bool,
}

/// Handler for provider payment confirmations.
pub struct ConfirmProviderCallbackHandler {
    payments: Arc<dyn PaymentRepository>,
    finalizer: Arc<dyn PaymentFinalizer>,
    signer: Arc<SecureHashSigner>,
    clock: Arc<dyn Clock>,
}

impl ConfirmProviderCallbackHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        finalizer: Arc<dyn PaymentFinalizer>,
        signer: Arc<SecureHashSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            finalizer,
            signer,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmProviderCallbackCommand,
    ) -> Result<CallbackAck, CallbackError> {
        // 1. Authenticity first. Nothing in the parameter set is trusted
        //    before this passes, and a mismatch mutates nothing.
        let callback = VnpayCallback::verify_and_parse(&self.signer, &cmd.params)?;

        // 2. Resolve the ledger row by order reference.
        let record = self
            .payments
            .find_by_id(&callback.order_id)
            .await?
            .ok_or(CallbackError::OrderNotFound)?;

        // 3. Fast path for replays. The authoritative guard is the
        //    finalizer's conditional update below.
        if record.status.is_terminal() {
            return Ok(CallbackAck {
                payment_id: record.id,
                wedding_id: record.wedding_id,
                status: record.status,
                already_finalized: true,
            });
        }

        // 4. Drive the terminal transition.
        let result = if callback.is_success() {
            let grant = EntitlementGrant::for_paid_plan(record.plan, self.clock.now());
            self.finalizer
                .complete(&record.id, callback.transaction_id.clone(), &grant)
                .await?
        } else {
            warn!(
                payment_id = %record.id,
                response_code = %callback.response_code,
                "provider reported payment failure"
            );
            self.finalizer.fail(&record.id).await?
        };

        match result {
            FinalizeResult::Applied => {
                let status = if callback.is_success() {
                    PaymentStatus::Completed
                } else {
                    PaymentStatus::Failed
                };
                info!(
                    payment_id = %record.id,
                    wedding_id = %record.wedding_id,
                    ?status,
                    "payment finalized via provider callback"
                );
                Ok(CallbackAck {
                    payment_id: record.id,
                    wedding_id: record.wedding_id,
                    status,
                    already_finalized: false,
                })
            }
            // Lost the race against the other delivery mode; report the
            // terminal state that won.
            FinalizeResult::AlreadyFinalized => {
                let status = self
                    .payments
                    .find_by_id(&record.id)
                    .await?
                    .map(|r| r.status)
                    .unwrap_or(record.status);
                Ok(CallbackAck {
                    payment_id: record.id,
                    wedding_id: record.wedding_id,
                    status,
                    already_finalized: true,
                })
            }
            FinalizeResult::NotFound => Err(CallbackError::OrderNotFound),
        }
    }
}
