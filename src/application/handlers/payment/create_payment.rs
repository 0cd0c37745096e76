//! CreatePaymentHandler - Command handler for starting a payment attempt.
//!
//! Validates the purchase, persists the PENDING ledger row, and returns
//! the method-specific artifact: a signed provider redirect URL or bank
//! transfer instructions.

use std::sync::Arc;

use tracing::info;

use crate::adapters::vnpay::{RedirectRequest, VnpayRedirectBuilder};
use crate::domain::foundation::{DomainError, ErrorCode, UserId, WeddingId};
use crate::domain::payment::{
    BankAccount, BankTransferInstructions, PaymentMethod, PaymentRecord, Plan,
};
use crate::ports::{Clock, PaymentRepository, WeddingReader};

/// Payment page locale sent to the provider.
const DEFAULT_LOCALE: &str = "vn";

/// Command to start a payment attempt for a wedding.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub user_id: UserId,
    pub wedding_id: WeddingId,
    pub plan: Plan,
    pub method: PaymentMethod,
    /// The paying customer's IP, forwarded to the provider.
    pub client_ip: String,
}

/// Method-specific artifact returned to the client.
#[derive(Debug, Clone)]
pub enum PaymentArtifact {
    /// Signed URL for the provider's hosted payment page.
    Redirect { payment_url: String },
    /// Account details and transfer content for a manual transfer.
    BankTransfer {
        instructions: BankTransferInstructions,
    },
}

/// Result of a successful payment creation.
#[derive(Debug, Clone)]
pub struct CreatePaymentResult {
    pub payment: PaymentRecord,
    pub artifact: PaymentArtifact,
}

/// Handler for starting a payment attempt.
pub struct CreatePaymentHandler {
    payments: Arc<dyn PaymentRepository>,
    weddings: Arc<dyn WeddingReader>,
    clock: Arc<dyn Clock>,
    redirect_builder: Arc<VnpayRedirectBuilder>,
    bank_account: BankAccount,
}

impl CreatePaymentHandler {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        weddings: Arc<dyn WeddingReader>,
        clock: Arc<dyn Clock>,
        redirect_builder: Arc<VnpayRedirectBuilder>,
        bank_account: BankAccount,
    ) -> Self {
        Self {
            payments,
            weddings,
            clock,
            redirect_builder,
            bank_account,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentCommand,
    ) -> Result<CreatePaymentResult, DomainError> {
        // 1. Resolve the wedding; ownership failures look like absence.
        let wedding = self
            .weddings
            .find_by_id(&cmd.wedding_id)
            .await?
            .filter(|w| w.owner_user_id == cmd.user_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::WeddingNotFound, "Wedding not found")
                    .with_detail("wedding_id", cmd.wedding_id.to_string())
            })?;

        // 2. The requested tier must have a configured price.
        let amount = cmd.plan.price_vnd().ok_or_else(|| {
            DomainError::new(
                ErrorCode::UnknownPlan,
                format!("Plan {} has no configured price", cmd.plan),
            )
        })?;

        // 3. No same-or-lower-tier repurchase on a published wedding.
        if !wedding.allows_purchase_of(cmd.plan) {
            return Err(DomainError::new(
                ErrorCode::PlanNotAllowed,
                "Wedding is already published with an equal or higher plan",
            )
            .with_detail("current_plan", wedding.plan.code())
            .with_detail("requested_plan", cmd.plan.code()));
        }

        // 4. Persist the PENDING ledger row before handing out either artifact.
        let now = self.clock.now();
        let record = PaymentRecord::create(cmd.wedding_id, cmd.plan, amount, cmd.method, now);
        self.payments.create(&record).await?;

        info!(
            payment_id = %record.id,
            wedding_id = %record.wedding_id,
            plan = %record.plan,
            method = %record.method,
            amount,
            "payment created"
        );

        let artifact = match cmd.method {
            PaymentMethod::ProviderRedirect => {
                let request = RedirectRequest {
                    order_id: record.id,
                    amount,
                    order_info: format!("Thanh toan VowPage - Goi {}", cmd.plan.code()),
                    ip_addr: cmd.client_ip,
                    locale: DEFAULT_LOCALE.to_string(),
                };
                PaymentArtifact::Redirect {
                    payment_url: self.redirect_builder.build(&request, now),
                }
            }
            PaymentMethod::BankTransfer => PaymentArtifact::BankTransfer {
                instructions: BankTransferInstructions::new(
                    self.bank_account.clone(),
                    amount,
                    &cmd.wedding_id,
                    cmd.plan,
                ),
            },
        };

        Ok(CreatePaymentResult {
            payment: record,
            artifact,
        })
    }
}
