//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! These types define the JSON request/response structure for the payment
//! API. They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::payment::{ManualAction, PaymentArtifact};
use crate::domain::payment::{AckCode, BankTransferInstructions, PaymentMethod, PaymentStatus, Plan};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a payment attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    /// The wedding to entitle, as a UUID string.
    pub wedding_id: String,
    /// The plan tier being purchased.
    pub plan: Plan,
    /// How the customer pays.
    pub method: PaymentMethod,
}

/// Request for an operator confirmation of a bank transfer.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualConfirmRequest {
    /// The payment to finalize, as a UUID string.
    pub payment_id: String,
    /// Confirm or reject.
    pub action: ManualAction,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Summary of the created payment record.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummaryResponse {
    pub id: String,
    pub plan: Plan,
    pub method: PaymentMethod,
    pub amount: i64,
    pub status: PaymentStatus,
}

/// Bank account details returned for the bank transfer path.
#[derive(Debug, Clone, Serialize)]
pub struct BankInfoResponse {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub branch: String,
    pub amount: i64,
    pub transfer_content: String,
}

impl From<BankTransferInstructions> for BankInfoResponse {
    fn from(instructions: BankTransferInstructions) -> Self {
        Self {
            bank_name: instructions.account.bank_name,
            account_number: instructions.account.account_number,
            account_holder: instructions.account.account_holder,
            branch: instructions.account.branch,
            amount: instructions.amount,
            transfer_content: instructions.transfer_content,
        }
    }
}

/// Response for a created payment: the record plus its method-specific
/// artifact.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentResponse {
    pub payment: PaymentSummaryResponse,
    /// Signed provider redirect URL (provider path only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    /// Transfer instructions (bank transfer path only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_info: Option<BankInfoResponse>,
}

impl CreatePaymentResponse {
    pub fn new(payment: PaymentSummaryResponse, artifact: PaymentArtifact) -> Self {
        match artifact {
            PaymentArtifact::Redirect { payment_url } => Self {
                payment,
                payment_url: Some(payment_url),
                bank_info: None,
            },
            PaymentArtifact::BankTransfer { instructions } => Self {
                payment,
                payment_url: None,
                bank_info: Some(BankInfoResponse::from(instructions)),
            },
        }
    }
}

/// Response for the status poll.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub status: PaymentStatus,
    /// Completion time (ISO 8601), present once completed.
    pub paid_at: Option<String>,
}

/// Response for a manual confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct ManualConfirmResponse {
    pub status: PaymentStatus,
    /// True if this call performed the transition.
    pub applied: bool,
}

/// Acknowledgment body in the provider's vocabulary.
///
/// Field names follow the provider's wire format, not this API's.
#[derive(Debug, Clone, Serialize)]
pub struct VnpayAckResponse {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl From<AckCode> for VnpayAckResponse {
    fn from(code: AckCode) -> Self {
        Self {
            rsp_code: code.as_str().to_string(),
            message: code.message().to_string(),
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}
