//! Bank transfer instructions.
//!
//! Bank transfers cannot be machine-verified, so the customer is given a
//! deterministic transfer content string. An operator later matches the
//! bank statement line against the pending payment and confirms it through
//! the manual confirmation endpoint.

use serde::Serialize;

use crate::domain::foundation::WeddingId;

use super::Plan;

/// Static receiving account details, from configuration.
#[derive(Debug, Clone, Serialize)]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_holder: String,
    pub branch: String,
}

/// Everything the customer needs to complete a bank transfer.
#[derive(Debug, Clone, Serialize)]
pub struct BankTransferInstructions {
    #[serde(flatten)]
    pub account: BankAccount,
    /// Amount in VND.
    pub amount: i64,
    /// Human-typed reference line identifying the wedding and plan.
    pub transfer_content: String,
}

impl BankTransferInstructions {
    /// Builds instructions for a pending payment.
    pub fn new(account: BankAccount, amount: i64, wedding_id: &WeddingId, plan: Plan) -> Self {
        Self {
            account,
            amount,
            transfer_content: transfer_content(wedding_id, plan),
        }
    }
}

/// Builds the transfer content: `TC` + last 8 chars of the wedding id,
/// uppercased, then the plan code.
pub fn transfer_content(wedding_id: &WeddingId, plan: Plan) -> String {
    format!("TC{} {}", wedding_id.short_suffix(), plan.code())
}
