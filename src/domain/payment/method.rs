//! Payment method definitions.

use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card/QR payment via the provider's hosted redirect page.
    ProviderRedirect,

    /// Manual bank transfer, confirmed later by an operator.
    BankTransfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentMethod::ProviderRedirect => "provider_redirect",
            PaymentMethod::BankTransfer => "bank_transfer",
        };
        write!(f, "{}", s)
    }
}
