//! Payment configuration (VNPay merchant account, admin key, bank account)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::payment::BankAccount;

use super::error::ValidationError;

/// Payment configuration
#[derive(Debug, Deserialize)]
pub struct PaymentConfig {
    /// VNPay merchant (terminal) code
    pub vnpay_tmn_code: String,

    /// Shared secret for the secure hash
    pub vnpay_hash_secret: SecretString,

    /// VNPay hosted payment page URL
    #[serde(default = "default_payment_url")]
    pub vnpay_payment_url: String,

    /// Return URL the provider redirects the browser back to
    pub vnpay_return_url: String,

    /// Frontend page the return endpoint redirects the browser to
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,

    /// Shared credential for the manual confirmation endpoint
    pub admin_api_key: SecretString,

    /// Receiving bank account shown for bank transfers
    #[serde(default)]
    pub bank: BankConfig,
}

/// Receiving bank account details
#[derive(Debug, Clone, Deserialize)]
pub struct BankConfig {
    #[serde(default = "default_bank_name")]
    pub name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_holder: String,
    #[serde(default)]
    pub branch: String,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            name: default_bank_name(),
            account_number: String::new(),
            account_holder: String::new(),
            branch: String::new(),
        }
    }
}

impl PaymentConfig {
    /// The configured bank account as a domain value
    pub fn bank_account(&self) -> BankAccount {
        BankAccount {
            bank_name: self.bank.name.clone(),
            account_number: self.bank.account_number.clone(),
            account_holder: self.bank.account_holder.clone(),
            branch: self.bank.branch.clone(),
        }
    }

    /// Validate payment configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.vnpay_tmn_code.is_empty() {
            return Err(ValidationError::MissingRequired("VNPAY_TMN_CODE"));
        }
        if self.vnpay_hash_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("VNPAY_HASH_SECRET"));
        }
        if self.admin_api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("ADMIN_API_KEY"));
        }
        if !self.vnpay_payment_url.starts_with("https://") {
            return Err(ValidationError::InvalidPaymentUrl);
        }
        if self.vnpay_return_url.is_empty() {
            return Err(ValidationError::MissingRequired("VNPAY_RETURN_URL"));
        }
        if production && !self.vnpay_return_url.starts_with("https://") {
            return Err(ValidationError::ReturnUrlMustBeHttps);
        }
        Ok(())
    }
}

fn default_payment_url() -> String {
    "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string()
}

fn default_dashboard_url() -> String {
    "/dashboard/payments".to_string()
}

fn default_bank_name() -> String {
    "Vietcombank".to_string()
}
