//! VNPay redirect URL builder.
//!
//! Builds the signed URL the customer's browser is sent to for card/QR
//! payment. Protocol details: amounts carry two implied decimal digits
//! (so the VND amount is multiplied by 100), timestamps use the compact
//! `yyyyMMddHHmmss` format, and the request advertises a 15-minute
//! expiry. That window binds the provider side only; inbound
//! confirmations are accepted for any still-pending record.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::domain::foundation::{PaymentId, Timestamp};
use crate::domain::payment::{SecureHashSigner, SECURE_HASH_FIELD};

/// How long the provider should keep the payment page open.
const EXPIRE_MINUTES: i64 = 15;

/// Inputs for one redirect URL.
#[derive(Debug, Clone)]
pub struct RedirectRequest {
    /// Order reference shown to the provider (`vnp_TxnRef`).
    pub order_id: PaymentId,
    /// Amount in VND, whole units.
    pub amount: i64,
    /// Order description shown on the provider's payment page.
    pub order_info: String,
    /// The paying customer's IP address.
    pub ip_addr: String,
    /// Payment page locale (`vn` or `en`).
    pub locale: String,
}

/// Builds signed redirect URLs for the VNPay hosted payment page.
pub struct VnpayRedirectBuilder {
    tmn_code: String,
    payment_url: String,
    return_url: String,
    signer: SecureHashSigner,
}

impl VnpayRedirectBuilder {
    /// Creates a builder from the merchant configuration.
    pub fn new(
        tmn_code: impl Into<String>,
        payment_url: impl Into<String>,
        return_url: impl Into<String>,
        hash_secret: impl Into<String>,
    ) -> Self {
        Self {
            tmn_code: tmn_code.into(),
            payment_url: payment_url.into(),
            return_url: return_url.into(),
            signer: SecureHashSigner::new(hash_secret),
        }
    }

    /// Builds the full redirect URL, signed, with parameters in sorted
    /// order and the secure hash appended last.
    pub fn build(&self, request: &RedirectRequest, now: Timestamp) -> String {
        let params = self.parameters(request, now);
        let signature = self.signer.sign(&params);

        let mut pairs: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        pairs.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key, value);
        }
        serializer.append_pair(SECURE_HASH_FIELD, &signature);

        format!("{}?{}", self.payment_url, serializer.finish())
    }

    fn parameters(&self, request: &RedirectRequest, now: Timestamp) -> HashMap<String, String> {
        let expire = now.add_minutes(EXPIRE_MINUTES);

        let mut params = HashMap::new();
        params.insert("vnp_Version".to_string(), "2.1.0".to_string());
        params.insert("vnp_Command".to_string(), "pay".to_string());
        params.insert("vnp_TmnCode".to_string(), self.tmn_code.clone());
        params.insert("vnp_Locale".to_string(), request.locale.clone());
        params.insert("vnp_CurrCode".to_string(), "VND".to_string());
        params.insert("vnp_TxnRef".to_string(), request.order_id.to_string());
        params.insert("vnp_OrderInfo".to_string(), request.order_info.clone());
        params.insert("vnp_OrderType".to_string(), "other".to_string());
        // Two implied decimal digits, even though VND has none.
        params.insert("vnp_Amount".to_string(), (request.amount * 100).to_string());
        params.insert("vnp_ReturnUrl".to_string(), self.return_url.clone());
        params.insert("vnp_IpAddr".to_string(), request.ip_addr.clone());
        params.insert("vnp_CreateDate".to_string(), now.to_compact_string());
        params.insert("vnp_ExpireDate".to_string(), expire.to_compact_string());
        params
    }
}
