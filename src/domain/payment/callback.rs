//! Provider callback parsing and verification.
//!
//! Both delivery modes of a payment confirmation, the user's browser
//! return-redirect and the asynchronous server-to-server IPN, carry the
//! same signed parameter set. Verification must pass before any field is
//! read as fact.

use std::collections::HashMap;

use crate::domain::foundation::PaymentId;

use super::errors::CallbackError;
use super::secure_hash::{SecureHashSigner, SECURE_HASH_FIELD};

/// Provider response code meaning the customer paid successfully.
pub const RESPONSE_CODE_SUCCESS: &str = "00";

/// Order reference parameter (this system's payment id).
pub const TXN_REF_FIELD: &str = "vnp_TxnRef";

/// Provider outcome code parameter.
pub const RESPONSE_CODE_FIELD: &str = "vnp_ResponseCode";

/// Provider transaction number parameter.
pub const TRANSACTION_NO_FIELD: &str = "vnp_TransactionNo";

/// Acknowledgment codes this subsystem emits on the callback endpoints.
///
/// The provider retries until it sees a success-shaped acknowledgment, so
/// `AlreadyConfirmed` is deliberately success-shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckCode {
    /// Confirmation recorded (including a recorded failure outcome).
    Confirmed,
    /// No payment matches the order reference.
    OrderNotFound,
    /// The payment was already in a terminal state.
    AlreadyConfirmed,
    /// Secure hash verification failed.
    InvalidChecksum,
    /// Unexpected processing error; safe for the provider to retry.
    UnknownError,
}

impl AckCode {
    /// The provider's numeric code for this acknowledgment.
    pub fn as_str(&self) -> &'static str {
        match self {
            AckCode::Confirmed => "00",
            AckCode::OrderNotFound => "01",
            AckCode::AlreadyConfirmed => "02",
            AckCode::InvalidChecksum => "97",
            AckCode::UnknownError => "99",
        }
    }

    /// Human-readable message accompanying the code.
    pub fn message(&self) -> &'static str {
        match self {
            AckCode::Confirmed => "Confirm Success",
            AckCode::OrderNotFound => "Order not found",
            AckCode::AlreadyConfirmed => "Order already confirmed",
            AckCode::InvalidChecksum => "Invalid checksum",
            AckCode::UnknownError => "Unknown error",
        }
    }
}

impl CallbackError {
    /// Maps a processing error into the provider's acknowledgment
    /// vocabulary. Callback endpoints never surface transport failures;
    /// the provider's retry behavior is driven by this code alone.
    pub fn ack_code(&self) -> AckCode {
        match self {
            CallbackError::InvalidSignature => AckCode::InvalidChecksum,
            CallbackError::MissingField(SECURE_HASH_FIELD) => AckCode::InvalidChecksum,
            CallbackError::MissingField(_) => AckCode::UnknownError,
            CallbackError::OrderNotFound => AckCode::OrderNotFound,
            CallbackError::Persistence(_) => AckCode::UnknownError,
        }
    }
}

/// A verified, parsed provider callback.
#[derive(Debug, Clone)]
pub struct VnpayCallback {
    /// The payment this confirmation refers to.
    pub order_id: PaymentId,
    /// The provider's outcome code (`00` = paid).
    pub response_code: String,
    /// The provider's transaction reference, if present.
    pub transaction_id: Option<String>,
}

impl VnpayCallback {
    /// Verifies the secure hash and extracts the fields this subsystem
    /// consumes.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the hash or a consumed parameter is absent
    /// - `InvalidSignature` if verification fails
    /// - `OrderNotFound` if the order reference is not a well-formed
    ///   payment id (it can never match a ledger row)
    pub fn verify_and_parse(
        signer: &SecureHashSigner,
        params: &HashMap<String, String>,
    ) -> Result<Self, CallbackError> {
        let candidate = params
            .get(SECURE_HASH_FIELD)
            .ok_or(CallbackError::MissingField(SECURE_HASH_FIELD))?;

        if !signer.verify(params, candidate) {
            return Err(CallbackError::InvalidSignature);
        }

        let txn_ref = params
            .get(TXN_REF_FIELD)
            .ok_or(CallbackError::MissingField(TXN_REF_FIELD))?;
        let order_id: PaymentId = txn_ref
            .parse()
            .map_err(|_| CallbackError::OrderNotFound)?;

        let response_code = params
            .get(RESPONSE_CODE_FIELD)
            .ok_or(CallbackError::MissingField(RESPONSE_CODE_FIELD))?
            .clone();

        let transaction_id = params.get(TRANSACTION_NO_FIELD).cloned();

        Ok(Self {
            order_id,
            response_code,
            transaction_id,
        })
    }

    /// Returns true if the provider reports the customer paid.
    pub fn is_success(&self) -> bool {
        self.response_code == RESPONSE_CODE_SUCCESS
    }
}
