//! Error taxonomy for the confirmation boundary.
//!
//! Errors on the provider-facing callback endpoints are never surfaced as
//! transport failures; the HTTP adapter translates them into the
//! provider's acknowledgment vocabulary, because the provider's retry
//! behavior is driven by that field.

use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur while processing a provider confirmation.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Secure hash verification failed; the input is untrusted and no
    /// mutation may happen.
    #[error("Invalid secure hash")]
    InvalidSignature,

    /// A required callback parameter is absent.
    #[error("Missing callback field: {0}")]
    MissingField(&'static str),

    /// The order reference does not match any payment record.
    #[error("Order not found")]
    OrderNotFound,

    /// The persistence layer failed. Transient: no partial state is ever
    /// observably committed, so the provider may safely retry.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl From<DomainError> for CallbackError {
    fn from(err: DomainError) -> Self {
        CallbackError::Persistence(err.to_string())
    }
}
