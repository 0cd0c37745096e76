//! Payment domain: plans, ledger records, bank transfer instructions,
//! and the canonical secure-hash scheme.

mod bank_transfer;
mod callback;
mod errors;
mod method;
mod plan;
mod record;
mod secure_hash;
mod status;

pub use bank_transfer::{transfer_content, BankAccount, BankTransferInstructions};
pub use callback::{
    AckCode, VnpayCallback, RESPONSE_CODE_FIELD, RESPONSE_CODE_SUCCESS, TRANSACTION_NO_FIELD,
    TXN_REF_FIELD,
};
pub use errors::CallbackError;
pub use method::PaymentMethod;
pub use plan::Plan;
pub use record::PaymentRecord;
pub use secure_hash::{SecureHashSigner, SECURE_HASH_FIELD, SECURE_HASH_TYPE_FIELD};
pub use status::PaymentStatus;
