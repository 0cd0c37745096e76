//! Payment use cases: creation, confirmation gateways, and status poll.

mod confirm_bank_transfer;
mod confirm_provider_callback;
mod create_payment;
mod get_payment_status;

#[cfg(test)]
pub(crate) mod testing;

pub use confirm_bank_transfer::{
    ConfirmBankTransferCommand, ConfirmBankTransferHandler, ConfirmBankTransferResult,
    ManualAction,
};
pub use confirm_provider_callback::{
    CallbackAck, ConfirmProviderCallbackCommand, ConfirmProviderCallbackHandler,
};
pub use create_payment::{
    CreatePaymentCommand, CreatePaymentHandler, CreatePaymentResult, PaymentArtifact,
};
pub use get_payment_status::{GetPaymentStatusHandler, GetPaymentStatusQuery, PaymentStatusView};
