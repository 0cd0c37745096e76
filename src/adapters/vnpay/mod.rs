//! VNPay provider adapter (outbound side).

mod redirect;

pub use redirect::{RedirectRequest, VnpayRedirectBuilder};
