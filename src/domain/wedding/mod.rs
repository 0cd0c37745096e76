//! Wedding domain: publication status and entitlement computation.

mod entitlement;
mod status;
#[allow(clippy::module_inception)]
mod wedding;

pub use entitlement::{compute_expiry, EntitlementGrant};
pub use status::WeddingStatus;
pub use wedding::Wedding;
