//! Wedding page publication status.

use serde::{Deserialize, Serialize};

/// Publication state of a wedding page.
///
/// The finalizer writes the paid state unconditionally: a late provider
/// confirmation still grants the entitlement, and an expired page
/// republishes when a new payment lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeddingStatus {
    /// Being edited, not visible to guests.
    Draft,

    /// Free tier, visible during the 7-day demo window.
    Demo,

    /// Paid and live.
    Published,

    /// Entitlement window elapsed.
    Expired,
}
