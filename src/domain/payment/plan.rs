//! Plan tier definitions and pricing.

use serde::{Deserialize, Serialize};

/// Subscription plan for a published wedding page.
///
/// Tiers are strictly ordered; a published page may only be re-purchased
/// at a strictly higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    /// Demo tier assigned at creation. 7-day window, never purchasable.
    Free,

    /// Entry tier, valid for 6 months.
    Basic,

    /// Mid tier, valid for 1 year.
    Standard,

    /// Top tier, never expires.
    Premium,
}

impl Plan {
    /// Returns the numeric rank of this plan for upgrade comparison.
    ///
    /// Higher rank = higher tier.
    pub fn rank(&self) -> u8 {
        match self {
            Plan::Free => 0,
            Plan::Basic => 1,
            Plan::Standard => 2,
            Plan::Premium => 3,
        }
    }

    /// Returns the price in VND (whole units), or `None` for tiers that
    /// cannot be purchased.
    pub fn price_vnd(&self) -> Option<i64> {
        match self {
            Plan::Free => None,
            Plan::Basic => Some(500_000),
            Plan::Standard => Some(1_000_000),
            Plan::Premium => Some(2_000_000),
        }
    }

    /// Returns the entitlement duration in days, or `None` for plans that
    /// never expire.
    ///
    /// The FREE duration is the demo window applied at wedding creation,
    /// not via payment.
    pub fn duration_days(&self) -> Option<i64> {
        match self {
            Plan::Free => Some(7),
            Plan::Basic => Some(180),
            Plan::Standard => Some(365),
            Plan::Premium => None,
        }
    }

    /// Returns the uppercase wire code used in transfer content and the
    /// provider order description.
    pub fn code(&self) -> &'static str {
        match self {
            Plan::Free => "FREE",
            Plan::Basic => "BASIC",
            Plan::Standard => "STANDARD",
            Plan::Premium => "PREMIUM",
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
