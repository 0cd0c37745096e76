//! Wedding read model used by the payment subsystem.

use crate::domain::foundation::{Timestamp, UserId, WeddingId};
use crate::domain::payment::Plan;

use super::WeddingStatus;

/// The slice of a wedding this subsystem reads: ownership and current
/// entitlement. The full wedding content (couple names, templates, guests)
/// is owned by other parts of the platform.
#[derive(Debug, Clone)]
pub struct Wedding {
    pub id: WeddingId,
    pub owner_user_id: UserId,
    pub status: WeddingStatus,
    pub plan: Plan,
    pub paid_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl Wedding {
    /// Creation-time purchase guard: on an already-published wedding, only
    /// a strictly higher tier may be purchased.
    pub fn allows_purchase_of(&self, requested: Plan) -> bool {
        if self.status == WeddingStatus::Published {
            requested.rank() > self.plan.rank()
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wedding(status: WeddingStatus, plan: Plan) -> Wedding {
        Wedding {
            id: WeddingId::new(),
            owner_user_id: UserId::new("owner-1").unwrap(),
            status,
            plan,
            paid_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn published_wedding_rejects_same_tier() {
        let w = wedding(WeddingStatus::Published, Plan::Standard);
        assert!(!w.allows_purchase_of(Plan::Standard));
    }

    #[test]
    fn published_wedding_rejects_lower_tier() {
        let w = wedding(WeddingStatus::Published, Plan::Standard);
        assert!(!w.allows_purchase_of(Plan::Basic));
    }

    #[test]
    fn published_wedding_allows_upgrade() {
        let w = wedding(WeddingStatus::Published, Plan::Basic);
        assert!(w.allows_purchase_of(Plan::Premium));
    }

    #[test]
    fn unpublished_wedding_allows_any_tier() {
        for status in [
            WeddingStatus::Draft,
            WeddingStatus::Demo,
            WeddingStatus::Expired,
        ] {
            let w = wedding(status, Plan::Premium);
            assert!(w.allows_purchase_of(Plan::Basic));
        }
    }
}
