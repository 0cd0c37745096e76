//! Wedding reader port.
//!
//! Read-only access to the entitlement slice of a wedding. Used for the
//! creation-time purchase guard and for ownership checks on the status
//! poll endpoint. All entitlement writes go through `PaymentFinalizer`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, WeddingId};
use crate::domain::wedding::Wedding;

/// Read port for wedding ownership and entitlement state.
#[async_trait]
pub trait WeddingReader: Send + Sync {
    /// Finds a wedding by id. Returns `None` if unknown.
    async fn find_by_id(&self, id: &WeddingId) -> Result<Option<Wedding>, DomainError>;
}
