//! Payment status state machine.
//!
//! A payment attempt starts PENDING and transitions exactly once to a
//! terminal state. Terminal states absorb every later confirmation,
//! which is what makes duplicate provider deliveries harmless.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// Created, awaiting confirmation from the provider or an operator.
    Pending,

    /// Confirmed paid. Terminal.
    Completed,

    /// Rejected or reported failed by the provider. Terminal.
    Failed,
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Pending, Completed) | (Pending, Failed))
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}
