//! Generic state machine contract for status enums.

/// Trait for status enums with an explicit transition table.
pub trait StateMachine: Sized + Copy + PartialEq {
    /// Returns true if a transition from `self` to `target` is allowed.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns true if no transition leaves this state.
    fn is_terminal(&self) -> bool;
}
