#![forbid(unsafe_code)]

//! Echo suppression between the two legs of a binding.
//!
//! An [`EchoGate`] remembers the last value the outbound leg delivered so
//! the inbound leg can recognize that same value arriving back and skip it,
//! breaking the feedback loop of a two-way binding.
//!
//! # Invariants
//!
//! 1. The gate starts unset, and an unset gate matches nothing. The slot is
//!    a tagged option rather than a sentinel value, so a domain type that
//!    itself has an "absent" value (e.g. `Option<_>`) can never collide
//!    with the unset marker.
//! 2. Only the outbound leg writes ([`EchoGate::record`]); the inbound leg
//!    only reads ([`EchoGate::matches`]).
//! 3. The outbound leg records strictly before invoking its sink, so a
//!    sink that synchronously echoes the value back inbound is suppressed.
//!    Recording an already-recorded value is harmless, which keeps
//!    re-entrant deliveries safe.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Single-slot memo of the last outbound value, shared by both legs of a
/// binding. Clones view the same slot.
pub struct EchoGate<T> {
    last: Rc<RefCell<Option<T>>>,
}

impl<T> Clone for EchoGate<T> {
    fn clone(&self) -> Self {
        Self {
            last: Rc::clone(&self.last),
        }
    }
}

impl<T: PartialEq> EchoGate<T> {
    /// Create an unset gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Rc::new(RefCell::new(None)),
        }
    }

    /// Whether `candidate` equals the last recorded outbound value.
    ///
    /// Always false while the gate is unset.
    #[must_use]
    pub fn matches(&self, candidate: &T) -> bool {
        self.last.borrow().as_ref() == Some(candidate)
    }

    /// Record an outbound value, replacing any previous one.
    pub fn record(&self, value: T) {
        *self.last.borrow_mut() = Some(value);
    }

    /// Whether any outbound value has been recorded yet.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.last.borrow().is_some()
    }
}

impl<T: PartialEq> Default for EchoGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for EchoGate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EchoGate")
            .field("last", &self.last.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_gate_matches_nothing() {
        let gate = EchoGate::new();
        assert!(!gate.is_set());
        assert!(!gate.matches(&0));
        assert!(!gate.matches(&i32::MIN));
    }

    #[test]
    fn unset_gate_does_not_match_absent_domain_values() {
        // The bound type may itself have a legitimate "absent" value; the
        // unset slot must still not equal it.
        let gate: EchoGate<Option<i32>> = EchoGate::new();
        assert!(!gate.matches(&None));

        gate.record(None);
        assert!(gate.matches(&None));
        assert!(!gate.matches(&Some(1)));
    }

    #[test]
    fn recorded_value_matches_until_replaced() {
        let gate = EchoGate::new();
        gate.record(7);
        assert!(gate.matches(&7));
        assert!(!gate.matches(&8));

        gate.record(8);
        assert!(gate.matches(&8));
        assert!(!gate.matches(&7));
    }

    #[test]
    fn re_recording_same_value_is_harmless() {
        let gate = EchoGate::new();
        gate.record("on".to_string());
        gate.record("on".to_string());
        assert!(gate.matches(&"on".to_string()));
    }

    #[test]
    fn clones_share_the_slot() {
        let gate = EchoGate::new();
        let reader = gate.clone();
        gate.record(true);
        assert!(reader.matches(&true));
    }
}
