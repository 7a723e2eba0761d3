#![forbid(unsafe_code)]

//! The handle returned to callers for one bound connection.

use std::fmt;

use crate::gate::EchoGate;
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::teardown::Teardown;

/// One bound connection between a stream and a delivery target, scoped to
/// a host lifecycle and a minimum-state threshold.
///
/// Produced by [`bind_in`](crate::bind_in) /
/// [`bind_in_guarded`](crate::bind_in_guarded); extended with an outbound
/// leg via [`bind_out`](InBinding::bind_out) /
/// [`bind_out_stream`](InBinding::bind_out_stream).
///
/// Dropping the handle does not tear the binding down: callers that never
/// unbind explicitly rely on the implicit teardown when the host reaches
/// its terminal state.
pub struct InBinding<T> {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) threshold: LifecycleState,
    pub(crate) gate: EchoGate<T>,
    pub(crate) teardown: Teardown,
}

impl<T> InBinding<T> {
    pub(crate) fn from_parts(
        lifecycle: Lifecycle,
        threshold: LifecycleState,
        gate: EchoGate<T>,
        teardown: Teardown,
    ) -> Self {
        Self {
            lifecycle,
            threshold,
            gate,
            teardown,
        }
    }

    /// The host lifecycle this binding is scoped to.
    #[must_use]
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Minimum state required for this binding to be active.
    #[must_use]
    pub fn threshold(&self) -> LifecycleState {
        self.threshold
    }

    /// The echo gate shared between this binding's legs.
    #[must_use]
    pub fn gate(&self) -> &EchoGate<T> {
        &self.gate
    }

    /// Permanently deactivate the binding. Idempotent.
    pub fn unbind(&self) {
        self.teardown.run();
    }
}

impl<T> fmt::Debug for InBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InBinding")
            .field("state", &self.lifecycle.state())
            .field("threshold", &self.threshold)
            .finish()
    }
}
