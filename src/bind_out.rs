#![forbid(unsafe_code)]

//! Outbound bindings: forward UI-originated values to a sink, recording
//! them in the echo gate so the inbound leg ignores their echo.
//!
//! Both variants consume an existing [`InBinding`] and return a new one
//! whose teardown runs the inbound cleanup first, then the outbound
//! unregistration.
//!
//! The gate write happens strictly before the sink runs. A sink that
//! synchronously triggers a re-entrant emission of the same value is
//! therefore suppressed by the gate rather than looping; re-entrant calls
//! with a new value simply record again.

use std::cell::RefCell;
use std::rc::Rc;

use futures_core::Stream;
use tracing::trace;

use crate::bind_in::{SharedStream, next_item};
use crate::binding::InBinding;
use crate::schedule::bind_activation;

/// Boxed change observer handed to a widget's registration function.
pub type OutboundObserver<T> = Box<dyn FnMut(T)>;

impl<T: Clone + PartialEq + 'static> InBinding<T> {
    /// Attach an outbound leg through a callback-registration function.
    ///
    /// `observe` receives the observer to install and returns the matching
    /// unregistration, which is composed into the returned binding's
    /// teardown after the inbound leg's own cleanup.
    ///
    /// For each observed value: if the gate already holds it, the sink is
    /// skipped; otherwise the gate records it and `pipe` runs.
    #[must_use = "the returned binding carries the composed teardown"]
    pub fn bind_out<O, U, P>(self, observe: O, mut pipe: P) -> InBinding<T>
    where
        O: FnOnce(OutboundObserver<T>) -> U,
        U: FnOnce() + 'static,
        P: FnMut(T) + 'static,
    {
        let gate = self.gate.clone();
        let unregister = observe(Box::new(move |value: T| {
            if gate.matches(&value) {
                trace!("suppressing duplicate outbound value");
                return;
            }
            gate.record(value.clone());
            pipe(value);
        }));

        let Self {
            lifecycle,
            threshold,
            gate,
            teardown,
        } = self;
        InBinding::from_parts(lifecycle, threshold, gate, teardown.and(unregister))
    }

    /// Attach an outbound leg fed by a second stream, drained under the
    /// same lifecycle and threshold as the inbound leg.
    ///
    /// Values equal to the gate's current contents are consumed without
    /// reaching `pipe`; all others are recorded and forwarded.
    #[must_use = "the returned binding carries the composed teardown"]
    pub fn bind_out_stream<S, P>(self, stream: S, pipe: P) -> InBinding<T>
    where
        S: Stream<Item = T> + 'static,
        P: FnMut(T) + 'static,
    {
        let gate = self.gate.clone();
        let stream: SharedStream<T> = Rc::new(RefCell::new(Box::pin(stream)));
        let pipe = Rc::new(RefCell::new(pipe));

        let outbound = bind_activation(&self.lifecycle, self.threshold, move || {
            let gate = gate.clone();
            let stream = Rc::clone(&stream);
            let pipe = Rc::clone(&pipe);
            async move {
                while let Some(value) = next_item(&stream).await {
                    if gate.matches(&value) {
                        trace!("suppressing duplicate outbound value");
                        continue;
                    }
                    gate.record(value.clone());
                    (pipe.borrow_mut())(value);
                }
            }
        });

        let Self {
            lifecycle,
            threshold,
            gate,
            teardown,
        } = self;
        InBinding::from_parts(
            lifecycle,
            threshold,
            gate,
            teardown.and(move || outbound.run()),
        )
    }
}
