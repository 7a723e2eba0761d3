#![forbid(unsafe_code)]

//! Inbound bindings: drain a stream while the host is active and deliver
//! each item through the echo gate.
//!
//! Two delivery modes:
//!
//! - [`bind_in`] — fire-and-forget: the callback runs synchronously inside
//!   the drain task as soon as an item passes the live-state check and the
//!   gate.
//! - [`bind_in_guarded`] — state-guarded: before each (suspendable)
//!   delivery the drain re-acquires the threshold via
//!   [`when_state_at_least`], deferring the callback until the state next
//!   satisfies it and abandoning the drain if the host is destroyed first.
//!   The threshold is re-checked at time of invocation, not held
//!   continuously through the delivery.
//!
//! In both modes the live state is re-read per item: an item drained just
//! before the window closed is consumed but not delivered. Gate-suppressed
//! items are likewise consumed without delivery.
//!
//! The bound stream is shared across activation windows: when the window
//! closes and reopens, the replacement task resumes the same stream rather
//! than restarting it, so hot sources (channels, state flows) deliver
//! pending items exactly once.

use std::cell::RefCell;
use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::rc::Rc;

use futures_core::Stream;

use crate::binding::InBinding;
use crate::gate::EchoGate;
use crate::lifecycle::{Lifecycle, LifecycleState, StateWait, when_state_at_least};
use crate::schedule::bind_activation;

/// Default minimum state for bindings that do not choose their own: the
/// host is visible but need not be foregrounded.
pub const DEFAULT_MIN_STATE: LifecycleState = LifecycleState::Started;

pub(crate) type SharedStream<T> = Rc<RefCell<Pin<Box<dyn Stream<Item = T>>>>>;

/// Pull the next item, borrowing the shared stream only inside each poll
/// so no borrow is ever held across a suspension point.
pub(crate) async fn next_item<T>(stream: &SharedStream<T>) -> Option<T> {
    poll_fn(|cx| stream.borrow_mut().as_mut().poll_next(cx)).await
}

/// Bind `stream` to `pipe` with fire-and-forget delivery.
///
/// While the lifecycle state satisfies `threshold`, items are drained in
/// emission order and handed to `pipe`, skipping any item the binding's
/// [`EchoGate`] recognizes as an outbound echo.
///
/// Must be called on the UI thread, inside a
/// [`LocalSet`](tokio::task::LocalSet) context, while the host is in its
/// creation phase. Panics from `pipe` propagate out of the drain task.
pub fn bind_in<T, S, P>(
    lifecycle: &Lifecycle,
    stream: S,
    threshold: LifecycleState,
    pipe: P,
) -> InBinding<T>
where
    T: PartialEq + 'static,
    S: Stream<Item = T> + 'static,
    P: FnMut(T) + 'static,
{
    let gate = EchoGate::new();
    let stream: SharedStream<T> = Rc::new(RefCell::new(Box::pin(stream)));
    let pipe = Rc::new(RefCell::new(pipe));

    let teardown = bind_activation(lifecycle, threshold, {
        let lifecycle = lifecycle.clone();
        let gate = gate.clone();
        move || {
            let lifecycle = lifecycle.clone();
            let gate = gate.clone();
            let stream = Rc::clone(&stream);
            let pipe = Rc::clone(&pipe);
            async move {
                while let Some(value) = next_item(&stream).await {
                    // Live re-check: the drain may have suspended and the
                    // window may have closed before this item arrived.
                    if lifecycle.state() >= threshold && !gate.matches(&value) {
                        (pipe.borrow_mut())(value);
                    }
                }
            }
        }
    });

    InBinding::from_parts(lifecycle.clone(), threshold, gate, teardown)
}

/// Bind `stream` to a suspendable `pipe` with state-guarded delivery.
///
/// Like [`bind_in`], but each delivery first re-acquires the threshold via
/// [`when_state_at_least`]. A delivery deferred by that wait is abandoned,
/// along with the rest of the drain, if the host is destroyed first; a
/// cancellation of the drain task abandons it at the suspension point.
pub fn bind_in_guarded<T, S, P, Fut>(
    lifecycle: &Lifecycle,
    stream: S,
    threshold: LifecycleState,
    pipe: P,
) -> InBinding<T>
where
    T: PartialEq + 'static,
    S: Stream<Item = T> + 'static,
    P: FnMut(T) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let gate = EchoGate::new();
    let stream: SharedStream<T> = Rc::new(RefCell::new(Box::pin(stream)));
    let pipe = Rc::new(RefCell::new(pipe));

    let teardown = bind_activation(lifecycle, threshold, {
        let lifecycle = lifecycle.clone();
        let gate = gate.clone();
        move || {
            let lifecycle = lifecycle.clone();
            let gate = gate.clone();
            let stream = Rc::clone(&stream);
            let pipe = Rc::clone(&pipe);
            async move {
                while let Some(value) = next_item(&stream).await {
                    if lifecycle.state() >= threshold && !gate.matches(&value) {
                        match when_state_at_least(&lifecycle, threshold).await {
                            StateWait::Reached => {
                                let delivery = (pipe.borrow_mut())(value);
                                delivery.await;
                            }
                            StateWait::Abandoned => return,
                        }
                    }
                }
            }
        }
    });

    InBinding::from_parts(lifecycle.clone(), threshold, gate, teardown)
}
