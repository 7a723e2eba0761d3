#![forbid(unsafe_code)]

//! The active-window scheduler: level-triggered lifecycle notifications in,
//! edge-triggered task start/stop out.
//!
//! [`bind_activation`] attaches an observer to a [`Lifecycle`] and keeps
//! exactly one asynchronous task alive while the state satisfies a
//! threshold. Crossing the threshold upward spawns the block on the current
//! thread's `LocalSet`; crossing downward aborts it. Transitions that stay
//! inside the active region do not restart the block.
//!
//! # Invariants
//!
//! 1. At most one task per call to `bind_activation` is live at any
//!    instant.
//! 2. A task is live iff the most recently observed state satisfies the
//!    threshold (checked after each notification returns).
//! 3. The returned [`Teardown`] removes the observer and aborts any live
//!    task; running it twice is a no-op.
//!
//! # Preconditions
//!
//! Call `bind_activation` once, while the host is in its creation phase,
//! from within a [`tokio::task::LocalSet`] context on the host's UI
//! thread. `spawn_local` panics outside a `LocalSet`, which is the
//! fail-fast for running off-context; the `Rc`-based handles are `!Send`,
//! so cross-thread misuse cannot compile. Re-binding after the host is
//! past its creation phase is unsupported, mirroring the one-time wiring
//! discipline of stateful UI bindings.
//!
//! Cancellation by a lifecycle downgrade is routine control flow: aborted
//! tasks are dropped at their next suspension point and never surface as
//! errors.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use tokio::task::JoinHandle;
use tracing::trace;

use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::teardown::Teardown;

/// Run `block` whenever the lifecycle state crosses `threshold` upward,
/// aborting the spawned task when it crosses back down.
///
/// `block` is a factory invoked once per upward crossing; each invocation
/// produces the future for that activation window. Because observers
/// receive a catch-up notification, binding while the state already
/// satisfies the threshold starts the first task immediately.
///
/// The returned [`Teardown`] detaches the observer and aborts any live
/// task, idempotently. Reaching `Destroyed` does the same implicitly.
pub fn bind_activation<F, Fut>(
    lifecycle: &Lifecycle,
    threshold: LifecycleState,
    mut block: F,
) -> Teardown
where
    F: FnMut() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    debug_assert!(
        threshold > LifecycleState::Destroyed,
        "threshold must name a live state"
    );

    let task: Rc<RefCell<Option<JoinHandle<()>>>> = Rc::new(RefCell::new(None));
    let mut was_active = false;

    let observer = lifecycle.observe({
        let task = Rc::clone(&task);
        move |state| {
            let is_active = state >= threshold;
            if is_active {
                if !was_active {
                    // A handle can linger here if the previous block ran to
                    // completion on its own; abort is a no-op then, and a
                    // guard if a live one ever slips through.
                    if let Some(stale) = task.borrow_mut().take() {
                        stale.abort();
                    }
                    trace!(?state, ?threshold, "activation window opened");
                    let handle = tokio::task::spawn_local(block());
                    *task.borrow_mut() = Some(handle);
                }
            } else if let Some(live) = task.borrow_mut().take() {
                trace!(?state, ?threshold, "activation window closed");
                live.abort();
            }
            was_active = is_active;
        }
    });

    let lifecycle = lifecycle.clone();
    Teardown::new(move || {
        trace!(?threshold, "activation binding torn down");
        lifecycle.remove_observer(observer);
        if let Some(live) = task.borrow_mut().take() {
            live.abort();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{pump, run_local};
    use std::cell::Cell;

    #[test]
    fn block_starts_on_upward_crossing_only() {
        run_local(async {
            let lifecycle = Lifecycle::new();
            let runs = Rc::new(Cell::new(0));
            let r = Rc::clone(&runs);
            let _teardown = bind_activation(&lifecycle, LifecycleState::Started, move || {
                let r = Rc::clone(&r);
                async move {
                    r.set(r.get() + 1);
                    std::future::pending::<()>().await;
                }
            });

            pump().await;
            assert_eq!(runs.get(), 0, "below threshold at bind time");

            lifecycle.set_state(LifecycleState::Resumed);
            pump().await;
            assert_eq!(runs.get(), 1);

            // A transition inside the active region must not restart.
            lifecycle.set_state(LifecycleState::Started);
            pump().await;
            assert_eq!(runs.get(), 1);

            lifecycle.set_state(LifecycleState::Created);
            lifecycle.set_state(LifecycleState::Started);
            pump().await;
            assert_eq!(runs.get(), 2);
        });
    }

    #[test]
    fn binding_while_already_active_starts_immediately() {
        run_local(async {
            let lifecycle = Lifecycle::new();
            lifecycle.set_state(LifecycleState::Resumed);

            let ran = Rc::new(Cell::new(false));
            let r = Rc::clone(&ran);
            let _teardown = bind_activation(&lifecycle, LifecycleState::Started, move || {
                let r = Rc::clone(&r);
                async move { r.set(true) }
            });

            pump().await;
            assert!(ran.get());
        });
    }

    #[test]
    fn teardown_aborts_task_and_detaches_observer() {
        run_local(async {
            let lifecycle = Lifecycle::new();
            lifecycle.set_state(LifecycleState::Resumed);

            let after_suspend = Rc::new(Cell::new(false));
            let a = Rc::clone(&after_suspend);
            let teardown = bind_activation(&lifecycle, LifecycleState::Started, move || {
                let a = Rc::clone(&a);
                async move {
                    tokio::task::yield_now().await;
                    tokio::task::yield_now().await;
                    a.set(true);
                }
            });
            assert_eq!(lifecycle.observer_count(), 1);

            teardown.run();
            teardown.run();
            assert_eq!(lifecycle.observer_count(), 0);

            pump().await;
            assert!(!after_suspend.get(), "aborted task must not resume");
        });
    }

    #[test]
    fn destroy_cancels_and_clears() {
        run_local(async {
            let lifecycle = Lifecycle::new();
            lifecycle.set_state(LifecycleState::Resumed);

            let after_suspend = Rc::new(Cell::new(false));
            let a = Rc::clone(&after_suspend);
            let _teardown = bind_activation(&lifecycle, LifecycleState::Started, move || {
                let a = Rc::clone(&a);
                async move {
                    std::future::pending::<()>().await;
                    a.set(true);
                }
            });
            pump().await;

            lifecycle.set_state(LifecycleState::Destroyed);
            pump().await;
            assert!(!after_suspend.get());
            assert_eq!(lifecycle.observer_count(), 0, "implicit teardown at terminal state");
        });
    }
}
