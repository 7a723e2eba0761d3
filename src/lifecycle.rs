#![forbid(unsafe_code)]

//! Host lifecycle states and the observer registry that reports transitions.
//!
//! A [`Lifecycle`] is the binding layer's view of its host: a current
//! [`LifecycleState`] plus a synchronous observer list. Hosts (or tests)
//! drive it with [`Lifecycle::set_state`]; the binding machinery attaches
//! observers with [`Lifecycle::observe`] and waits for state windows with
//! [`when_state_at_least`].
//!
//! # Invariants
//!
//! 1. States are totally ordered: `Destroyed < Initialized < Created <
//!    Started < Resumed`. `Destroyed` is terminal.
//! 2. Registering an observer synchronously delivers one catch-up
//!    notification carrying the current state.
//! 3. `set_state` notifies observers in registration order. Observers
//!    removed mid-pass are skipped; observers added mid-pass see only
//!    later transitions.
//! 4. Reaching `Destroyed` drops every observer after the final
//!    notification, so nothing outlives the host.
//! 5. Everything here is single-threaded (`Rc`-based, `!Send`); callbacks
//!    run on the caller's stack with no queuing.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Discrete host lifecycle state, ordered from terminal to fully active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Terminal state. Bindings are implicitly torn down here.
    Destroyed,
    /// Host exists but has not been created yet.
    Initialized,
    /// Host is created but not visible.
    Created,
    /// Host is visible.
    Started,
    /// Host is visible and in the foreground.
    Resumed,
}

impl LifecycleState {
    /// Whether this state satisfies `threshold`.
    #[must_use]
    pub fn is_at_least(self, threshold: LifecycleState) -> bool {
        self >= threshold
    }

    /// Whether this is the terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Destroyed)
    }
}

/// Token identifying one registered observer, used for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type ObserverFn = Rc<RefCell<dyn FnMut(LifecycleState)>>;

struct Registry {
    state: LifecycleState,
    observers: Vec<(ObserverId, ObserverFn)>,
    next_id: u64,
}

/// Shared handle to one host's lifecycle registry.
///
/// Cheap to clone; all clones view the same state and observer list.
#[derive(Clone)]
pub struct Lifecycle {
    registry: Rc<RefCell<Registry>>,
}

impl Lifecycle {
    /// Create a registry in the `Initialized` state with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                state: LifecycleState::Initialized,
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.registry.borrow().state
    }

    /// Register an observer for every future transition.
    ///
    /// The observer is invoked synchronously once, before this call
    /// returns, with the current state. This mirrors the catch-up
    /// delivery UI lifecycle registries perform, and is what lets a
    /// binding established while the host is already active start
    /// immediately.
    pub fn observe(&self, callback: impl FnMut(LifecycleState) + 'static) -> ObserverId {
        let callback: ObserverFn = Rc::new(RefCell::new(callback));
        let (id, current) = {
            let mut registry = self.registry.borrow_mut();
            let id = ObserverId(registry.next_id);
            registry.next_id += 1;
            registry.observers.push((id, Rc::clone(&callback)));
            (id, registry.state)
        };
        (callback.borrow_mut())(current);
        id
    }

    /// Remove an observer. Removing an unknown or already-removed id is
    /// a no-op.
    pub fn remove_observer(&self, id: ObserverId) {
        self.registry
            .borrow_mut()
            .observers
            .retain(|(oid, _)| *oid != id);
    }

    /// Move to `next` and notify every observer.
    ///
    /// Observers run on this call's stack, in registration order. After a
    /// transition to `Destroyed` the observer list is cleared.
    pub fn set_state(&self, next: LifecycleState) {
        self.registry.borrow_mut().state = next;
        // Snapshot so observers may register or remove observers while we
        // iterate. Entries removed mid-pass are skipped.
        let snapshot: Vec<(ObserverId, ObserverFn)> = self.registry.borrow().observers.clone();
        for (id, callback) in snapshot {
            let still_registered = self
                .registry
                .borrow()
                .observers
                .iter()
                .any(|(oid, _)| *oid == id);
            if still_registered {
                (callback.borrow_mut())(next);
            }
        }
        if next.is_terminal() {
            self.registry.borrow_mut().observers.clear();
        }
    }

    /// Number of currently registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.borrow().observers.len()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("state", &self.state())
            .field("observer_count", &self.observer_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// when_state_at_least — awaitable state window
// ---------------------------------------------------------------------------

/// Outcome of [`when_state_at_least`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateWait {
    /// The state reached (or already satisfied) the threshold.
    Reached,
    /// The host was destroyed before the threshold was reached.
    Abandoned,
}

/// Wait until the lifecycle state satisfies `threshold`.
///
/// Resolves immediately with [`StateWait::Reached`] when the current state
/// already satisfies the threshold, and with [`StateWait::Abandoned`] once
/// the host is destroyed. Dropping the future detaches its observer.
pub fn when_state_at_least(lifecycle: &Lifecycle, threshold: LifecycleState) -> StateAtLeast {
    StateAtLeast {
        lifecycle: lifecycle.clone(),
        threshold,
        observer: None,
        waker: Rc::new(RefCell::new(None)),
    }
}

/// Future returned by [`when_state_at_least`].
pub struct StateAtLeast {
    lifecycle: Lifecycle,
    threshold: LifecycleState,
    observer: Option<ObserverId>,
    waker: Rc<RefCell<Option<Waker>>>,
}

impl StateAtLeast {
    fn detach(&mut self) {
        if let Some(id) = self.observer.take() {
            self.lifecycle.remove_observer(id);
        }
    }
}

impl Future for StateAtLeast {
    type Output = StateWait;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<StateWait> {
        let this = self.get_mut();
        let state = this.lifecycle.state();
        if state.is_terminal() {
            this.detach();
            return Poll::Ready(StateWait::Abandoned);
        }
        if state >= this.threshold {
            this.detach();
            return Poll::Ready(StateWait::Reached);
        }
        *this.waker.borrow_mut() = Some(cx.waker().clone());
        if this.observer.is_none() {
            // The catch-up notification fires here with a state we just saw
            // to be below threshold and non-terminal, so it cannot wake.
            let waker = Rc::clone(&this.waker);
            let threshold = this.threshold;
            this.observer = Some(this.lifecycle.observe(move |state| {
                if state.is_terminal() || state >= threshold {
                    if let Some(waker) = waker.borrow_mut().take() {
                        waker.wake();
                    }
                }
            }));
        }
        Poll::Pending
    }
}

impl Drop for StateAtLeast {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for StateAtLeast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateAtLeast")
            .field("threshold", &self.threshold)
            .field("attached", &self.observer.is_some())
            .finish()
    }
}
