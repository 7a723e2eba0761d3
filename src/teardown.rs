#![forbid(unsafe_code)]

//! Composable, idempotent one-shot cleanup.
//!
//! A [`Teardown`] is an ordered list of cleanup actions behind a shared
//! handle. [`Teardown::run`] drains the list and executes each action once;
//! later calls find the list empty and do nothing. Composition with
//! [`Teardown::and`] appends, so an outbound leg's unregistration always
//! runs after the inbound leg's cleanup it was layered on.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type CleanupFn = Box<dyn FnOnce()>;

/// Shared one-shot cleanup handle.
///
/// Clones share the same action list: whichever clone runs first consumes
/// every action.
#[derive(Clone)]
pub struct Teardown {
    actions: Rc<RefCell<Vec<CleanupFn>>>,
}

impl Teardown {
    /// Create a teardown with a single action.
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            actions: Rc::new(RefCell::new(vec![Box::new(action)])),
        }
    }

    /// Create a teardown with no actions.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            actions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Append an action, to run after every action already present.
    #[must_use]
    pub fn and(self, action: impl FnOnce() + 'static) -> Self {
        self.actions.borrow_mut().push(Box::new(action));
        self
    }

    /// Run and discard all pending actions, in order.
    ///
    /// Safe to call any number of times; only the first call (per action)
    /// does work. Re-entrant calls from within an action see an empty list.
    pub fn run(&self) {
        let actions = std::mem::take(&mut *self.actions.borrow_mut());
        for action in actions {
            action();
        }
    }

    /// Number of actions that have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.actions.borrow().len()
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown")
            .field("pending", &self.pending())
            .finish()
    }
}
