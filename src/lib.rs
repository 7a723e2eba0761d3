#![forbid(unsafe_code)]

//! Lifecycle-gated reactive bindings.
//!
//! `lifebind` connects asynchronous value streams to a host object's
//! lifecycle: a bound stream is drained only while the host's state
//! satisfies a minimum threshold, and the drain task is started, aborted,
//! and re-started automatically as the state crosses that threshold. The
//! inverse direction — UI-originated events flowing back to a sink — goes
//! through the same binding with duplicate-value suppression, so a value
//! written to a widget does not come back around as a fresh change.
//!
//! # Building blocks
//!
//! - [`Lifecycle`] / [`LifecycleState`]: the host's ordered state and the
//!   observer registry that reports transitions.
//! - [`bind_activation`]: the active-window scheduler; at most one live
//!   task per binding, started on upward threshold crossings and aborted
//!   on downward ones.
//! - [`bind_in`] / [`bind_in_guarded`]: drain a stream into a callback,
//!   fire-and-forget or re-acquiring the state window per delivery.
//! - [`InBinding::bind_out`] / [`InBinding::bind_out_stream`]: the
//!   outbound leg, writing the [`EchoGate`] before the sink runs.
//! - [`widgets`]: toggle/text control adapters over the above.
//!
//! # Usage
//!
//! ```ignore
//! use lifebind::{bind_in, Lifecycle, LifecycleState};
//!
//! let lifecycle = Lifecycle::new();
//! let binding = bind_in(&lifecycle, titles, LifecycleState::Started, |title| {
//!     header.set_text(&title);
//! });
//!
//! lifecycle.set_state(LifecycleState::Resumed); // drain starts
//! lifecycle.set_state(LifecycleState::Created); // drain aborts
//! binding.unbind();                             // permanent, idempotent
//! ```
//!
//! # Threading
//!
//! Everything is single-threaded by construction: handles are `Rc`-based
//! and `!Send`, drain tasks are spawned with `tokio::task::spawn_local`,
//! and bind calls must happen inside a [`tokio::task::LocalSet`] on the
//! host's UI thread (`spawn_local` panics elsewhere). No locking exists
//! anywhere because no concurrent mutation can exist.

pub mod bind_in;
pub mod bind_out;
pub mod binding;
pub mod gate;
pub mod lifecycle;
pub mod schedule;
pub mod teardown;
pub mod testing;
pub mod widgets;

pub use bind_in::{DEFAULT_MIN_STATE, bind_in, bind_in_guarded};
pub use bind_out::OutboundObserver;
pub use binding::InBinding;
pub use gate::EchoGate;
pub use lifecycle::{
    Lifecycle, LifecycleState, ObserverId, StateWait, when_state_at_least,
};
pub use schedule::bind_activation;
pub use teardown::Teardown;
pub use widgets::{TextControl, ToggleControl, bind_text, bind_toggle};
