#![forbid(unsafe_code)]

//! Helpers for driving bindings in tests.
//!
//! Bindings require a current-thread runtime with a
//! [`tokio::task::LocalSet`]; [`run_local`] builds that scaffolding around
//! one test body. Spawned drain tasks only make progress when the thread
//! yields to the local queue, so tests call [`pump`] after each lifecycle
//! transition or stream emission before asserting on delivery.

use std::future::Future;

/// Run `future` to completion on a fresh current-thread runtime inside a
/// `LocalSet`, so the body may establish bindings and spawn local tasks.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
pub fn run_local<F: Future>(future: F) -> F::Output {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("current-thread runtime");
    tokio::task::LocalSet::new().block_on(&runtime, future)
}

/// Yield repeatedly so every scheduled local task (and any wake chains it
/// triggers) runs before the caller continues.
pub async fn pump() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
