#![forbid(unsafe_code)]

//! Thin widget adapters: two-way bindings for toggle and text controls.
//!
//! A control implements [`ToggleControl`] or [`TextControl`]; the `bind_*`
//! helpers then wire an inbound stream to the control's setter and the
//! control's change events back out to a sink, sharing one echo gate so a
//! programmatic set that re-fires the change listener does not loop.
//!
//! These helpers are exactly `bind_in` + `bind_out` composed with
//! [`DEFAULT_MIN_STATE`]; nothing here touches the core state machine.

use std::rc::Rc;

use futures_core::Stream;

use crate::bind_in::{DEFAULT_MIN_STATE, bind_in};
use crate::bind_out::OutboundObserver;
use crate::binding::InBinding;
use crate::lifecycle::Lifecycle;

/// A two-state control such as a checkbox or switch.
pub trait ToggleControl {
    /// Set the displayed checked state.
    fn set_checked(&self, checked: bool);

    /// Install a change observer; returns its unregistration.
    fn on_checked_changed(&self, observer: OutboundObserver<bool>) -> Box<dyn FnOnce()>;
}

/// An editable text control.
pub trait TextControl {
    /// Set the displayed text.
    fn set_text(&self, text: &str);

    /// Install a change observer; returns its unregistration.
    fn on_text_changed(&self, observer: OutboundObserver<String>) -> Box<dyn FnOnce()>;
}

/// Two-way binding between a boolean stream and a toggle control.
///
/// Inbound values drive `set_checked`; user changes flow to `pipe`.
#[must_use = "the returned binding carries the composed teardown"]
pub fn bind_toggle<C, S, P>(
    lifecycle: &Lifecycle,
    stream: S,
    control: &Rc<C>,
    pipe: P,
) -> InBinding<bool>
where
    C: ToggleControl + 'static,
    S: Stream<Item = bool> + 'static,
    P: FnMut(bool) + 'static,
{
    let view = Rc::clone(control);
    bind_in(lifecycle, stream, DEFAULT_MIN_STATE, move |checked| {
        view.set_checked(checked);
    })
    .bind_out(|observer| control.on_checked_changed(observer), pipe)
}

/// Two-way binding between a string stream and a text control.
///
/// Inbound values drive `set_text`; user edits flow to `pipe`.
#[must_use = "the returned binding carries the composed teardown"]
pub fn bind_text<C, S, P>(
    lifecycle: &Lifecycle,
    stream: S,
    control: &Rc<C>,
    pipe: P,
) -> InBinding<String>
where
    C: TextControl + 'static,
    S: Stream<Item = String> + 'static,
    P: FnMut(String) + 'static,
{
    let view = Rc::clone(control);
    bind_in(lifecycle, stream, DEFAULT_MIN_STATE, move |text: String| {
        view.set_text(&text);
    })
    .bind_out(|observer| control.on_text_changed(observer), pipe)
}
