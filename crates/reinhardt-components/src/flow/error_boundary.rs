use std::cell::Cell;
use std::rc::Rc;

use crate::component::{Component, WeakComponent};
use crate::error::UiError;
use crate::fragment::{Fragment, IntoComponent};

type Fallback = Rc<dyn Fn(&UiError, ResetHandle) -> Fragment>;

struct BoundaryState {
	body: Rc<dyn Fn() -> Fragment>,
	fallback: Fallback,
	failed: Cell<bool>,
}

/// Catches errors raised anywhere in its body and renders a fallback.
///
/// The fallback receives the error and a [`ResetHandle`] that rebuilds the
/// body from scratch. Errors raised by the fallback itself are not caught
/// here; they propagate to the enclosing boundary.
pub struct ErrorBoundary {
	state: Rc<BoundaryState>,
}

impl ErrorBoundary {
	pub fn new<B, F>(
		body: impl Fn() -> B + 'static,
		fallback: impl Fn(&UiError, ResetHandle) -> F + 'static,
	) -> Self
	where
		B: Into<Fragment>,
		F: Into<Fragment>,
	{
		Self {
			state: Rc::new(BoundaryState {
				body: Rc::new(move || -> Fragment { body().into() }),
				fallback: Rc::new(move |error: &UiError, reset| -> Fragment {
					fallback(error, reset).into()
				}),
				failed: Cell::new(false),
			}),
		}
	}
}

/// Rebuilds the body of the [`ErrorBoundary`] it was handed out by.
#[derive(Clone)]
pub struct ResetHandle {
	boundary: WeakComponent,
	state: Rc<BoundaryState>,
}

impl ResetHandle {
	/// Replaces the fallback with a freshly built body. Does nothing once
	/// the boundary has been dropped.
	pub fn reset(&self) {
		let Some(boundary) = self.boundary.upgrade() else {
			return;
		};
		self.state.failed.set(false);
		let body = Component::from_fragment((self.state.body)());
		if let Err(error) = boundary.replace_children(vec![body]) {
			boundary.inject_error(error.into());
		}
	}
}

impl IntoComponent for ErrorBoundary {
	fn into_component(self) -> Component {
		let boundary = Component::group_named("error-boundary");
		let state = self.state;

		let handler_state = Rc::clone(&state);
		boundary.set_error_handler(move |boundary, error| {
			if handler_state.failed.replace(true) {
				return false;
			}
			tracing::debug!(error = %error, "error boundary caught error");
			let reset = ResetHandle {
				boundary: boundary.downgrade(),
				state: Rc::clone(&handler_state),
			};
			let fallback = Component::from_fragment((handler_state.fallback)(error, reset));
			if let Err(error) = boundary.replace_children(vec![fallback]) {
				tracing::error!(error = %error, "error boundary could not show its fallback");
			}
			true
		});

		let body = Component::from_fragment((state.body)());
		if let Err(error) = boundary.append_child(&body) {
			boundary.inject_error(error.into());
		}
		boundary
	}
}
