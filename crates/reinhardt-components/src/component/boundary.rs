//! Error and suspense propagation.

use std::rc::Rc;

use super::Component;
use crate::error::UiError;

impl Component {
	/// Installs the error handler, replacing any previous one.
	///
	/// The handler returns `true` when it took care of the error; otherwise
	/// propagation continues with the parent.
	pub fn set_error_handler(
		&self,
		handler: impl Fn(&Component, &UiError) -> bool + 'static,
	) -> &Self {
		*self.inner.error_handler.borrow_mut() = Some(Rc::new(handler));
		self
	}

	pub fn clear_error_handler(&self) {
		self.inner.error_handler.borrow_mut().take();
	}

	/// Reports `error` to the nearest handler that claims it, starting with
	/// this component.
	///
	/// An error nobody claims is logged and kept on the root; when that root
	/// is later inserted somewhere, the error is raised again in its new
	/// parent chain.
	pub fn inject_error(&self, error: UiError) {
		let mut current = Some(self.clone());
		let mut root = self.clone();
		while let Some(component) = current {
			let handler = component.inner.error_handler.borrow().clone();
			if let Some(handler) = handler {
				if handler(&component, &error) {
					return;
				}
			}
			current = component.parent();
			root = component;
		}

		tracing::error!(
			component = %self.debug_name(),
			root = %root.debug_name(),
			error = %error,
			"unhandled error in component tree"
		);
		let mut slot = root.inner.unhandled_error.borrow_mut();
		if slot.is_none() {
			*slot = Some(error);
		}
	}

	/// Takes the unhandled error stored on this component.
	pub fn take_unhandled_error(&self) -> Option<UiError> {
		self.inner.unhandled_error.borrow_mut().take()
	}

	pub fn unhandled_error(&self) -> Option<UiError> {
		self.inner.unhandled_error.borrow().clone()
	}

	/// Pending async work in this subtree not absorbed by a descendant's
	/// suspense handler.
	pub fn suspense_count(&self) -> usize {
		self.inner.suspense_count.get()
	}

	/// Adds `delta` to the suspense count of this component and its
	/// ancestors, up to and including the first one with a suspense handler.
	/// That handler is called with its new count.
	pub fn adjust_suspense(&self, delta: isize) {
		if delta == 0 {
			return;
		}
		let mut current = Some(self.clone());
		while let Some(component) = current {
			let count = component
				.inner
				.suspense_count
				.get()
				.saturating_add_signed(delta);
			component.inner.suspense_count.set(count);
			let handler = component.inner.suspense_handler.borrow().clone();
			if let Some(handler) = handler {
				handler(&component, count);
				return;
			}
			current = component.parent();
		}
	}

	/// Installs the suspense handler. From then on this component's count
	/// no longer reaches its ancestors.
	pub fn set_suspense_handler(&self, handler: impl Fn(&Component, usize) + 'static) -> &Self {
		let first = self.contributes_suspense();
		*self.inner.suspense_handler.borrow_mut() = Some(Rc::new(handler));
		let pending = self.suspense_count();
		if first && pending > 0 {
			if let Some(parent) = self.parent() {
				parent.adjust_suspense(-(pending as isize));
			}
		}
		self
	}

	/// Whether this component's count is part of its parent's.
	pub(crate) fn contributes_suspense(&self) -> bool {
		self.inner.suspense_handler.borrow().is_none()
	}
}
