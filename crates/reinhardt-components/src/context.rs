//! Lexically scoped context values.
//!
//! A [`Context`] is an opaque token. A component provides a value for it and
//! every descendant can read that value back; the nearest provider wins.
//!
//! ```
//! use reinhardt_components::{Component, Context};
//!
//! let theme: Context<&'static str> = Context::new("theme");
//! let app = Component::group();
//! let button = Component::element("button");
//! app.append_child(&button).unwrap();
//!
//! app.provide_context(&theme, "dark");
//! assert_eq!(button.try_get_context(&theme), Some("dark"));
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::rc::Rc;

use crate::component::Component;
use crate::error::{UiError, UiResult};

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Key for a context value of type `T`.
pub struct Context<T> {
	id: usize,
	name: &'static str,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Context<T> {
	/// Creates a new, distinct context. `name` is used in error messages.
	pub fn new(name: &'static str) -> Self {
		Self {
			id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
			name,
			_marker: PhantomData,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl<T> Clone for Context<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for Context<T> {}

impl<T> fmt::Debug for Context<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("id", &self.id)
			.field("name", &self.name)
			.finish()
	}
}

impl Component {
	/// Provides `value` for `context` to this component and its descendants.
	/// Providing again replaces the value.
	pub fn provide_context<T: Clone + 'static>(&self, context: &Context<T>, value: T) -> &Self {
		self.set_context_slot(context.id, Rc::new(value));
		self
	}

	/// Value provided by the nearest ancestor (or self), if any.
	pub fn try_get_context<T: Clone + 'static>(&self, context: &Context<T>) -> Option<T> {
		let mut current = Some(self.clone());
		while let Some(component) = current {
			if let Some(slot) = component.context_slot(context.id) {
				if let Some(value) = slot.downcast_ref::<T>() {
					return Some(value.clone());
				}
			}
			current = component.parent();
		}
		None
	}

	/// Like [`try_get_context`](Component::try_get_context), failing with
	/// [`UiError::MissingContext`] when nothing provides the value.
	pub fn get_context<T: Clone + 'static>(&self, context: &Context<T>) -> UiResult<T> {
		self.try_get_context(context)
			.ok_or(UiError::MissingContext(context.name))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_nearest_provider_wins() {
		let locale: Context<String> = Context::new("locale");
		let app = Component::group();
		let section = Component::group();
		let leaf = Component::text("x");
		app.append_child(&section).unwrap();
		section.append_child(&leaf).unwrap();

		app.provide_context(&locale, "en".to_string());
		assert_eq!(leaf.get_context(&locale).unwrap(), "en");

		section.provide_context(&locale, "fr".to_string());
		assert_eq!(leaf.get_context(&locale).unwrap(), "fr");
		assert_eq!(app.get_context(&locale).unwrap(), "en");
	}

	#[rstest]
	fn test_missing_context_names_the_key() {
		let user: Context<u32> = Context::new("current user");
		let component = Component::group();

		let error = component.get_context(&user).unwrap_err();

		assert!(matches!(error, UiError::MissingContext("current user")));
		assert_eq!(error.to_string(), "No provider for context `current user`");
	}

	#[rstest]
	fn test_contexts_of_same_type_are_distinct() {
		let first: Context<i32> = Context::new("first");
		let second: Context<i32> = Context::new("second");
		let component = Component::group();

		component.provide_context(&first, 1);

		assert_eq!(component.try_get_context(&first), Some(1));
		assert_eq!(component.try_get_context(&second), None);
	}

	#[rstest]
	fn test_context_follows_reparenting() {
		let depth: Context<usize> = Context::new("depth");
		let a = Component::group();
		let b = Component::group();
		let child = Component::group();
		a.provide_context(&depth, 1);
		b.provide_context(&depth, 2);
		a.append_child(&child).unwrap();
		assert_eq!(child.try_get_context(&depth), Some(1));

		a.remove_child(&child).unwrap();
		b.append_child(&child).unwrap();

		assert_eq!(child.try_get_context(&depth), Some(2));
	}
}
