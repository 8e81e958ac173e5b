//! Watching constant, reactive and asynchronous values.
//!
//! [`Watchable`] is what fragments, attributes and control flow consume. A
//! reactive value is re-read on every update pass reaching its component
//! and reported only when it changed; a future is tracked as pending
//! suspense work until it resolves.

use core::fmt;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use reinhardt_reactive::{Computed, Signal};

use crate::component::{Component, UpdateFlow, UpdateListener};
use crate::error::UiResult;
use crate::executor::spawn_local;

/// A value that is constant, re-evaluated on demand, or still arriving.
pub enum Watchable<T> {
	/// Known now and never changes.
	Value(T),
	/// Re-read on every update pass.
	Reactive(Rc<dyn Fn() -> T>),
	/// Resolves once; pending until then.
	Future(LocalBoxFuture<'static, T>),
}

impl<T: 'static> Watchable<T> {
	pub fn reactive(read: impl Fn() -> T + 'static) -> Self {
		Self::Reactive(Rc::new(read))
	}

	pub fn future(future: impl Future<Output = T> + 'static) -> Self {
		Self::Future(future.boxed_local())
	}

	/// Applies `f` to the value, whenever it becomes available.
	pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Watchable<U> {
		match self {
			Self::Value(value) => Watchable::Value(f(value)),
			Self::Reactive(read) => Watchable::Reactive(Rc::new(move || f(read()))),
			Self::Future(future) => Watchable::Future(future.map(f).boxed_local()),
		}
	}
}

impl<T> fmt::Debug for Watchable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(_) => f.write_str("Watchable::Value"),
			Self::Reactive(_) => f.write_str("Watchable::Reactive"),
			Self::Future(_) => f.write_str("Watchable::Future"),
		}
	}
}

impl<T: Clone + 'static> From<Signal<T>> for Watchable<T> {
	fn from(signal: Signal<T>) -> Self {
		Self::reactive(move || signal.get())
	}
}

impl<T: Clone + 'static> From<Computed<T>> for Watchable<T> {
	fn from(computed: Computed<T>) -> Self {
		Self::reactive(move || computed.get())
	}
}

macro_rules! watchable_from_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Watchable<$ty> {
				fn from(value: $ty) -> Self {
					Self::Value(value)
				}
			}
		)*
	};
}

watchable_from_value!(
	bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String
);

impl<T> From<Vec<T>> for Watchable<Vec<T>> {
	fn from(value: Vec<T>) -> Self {
		Self::Value(value)
	}
}

impl<T> From<Option<T>> for Watchable<Option<T>> {
	fn from(value: Option<T>) -> Self {
		Self::Value(value)
	}
}

impl From<&'static str> for Watchable<String> {
	fn from(value: &'static str) -> Self {
		Self::Value(value.to_string())
	}
}

/// `PartialEq` as the change test for [`Component::watch_value`].
pub(crate) fn partial_eq<T: PartialEq>() -> Option<fn(&T, &T) -> bool> {
	let equals: fn(&T, &T) -> bool = T::eq;
	Some(equals)
}

impl Component {
	/// Calls `callback` with the current value of `value`, and again
	/// whenever it changes.
	///
	/// With `equality` off, a reactive value is reported on every update
	/// pass even when unchanged. A future is counted as pending suspense
	/// work on this component until it resolves. Callback failures are
	/// routed through [`inject_error`](Component::inject_error).
	pub fn add_value_watcher<T: PartialEq + 'static>(
		&self,
		value: impl Into<Watchable<T>>,
		equality: bool,
		callback: impl Fn(&Component, &T) -> UiResult<()> + 'static,
	) -> &Self {
		let equals = if equality { partial_eq() } else { None };
		self.watch_value(value.into(), equals, move |component, value| {
			callback(component, value).map(|()| UpdateFlow::Continue)
		});
		self
	}

	/// Watches `value`; the callback decides how the current update pass
	/// continues when a reactive value changes.
	pub(crate) fn watch_value<T: 'static>(
		&self,
		value: Watchable<T>,
		equals: Option<fn(&T, &T) -> bool>,
		callback: impl Fn(&Component, &T) -> UiResult<UpdateFlow> + 'static,
	) {
		match value {
			Watchable::Value(value) => {
				if let Err(error) = callback(self, &value) {
					self.inject_error(error);
				}
			}
			Watchable::Reactive(read) => {
				let last: RefCell<Option<T>> = RefCell::new(None);
				let listener: UpdateListener = Rc::new(move |component: &Component| {
					let next = read();
					if let (Some(previous), Some(equals)) = (last.borrow().as_ref(), equals) {
						if equals(previous, &next) {
							return Ok(UpdateFlow::Continue);
						}
					}
					let flow = callback(component, &next);
					*last.borrow_mut() = Some(next);
					flow
				});
				if let Err(error) = listener(self) {
					self.inject_error(error);
				}
				self.push_update_listener(listener);
			}
			Watchable::Future(future) => {
				self.track_future(future, move |component, value| {
					callback(component, &value).map(drop)
				});
			}
		}
	}

	/// Runs `future` on the local executor, counting it as pending suspense
	/// work on this component until `on_ready` has run.
	///
	/// A component dropped before the future resolves is not called back.
	pub fn track_future<T: 'static>(
		&self,
		future: impl Future<Output = T> + 'static,
		on_ready: impl FnOnce(&Component, T) -> UiResult<()> + 'static,
	) {
		self.adjust_suspense(1);
		let handle = self.downgrade();
		let task = async move {
			let value = future.await;
			if let Some(component) = handle.upgrade() {
				if let Err(error) = on_ready(&component, value) {
					component.inject_error(error);
				}
				component.adjust_suspense(-1);
			}
		};
		if let Err(error) = spawn_local(task.boxed_local()) {
			self.adjust_suspense(-1);
			self.inject_error(error);
		}
	}
}
