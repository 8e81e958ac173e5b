//! Signal - Fine-grained Reactive Primitive
//!
//! `Signal<T>` holds a value and records a dependency whenever it is read
//! from inside a [`Computed`](crate::Computed) or [`Effect`](crate::Effect).
//!
//! ## Key Features
//!
//! - **Automatic Dependency Tracking**: `get()`/`with()` inside an observer
//!   record the read together with a snapshot of the value.
//! - **Equality Short-Circuit**: writing a value the comparator considers
//!   equal to the current one notifies nobody.
//! - **Batched Notification**: every write is wrapped in a batch, so the
//!   effects it invalidates run once after the write completes.
//!
//! ## Example
//!
//! ```
//! use reinhardt_reactive::Signal;
//!
//! let count = Signal::new(0);
//! assert_eq!(count.get(), 0);
//!
//! count.set(42);
//! assert_eq!(count.get(), 42);
//!
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use crate::runtime::{NodeId, TrackedRead, batch_effects, try_with_runtime, with_runtime};

type Comparator<T> = Rc<dyn Fn(&T, &T) -> bool>;

struct SignalInner<T> {
	id: NodeId,
	value: RefCell<T>,
	equals: Comparator<T>,
}

impl<T> Drop for SignalInner<T> {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
	}
}

/// A reactive signal that holds a value and tracks dependencies
///
/// ## Cloning
///
/// `Signal<T>` implements `Clone` and shares its state via `Rc`. All clones
/// read and write the same value; the node leaves the dependency graph when
/// the last clone is dropped.
pub struct Signal<T: 'static> {
	inner: Rc<SignalInner<T>>,
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
	/// Create a new Signal that skips writes equal to the current value
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_reactive::Signal;
	///
	/// let name = Signal::new(String::from("reinhardt"));
	/// assert_eq!(name.get(), "reinhardt");
	/// ```
	pub fn new(value: T) -> Self {
		Self::with_comparator(value, |a, b| a == b)
	}
}

impl<T: Clone + 'static> Signal<T> {
	/// Create a Signal with a custom equality comparator
	///
	/// Pass `|_, _| false` to notify on every write.
	pub fn with_comparator(value: T, equals: impl Fn(&T, &T) -> bool + 'static) -> Self {
		Self {
			inner: Rc::new(SignalInner {
				id: NodeId::new(),
				value: RefCell::new(value),
				equals: Rc::new(equals),
			}),
		}
	}

	/// Get the current value of the signal
	///
	/// This records the dependency if called while a Computed or Effect is
	/// evaluating.
	pub fn get(&self) -> T {
		self.track();
		self.get_untracked()
	}

	/// Borrow the current value, recording the dependency
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		self.track();
		f(&self.inner.value.borrow())
	}

	/// Get the current value without tracking dependencies
	pub fn get_untracked(&self) -> T {
		self.inner.value.borrow().clone()
	}

	/// Set the signal to a new value
	///
	/// Writes equal to the current value are ignored. Otherwise every
	/// subscriber is invalidated inside one batch.
	///
	/// # Panics
	///
	/// Panics when called while a Computed is evaluating; derivations must
	/// not write state.
	pub fn set(&self, value: T) {
		if with_runtime(|rt| rt.is_computing()) {
			panic!(
				"signal {:?} written while a computed value was evaluating",
				self.inner.id
			);
		}
		if (self.inner.equals)(&self.inner.value.borrow(), &value) {
			return;
		}
		*self.inner.value.borrow_mut() = value;
		tracing::trace!(signal = ?self.inner.id, "signal changed");

		let id = self.inner.id;
		batch_effects(|| with_runtime(|rt| rt.invalidate_subscribers(id)));
	}

	/// Update the signal's value using a function
	///
	/// The closure works on a copy of the current value, which is then
	/// passed to [`set`](Signal::set), so the equality check still applies.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		let mut value = self.get_untracked();
		f(&mut value);
		self.set(value);
	}

	/// Get the NodeId of this signal
	///
	/// This is mainly for internal use by the runtime and tests.
	pub fn id(&self) -> NodeId {
		self.inner.id
	}

	fn track(&self) {
		with_runtime(|rt| {
			if !rt.is_tracking() {
				return;
			}
			let inner = Rc::clone(&self.inner);
			let seen = self.inner.value.borrow().clone();
			rt.track_read(TrackedRead::new(self.inner.id, false, move || {
				(inner.equals)(&inner.value.borrow(), &seen)
			}));
		});
	}
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.inner.id)
			.field("value", &self.inner.value.borrow())
			.finish()
	}
}
