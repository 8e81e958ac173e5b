//! Computed - cached derivations
//!
//! A `Computed<T>` wraps a pure function of other reactive values. It is
//! evaluated lazily on first access and cached until one of its recorded
//! reads is invalidated. When invalidated it only re-runs if one of those
//! reads actually produced a different value, so a change that cancels out
//! further up the graph stops here.
//!
//! A computed whose function read nothing reactive, or read another polled
//! computed, is *polled*: nothing can notify it, so it re-evaluates on every
//! access.
//!
//! ## Example
//!
//! ```
//! use reinhardt_reactive::{Computed, Signal};
//!
//! let count = Signal::new(2);
//! let doubled = Computed::new({
//! 	let count = count.clone();
//! 	move || count.get() * 2
//! });
//!
//! assert_eq!(doubled.get(), 4);
//! count.set(5);
//! assert_eq!(doubled.get(), 10);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::{Rc, Weak};

use crate::runtime::{
	NodeId, NodeType, Subscriber, TrackedRead, batch_effects, try_with_runtime, with_runtime,
};

type Comparator<T> = Rc<dyn Fn(&T, &T) -> bool>;

struct ComputedInner<T> {
	id: NodeId,
	compute: RefCell<Box<dyn FnMut() -> T>>,
	value: RefCell<Option<T>>,
	reads: RefCell<Vec<TrackedRead>>,
	dirty: Cell<bool>,
	polled: Cell<bool>,
	evaluating: Cell<bool>,
	version: Cell<u64>,
	equals: Comparator<T>,
}

impl<T: Clone + 'static> ComputedInner<T> {
	/// Brings the cached value up to date.
	fn refresh(&self) {
		if self.evaluating.get() {
			panic!("computed {:?} depends on itself", self.id);
		}
		let cached = self.value.borrow().is_some();
		if cached && !self.polled.get() {
			if !self.dirty.get() {
				return;
			}
			if self.reads_unchanged() {
				self.dirty.set(false);
				return;
			}
		}
		self.recompute();
	}

	fn reads_unchanged(&self) -> bool {
		// Checking a read may refresh other computeds; keep our RefCell free.
		let reads = core::mem::take(&mut *self.reads.borrow_mut());
		let unchanged = reads.iter().all(TrackedRead::is_unchanged);
		let mut slot = self.reads.borrow_mut();
		if slot.is_empty() {
			*slot = reads;
		}
		unchanged
	}

	fn recompute(&self) {
		self.evaluating.set(true);
		let evaluating = EvaluatingGuard(&self.evaluating);
		let (value, reads) = with_runtime(|rt| {
			rt.evaluate(self.id, NodeType::Computed, || (self.compute.borrow_mut())())
		});
		drop(evaluating);

		let polled = reads.is_empty() || reads.iter().any(|read| read.polled);
		*self.reads.borrow_mut() = reads;
		self.polled.set(polled);
		self.dirty.set(false);
		self.version.set(self.version.get() + 1);
		*self.value.borrow_mut() = Some(value);
	}

	/// Refreshes without tracking and compares against a snapshot.
	fn is_current(&self, seen: &T) -> bool {
		self.refresh();
		match self.value.borrow().as_ref() {
			Some(value) => (self.equals)(value, seen),
			None => false,
		}
	}
}

impl<T: Clone + 'static> Subscriber for ComputedInner<T> {
	fn mark_stale(&self) -> bool {
		!self.dirty.replace(true)
	}

	fn node_type(&self) -> NodeType {
		NodeType::Computed
	}
}

impl<T> Drop for ComputedInner<T> {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
	}
}

struct EvaluatingGuard<'a>(&'a Cell<bool>);

impl Drop for EvaluatingGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// A lazily evaluated, cached derivation of other reactive values.
///
/// `Computed<T>` is cheap to clone; clones share the cache.
pub struct Computed<T: 'static> {
	inner: Rc<ComputedInner<T>>,
}

impl<T: Clone + PartialEq + 'static> Computed<T> {
	/// Create a Computed from a pure function of reactive values
	pub fn new(compute: impl FnMut() -> T + 'static) -> Self {
		Self::with_comparator(compute, |a, b| a == b)
	}
}

impl<T: Clone + 'static> Computed<T> {
	/// Create a Computed with a custom equality comparator
	///
	/// The comparator decides whether a recomputed value counts as changed
	/// for the nodes that read this one.
	pub fn with_comparator(
		compute: impl FnMut() -> T + 'static,
		equals: impl Fn(&T, &T) -> bool + 'static,
	) -> Self {
		let inner = Rc::new(ComputedInner {
			id: NodeId::new(),
			compute: RefCell::new(Box::new(compute)),
			value: RefCell::new(None),
			reads: RefCell::new(Vec::new()),
			dirty: Cell::new(true),
			polled: Cell::new(false),
			evaluating: Cell::new(false),
			version: Cell::new(0),
			equals: Rc::new(equals),
		});
		let weak: Weak<ComputedInner<T>> = Rc::downgrade(&inner);
		let weak: Weak<dyn Subscriber> = weak;
		with_runtime(|rt| rt.register_subscriber(inner.id, weak));
		Self { inner }
	}

	/// Get the current value, evaluating if needed and recording the
	/// dependency in the enclosing observer
	///
	/// # Panics
	///
	/// Panics if the function (directly or indirectly) reads this computed.
	pub fn get(&self) -> T {
		self.with(T::clone)
	}

	/// Borrow the current value, evaluating if needed
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		self.inner.refresh();
		self.track();
		let value = self.inner.value.borrow();
		let value = value
			.as_ref()
			.expect("computed value is populated by refresh");
		f(value)
	}

	/// Get the current value without recording a dependency
	pub fn get_untracked(&self) -> T {
		self.inner.refresh();
		let value = self.inner.value.borrow();
		value
			.as_ref()
			.cloned()
			.expect("computed value is populated by refresh")
	}

	/// Whether an invalidation is pending since the last evaluation
	pub fn is_dirty(&self) -> bool {
		self.inner.dirty.get()
	}

	/// Whether this computed re-evaluates on every access
	pub fn is_polled(&self) -> bool {
		self.inner.polled.get()
	}

	/// Number of times the function has run
	pub fn version(&self) -> u64 {
		self.inner.version.get()
	}

	/// Marks the cached value stale and invalidates dependents, as if one of
	/// its sources had changed
	pub fn invalidate(&self) {
		if !self.inner.mark_stale() {
			return;
		}
		let id = self.inner.id;
		batch_effects(|| with_runtime(|rt| rt.invalidate_subscribers(id)));
	}

	/// Get the NodeId of this computed
	pub fn id(&self) -> NodeId {
		self.inner.id
	}

	fn track(&self) {
		with_runtime(|rt| {
			if !rt.is_tracking() {
				return;
			}
			let seen = match self.inner.value.borrow().as_ref() {
				Some(value) => value.clone(),
				None => return,
			};
			let inner = Rc::clone(&self.inner);
			rt.track_read(TrackedRead::new(
				self.inner.id,
				self.inner.polled.get(),
				move || inner.is_current(&seen),
			));
		});
	}
}

impl<T: 'static> Clone for Computed<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Computed<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Computed")
			.field("id", &self.inner.id)
			.field("value", &self.inner.value.borrow())
			.field("dirty", &self.inner.dirty.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Signal;
	use serial_test::serial;
	use std::cell::Cell;

	#[test]
	#[serial]
	fn test_evaluates_lazily() {
		let runs = Rc::new(Cell::new(0));
		let computed = Computed::new({
			let runs = runs.clone();
			move || {
				runs.set(runs.get() + 1);
				1
			}
		});

		assert_eq!(runs.get(), 0);
		assert!(computed.is_dirty());
		assert_eq!(computed.get(), 1);
		assert_eq!(runs.get(), 1);
	}

	#[test]
	#[serial]
	fn test_caches_until_source_changes() {
		let source = Signal::new(3);
		let computed = Computed::new({
			let source = source.clone();
			move || source.get() + 1
		});

		assert_eq!(computed.get(), 4);
		assert_eq!(computed.get(), 4);
		assert_eq!(computed.version(), 1);
		assert!(!computed.is_polled());

		source.set(10);
		assert!(computed.is_dirty());
		assert_eq!(computed.get(), 11);
		assert_eq!(computed.version(), 2);
	}

	#[test]
	#[serial]
	fn test_source_reverted_before_access_skips_recompute() {
		let source = Signal::new(1);
		let computed = Computed::new({
			let source = source.clone();
			move || source.get() * 10
		});
		assert_eq!(computed.get(), 10);

		source.set(2);
		source.set(1);

		assert_eq!(computed.get(), 10);
		assert_eq!(computed.version(), 1);
		assert!(!computed.is_dirty());
	}

	#[test]
	#[serial]
	fn test_without_reactive_reads_is_polled() {
		let external = Rc::new(Cell::new(5));
		let computed = Computed::new({
			let external = external.clone();
			move || external.get()
		});

		assert_eq!(computed.get(), 5);
		assert!(computed.is_polled());

		external.set(6);
		assert_eq!(computed.get(), 6);
	}

	#[test]
	#[serial]
	fn test_reading_polled_computed_makes_reader_polled() {
		let external = Rc::new(Cell::new(1));
		let polled = Computed::new({
			let external = external.clone();
			move || external.get()
		});
		let reader = Computed::new({
			let polled = polled.clone();
			move || polled.get() + 100
		});

		assert_eq!(reader.get(), 101);
		assert!(reader.is_polled());

		external.set(2);
		assert_eq!(reader.get(), 102);
	}

	#[test]
	#[serial]
	#[should_panic(expected = "depends on itself")]
	fn test_self_dependency_panics() {
		let slot: Rc<RefCell<Option<Computed<i32>>>> = Rc::new(RefCell::new(None));
		let computed = Computed::new({
			let slot = slot.clone();
			move || {
				let this = slot.borrow().clone();
				this.map(|c| c.get()).unwrap_or(0) + 1
			}
		});
		*slot.borrow_mut() = Some(computed.clone());

		computed.get();
	}

	#[test]
	#[serial]
	#[should_panic(expected = "written while a computed value was evaluating")]
	fn test_write_during_evaluation_panics() {
		let target = Signal::new(0);
		let computed = Computed::new({
			let target = target.clone();
			move || {
				target.set(1);
				0
			}
		});

		computed.get();
	}

	#[test]
	#[serial]
	fn test_invalidate_forces_recompute_when_polled() {
		let external = Rc::new(Cell::new(1));
		let computed = Computed::new({
			let external = external.clone();
			move || external.get()
		});
		assert_eq!(computed.get(), 1);

		computed.invalidate();

		assert!(computed.is_dirty());
		assert_eq!(computed.get(), 1);
		assert_eq!(computed.version(), 2);
	}
}
