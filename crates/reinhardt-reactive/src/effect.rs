//! Effect - Reactive Side Effects
//!
//! `Effect` represents a side effect that re-runs when the values it read
//! last time change. Dependencies are tracked automatically: any Signal or
//! Computed read inside the closure becomes a dependency, and the set is
//! rebuilt on every run.
//!
//! ## Key Features
//!
//! - **Batched Re-execution**: invalidated effects are queued and run when the
//!   outermost batch exits, once per batch no matter how many sources changed.
//! - **Change Verification**: a queued effect re-checks its reads before
//!   running and stays idle if every one of them is back to the value it saw.
//! - **Activation**: an effect can be deactivated (dependencies dropped, no
//!   re-runs) and activated again (runs immediately, re-tracks).
//! - **Memory Safe**: removes itself from the dependency graph when dropped.
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reinhardt_reactive::{Effect, Signal};
//!
//! let count = Signal::new(0);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let _effect = Effect::new({
//! 	let (count, seen) = (count.clone(), seen.clone());
//! 	move || seen.borrow_mut().push(count.get())
//! });
//!
//! count.set(42);
//! assert_eq!(*seen.borrow(), vec![0, 42]);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use std::rc::{Rc, Weak};

use crate::runtime::{
	NodeId, NodeType, Subscriber, TrackedRead, batch_effects, try_with_runtime, with_runtime,
};

/// Type alias for effect functions
type EffectFn = Box<dyn FnMut() + 'static>;

struct EffectInner {
	id: NodeId,
	body: RefCell<EffectFn>,
	reads: RefCell<Vec<TrackedRead>>,
	active: Cell<bool>,
	dirty: Cell<bool>,
	running: Cell<bool>,
	runs: Cell<u64>,
}

impl EffectInner {
	fn run(&self) {
		if self.running.get() {
			return;
		}
		// Writes made by the body are coalesced until the run is recorded,
		// so a self-invalidating body is queued again rather than skipped.
		batch_effects(|| {
			self.dirty.set(false);
			self.running.set(true);
			let running = RunningGuard(&self.running);
			let ((), reads) = with_runtime(|rt| {
				rt.evaluate(self.id, NodeType::Effect, || (self.body.borrow_mut())())
			});
			drop(running);

			if reads.is_empty() && with_runtime(|rt| rt.config().warn_on_untracked_effects) {
				tracing::warn!(effect = ?self.id, "effect read no reactive values and will not re-run");
			}
			*self.reads.borrow_mut() = reads;
			self.runs.set(self.runs.get() + 1);
		});
	}

	fn reads_unchanged(&self) -> bool {
		let reads = core::mem::take(&mut *self.reads.borrow_mut());
		let unchanged = !reads.is_empty() && reads.iter().all(TrackedRead::is_unchanged);
		let mut slot = self.reads.borrow_mut();
		if slot.is_empty() {
			*slot = reads;
		}
		unchanged
	}
}

impl Subscriber for EffectInner {
	fn mark_stale(&self) -> bool {
		if !self.active.get() {
			return false;
		}
		!self.dirty.replace(true)
	}

	fn node_type(&self) -> NodeType {
		NodeType::Effect
	}

	fn run_if_stale(&self) {
		if !self.active.get() || !self.dirty.get() {
			return;
		}
		if self.reads_unchanged() {
			self.dirty.set(false);
			return;
		}
		self.run();
	}

	fn discard(&self) {
		self.dirty.set(false);
	}
}

impl Drop for EffectInner {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.remove_node(self.id));
	}
}

struct RunningGuard<'a>(&'a Cell<bool>);

impl Drop for RunningGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

/// A reactive side effect
///
/// The effect stays alive as long as any clone of this handle does.
#[derive(Clone)]
pub struct Effect {
	inner: Rc<EffectInner>,
}

impl Effect {
	/// Create a new Effect and run it immediately to collect its
	/// dependencies
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		let effect = Self::new_inactive(f);
		effect.activate();
		effect
	}

	/// Create an Effect that does not run until [`activate`](Effect::activate)
	pub fn new_inactive<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		let inner = Rc::new(EffectInner {
			id: NodeId::new(),
			body: RefCell::new(Box::new(f)),
			reads: RefCell::new(Vec::new()),
			active: Cell::new(false),
			dirty: Cell::new(false),
			running: Cell::new(false),
			runs: Cell::new(0),
		});
		let weak: Weak<EffectInner> = Rc::downgrade(&inner);
		let weak: Weak<dyn Subscriber> = weak;
		with_runtime(|rt| rt.register_subscriber(inner.id, weak));
		Self { inner }
	}

	/// Run the effect now and resume reacting to changes
	pub fn activate(&self) {
		self.inner.active.set(true);
		self.inner.run();
	}

	/// Stop reacting to changes and drop all dependencies
	pub fn deactivate(&self) {
		self.inner.active.set(false);
		self.inner.dirty.set(false);
		self.inner.reads.borrow_mut().clear();
		let id = self.inner.id;
		with_runtime(|rt| {
			rt.clear_dependencies(id);
			rt.dequeue_effect(id);
		});
	}

	/// Whether the effect currently reacts to changes
	pub fn is_active(&self) -> bool {
		self.inner.active.get()
	}

	/// Number of times the body has run
	pub fn run_count(&self) -> u64 {
		self.inner.runs.get()
	}

	/// Get the NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.inner.id
	}
}

impl fmt::Debug for Effect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.inner.id)
			.field("active", &self.inner.active.get())
			.field("runs", &self.inner.runs.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Computed, Signal};
	use serial_test::serial;

	fn counter() -> (Rc<Cell<u32>>, impl Fn() + Clone) {
		let count = Rc::new(Cell::new(0));
		let bump = {
			let count = count.clone();
			move || count.set(count.get() + 1)
		};
		(count, bump)
	}

	#[test]
	#[serial]
	fn test_effect_runs_immediately() {
		let (runs, bump) = counter();

		let effect = Effect::new(move || bump());

		assert_eq!(runs.get(), 1);
		assert!(effect.is_active());
		assert_eq!(effect.run_count(), 1);
	}

	#[test]
	#[serial]
	fn test_effect_tracks_dependency() {
		let signal = Signal::new(1);

		let effect = Effect::new({
			let signal = signal.clone();
			move || {
				let _ = signal.get();
			}
		});

		with_runtime(|rt| {
			assert_eq!(rt.subscriber_count(signal.id()), 1);
			assert_eq!(rt.dependency_count(effect.id()), 1);
		});
	}

	#[test]
	#[serial]
	fn test_effect_reruns_on_signal_change() {
		let signal = Signal::new(0);
		let (runs, bump) = counter();
		let _effect = Effect::new({
			let signal = signal.clone();
			move || {
				let _ = signal.get();
				bump();
			}
		});

		signal.set(1);
		signal.set(2);

		assert_eq!(runs.get(), 3);
	}

	#[test]
	#[serial]
	fn test_equal_write_does_not_rerun() {
		let signal = Signal::new(5);
		let (runs, bump) = counter();
		let _effect = Effect::new({
			let signal = signal.clone();
			move || {
				let _ = signal.get();
				bump();
			}
		});

		signal.set(5);

		assert_eq!(runs.get(), 1);
	}

	#[test]
	#[serial]
	fn test_effect_skips_when_computed_result_unchanged() {
		let signal = Signal::new(2);
		let parity = Computed::new({
			let signal = signal.clone();
			move || signal.get() % 2
		});
		let (runs, bump) = counter();
		let _effect = Effect::new({
			let parity = parity.clone();
			move || {
				let _ = parity.get();
				bump();
			}
		});

		signal.set(4);
		assert_eq!(runs.get(), 1);

		signal.set(5);
		assert_eq!(runs.get(), 2);
	}

	#[test]
	#[serial]
	fn test_deactivate_stops_reruns() {
		let signal = Signal::new(0);
		let (runs, bump) = counter();
		let effect = Effect::new({
			let signal = signal.clone();
			move || {
				let _ = signal.get();
				bump();
			}
		});

		effect.deactivate();
		signal.set(1);

		assert_eq!(runs.get(), 1);
		assert_eq!(with_runtime(|rt| rt.subscriber_count(signal.id())), 0);

		effect.activate();
		assert_eq!(runs.get(), 2);
		signal.set(2);
		assert_eq!(runs.get(), 3);
	}

	#[test]
	#[serial]
	fn test_new_inactive_waits_for_activation() {
		let (runs, bump) = counter();

		let effect = Effect::new_inactive(move || bump());

		assert_eq!(runs.get(), 0);
		assert!(!effect.is_active());
		effect.activate();
		assert_eq!(runs.get(), 1);
	}

	#[test]
	#[serial]
	fn test_effect_drop_cleans_up() {
		let signal = Signal::new(0);
		let effect = Effect::new({
			let signal = signal.clone();
			move || {
				let _ = signal.get();
			}
		});
		let id = effect.id();

		drop(effect);

		with_runtime(|rt| {
			assert!(!rt.has_node(id));
			assert_eq!(rt.subscriber_count(signal.id()), 0);
		});
		signal.set(3);
	}
}
