//! Reactive Runtime
//!
//! This module owns the per-thread bookkeeping shared by [`Signal`],
//! [`Computed`] and [`Effect`].
//!
//! ## Architecture
//!
//! 1. **Observer Stack**: the computation currently being evaluated sits on
//!    top. Every tracked read made while it runs is recorded into its frame
//!    as a [`TrackedRead`], together with a closure that can later tell
//!    whether the value it saw is still current.
//! 2. **Dependency Graph**: `source -> subscribers` and
//!    `subscriber -> dependencies` edges, rebuilt on every evaluation.
//! 3. **Invalidation**: writing a signal marks its subscribers stale,
//!    transitively through computeds, and queues stale effects.
//! 4. **Batching**: queued effects run when the outermost batch exits. A
//!    single write outside any batch is its own batch.
//!
//! [`Signal`]: crate::Signal
//! [`Computed`]: crate::Computed
//! [`Effect`]: crate::Effect

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use crate::config::RuntimeConfig;

/// Unique identifier for reactive nodes (Signals, Computeds, Effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Type of reactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
	/// A Signal node (source of reactivity)
	Signal,
	/// A Computed node (cached derivation, both a source and an observer)
	Computed,
	/// An Effect node (side effect that re-runs when its reads change)
	Effect,
	/// A frame pushed by [`untrack`]; reads made under it are not recorded
	Untracked,
}

/// One dependency observed during an evaluation.
pub struct TrackedRead {
	/// Node that was read
	pub(crate) source: NodeId,
	/// Whether the source can change without notifying anyone
	pub(crate) polled: bool,
	unchanged: Box<dyn Fn() -> bool>,
}

impl TrackedRead {
	pub(crate) fn new(source: NodeId, polled: bool, unchanged: impl Fn() -> bool + 'static) -> Self {
		Self {
			source,
			polled,
			unchanged: Box::new(unchanged),
		}
	}

	/// Re-reads the source and compares it with the value seen at read time.
	pub(crate) fn is_unchanged(&self) -> bool {
		(self.unchanged)()
	}
}

/// Observer represents a currently evaluating Computed or Effect
pub struct Observer {
	/// Unique identifier for this observer
	pub id: NodeId,
	/// Type of this observer
	pub node_type: NodeType,
	/// Reads recorded so far, in first-read order
	pub(crate) reads: Vec<TrackedRead>,
}

impl Observer {
	fn new(id: NodeId, node_type: NodeType) -> Self {
		Self {
			id,
			node_type,
			reads: Vec::new(),
		}
	}
}

/// Dependency graph node
#[derive(Debug, Default)]
pub(crate) struct DependencyNode {
	/// IDs of nodes that depend on this node
	pub(crate) subscribers: Vec<NodeId>,
	/// IDs of nodes this node depends on
	pub(crate) dependencies: Vec<NodeId>,
}

/// Hooks the runtime needs on observer nodes.
pub(crate) trait Subscriber {
	/// Marks the node stale. Returns `false` if it already was.
	fn mark_stale(&self) -> bool;

	fn node_type(&self) -> NodeType;

	/// Runs a queued effect if it is still stale and active.
	fn run_if_stale(&self) {}

	/// Forgets a pending run that was dropped from the queue, so later
	/// invalidations can queue the node again.
	fn discard(&self) {}
}

/// Global reactive runtime
///
/// This struct manages the reactive dependency graph and effect scheduling.
/// It uses thread-local storage to maintain separate runtime state per thread.
pub struct Runtime {
	/// Observer stack for tracking currently evaluating nodes
	observer_stack: RefCell<Vec<Observer>>,
	/// Dependency graph: NodeId -> DependencyNode
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Live observers that can be invalidated
	subscribers: RefCell<BTreeMap<NodeId, Weak<dyn Subscriber>>>,
	/// Effects waiting for the outermost batch to exit
	pub(crate) pending_effects: RefCell<VecDeque<NodeId>>,
	batch_depth: Cell<usize>,
	config: RefCell<RuntimeConfig>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			subscribers: RefCell::new(BTreeMap::new()),
			pending_effects: RefCell::new(VecDeque::new()),
			batch_depth: Cell::new(0),
			config: RefCell::new(RuntimeConfig::default()),
		}
	}

	/// Get the current observer (the innermost evaluating Computed or Effect)
	pub fn current_observer(&self) -> Option<NodeId> {
		self.observer_stack
			.borrow()
			.iter()
			.rev()
			.find(|observer| observer.node_type != NodeType::Untracked)
			.map(|observer| observer.id)
	}

	/// Whether a read made right now would be recorded
	pub fn is_tracking(&self) -> bool {
		self.observer_stack
			.borrow()
			.last()
			.is_some_and(|observer| observer.node_type != NodeType::Untracked)
	}

	/// Whether the innermost tracking frame belongs to a Computed
	pub fn is_computing(&self) -> bool {
		self.observer_stack
			.borrow()
			.iter()
			.rev()
			.find(|observer| observer.node_type != NodeType::Untracked)
			.is_some_and(|observer| observer.node_type == NodeType::Computed)
	}

	/// Current batch nesting depth
	pub fn batch_depth(&self) -> usize {
		self.batch_depth.get()
	}

	/// Snapshot of the active configuration
	pub fn config(&self) -> RuntimeConfig {
		self.config.borrow().clone()
	}

	pub(crate) fn set_config(&self, config: RuntimeConfig) {
		*self.config.borrow_mut() = config;
	}

	/// Records a read into the current observer frame and the graph.
	///
	/// Repeated reads of the same source within one evaluation keep the
	/// first snapshot.
	pub(crate) fn track_read(&self, read: TrackedRead) {
		let (source, observer_id) = {
			let mut stack = self.observer_stack.borrow_mut();
			let Some(observer) = stack.last_mut() else {
				return;
			};
			if observer.node_type == NodeType::Untracked
				|| observer.reads.iter().any(|seen| seen.source == read.source)
			{
				return;
			}
			let edge = (read.source, observer.id);
			observer.reads.push(read);
			edge
		};
		self.add_edge(source, observer_id);
	}

	fn add_edge(&self, source: NodeId, observer: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		// Add source -> observer edge (source has a new subscriber)
		let source_node = graph.entry(source).or_default();
		if !source_node.subscribers.contains(&observer) {
			source_node.subscribers.push(observer);
		}

		// Add observer -> source edge (observer depends on source)
		let observer_node = graph.entry(observer).or_default();
		if !observer_node.dependencies.contains(&source) {
			observer_node.dependencies.push(source);
		}
	}

	/// Evaluates `f` with a fresh observer frame for `id`.
	///
	/// Old edges of `id` are dropped first; the reads recorded during `f`
	/// are returned and their edges are in the graph afterwards.
	pub(crate) fn evaluate<R>(
		&self,
		id: NodeId,
		node_type: NodeType,
		f: impl FnOnce() -> R,
	) -> (R, Vec<TrackedRead>) {
		self.clear_dependencies(id);
		self.observer_stack
			.borrow_mut()
			.push(Observer::new(id, node_type));
		let frame = FrameGuard { runtime: self };
		let value = f();
		let reads = frame.finish();
		(value, reads)
	}

	/// Runs `f` under an untracked frame.
	pub(crate) fn untracked<R>(&self, f: impl FnOnce() -> R) -> R {
		self.observer_stack
			.borrow_mut()
			.push(Observer::new(NodeId::new(), NodeType::Untracked));
		let frame = FrameGuard { runtime: self };
		let value = f();
		drop(frame);
		value
	}

	pub(crate) fn register_subscriber(&self, id: NodeId, node: Weak<dyn Subscriber>) {
		self.subscribers.borrow_mut().insert(id, node);
	}

	fn lookup(&self, id: NodeId) -> Option<Rc<dyn Subscriber>> {
		self.subscribers.borrow().get(&id).and_then(Weak::upgrade)
	}

	/// Marks every transitive subscriber of `source` stale and queues
	/// effects.
	///
	/// An already stale node is skipped together with its dependents: they
	/// were invalidated when it went stale and nobody has pulled it since.
	pub(crate) fn invalidate_subscribers(&self, source: NodeId) {
		let subscribers = self
			.dependency_graph
			.borrow()
			.get(&source)
			.map(|node| node.subscribers.clone())
			.unwrap_or_default();

		for id in subscribers {
			let Some(node) = self.lookup(id) else {
				continue;
			};
			if !node.mark_stale() {
				continue;
			}
			match node.node_type() {
				NodeType::Effect => self.enqueue_effect(id),
				_ => self.invalidate_subscribers(id),
			}
		}
	}

	pub(crate) fn enqueue_effect(&self, id: NodeId) {
		let mut pending = self.pending_effects.borrow_mut();
		if !pending.contains(&id) {
			pending.push_back(id);
		}
	}

	pub(crate) fn dequeue_effect(&self, id: NodeId) {
		self.pending_effects.borrow_mut().retain(|queued| *queued != id);
	}

	pub(crate) fn begin_batch(&self) {
		self.batch_depth.set(self.batch_depth.get() + 1);
	}

	/// Leaves one batch level. The outermost exit drains the effect queue
	/// unless `flush` is false (the batch is unwinding).
	pub(crate) fn end_batch(&self, flush: bool) {
		let depth = self.batch_depth.get();
		if depth > 1 {
			self.batch_depth.set(depth - 1);
			return;
		}
		if !flush {
			self.batch_depth.set(0);
			self.discard_pending();
			return;
		}

		// Depth stays at 1 while draining so writes made by effects join
		// this flush instead of starting a nested one.
		let reset = FlushGuard { runtime: self };
		self.flush_pending_effects();
		drop(reset);
	}

	fn flush_pending_effects(&self) {
		let limit = self.config.borrow().max_flush_iterations;
		let mut runs = 0usize;
		loop {
			let next = self.pending_effects.borrow_mut().pop_front();
			let Some(id) = next else {
				break;
			};
			runs += 1;
			if runs > limit {
				let dropped = self.pending_effects.borrow().len() + 1;
				tracing::warn!(
					limit,
					dropped,
					"effect flush did not settle; remaining effects were dropped"
				);
				if let Some(node) = self.lookup(id) {
					node.discard();
				}
				self.discard_pending();
				break;
			}
			if let Some(node) = self.lookup(id) {
				node.run_if_stale();
			}
		}
	}

	fn discard_pending(&self) {
		let dropped: Vec<NodeId> = self.pending_effects.borrow_mut().drain(..).collect();
		for id in dropped {
			if let Some(node) = self.lookup(id) {
				node.discard();
			}
		}
	}

	/// Clear dependencies for a node
	///
	/// This should be called before re-evaluating a node to clear old dependencies.
	///
	/// # Arguments
	///
	/// * `node_id` - ID of the node whose dependencies should be cleared
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		let dependencies = match graph.get_mut(&node_id) {
			Some(node) => core::mem::take(&mut node.dependencies),
			None => return,
		};

		// Remove this node from all source subscribers
		for dep_id in dependencies {
			if let Some(dep_node) = graph.get_mut(&dep_id) {
				dep_node.subscribers.retain(|&id| id != node_id);
			}
		}
	}

	/// Remove a node from the dependency graph
	///
	/// This should be called when a Signal/Computed/Effect is dropped.
	///
	/// # Arguments
	///
	/// * `node_id` - ID of the node to remove
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		let removed = self.dependency_graph.borrow_mut().remove(&node_id);
		if let Some(node) = removed {
			let mut graph = self.dependency_graph.borrow_mut();
			for subscriber in node.subscribers {
				if let Some(subscriber_node) = graph.get_mut(&subscriber) {
					subscriber_node.dependencies.retain(|&id| id != node_id);
				}
			}
		}
		self.subscribers.borrow_mut().remove(&node_id);
		self.dequeue_effect(node_id);
	}

	/// Check if a node exists in the dependency graph (for testing)
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Get the number of subscribers for a node (for testing)
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}

	/// Get the number of dependencies of a node (for testing)
	pub fn dependency_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.dependencies.len())
			.unwrap_or(0)
	}

	/// Number of effects waiting to run (for testing)
	pub fn pending_effect_count(&self) -> usize {
		self.pending_effects.borrow().len()
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

/// Pops the observer frame pushed by `evaluate`/`untracked`, also on unwind.
struct FrameGuard<'a> {
	runtime: &'a Runtime,
}

impl FrameGuard<'_> {
	fn finish(self) -> Vec<TrackedRead> {
		let frame = self.runtime.observer_stack.borrow_mut().pop();
		core::mem::forget(self);
		frame.map(|observer| observer.reads).unwrap_or_default()
	}
}

impl Drop for FrameGuard<'_> {
	fn drop(&mut self) {
		self.runtime.observer_stack.borrow_mut().pop();
	}
}

/// Leaves the outermost batch after draining, also when an effect panics.
struct FlushGuard<'a> {
	runtime: &'a Runtime,
}

impl Drop for FlushGuard<'_> {
	fn drop(&mut self) {
		self.runtime.batch_depth.set(0);
		if std::thread::panicking() {
			self.runtime.discard_pending();
		}
	}
}

// Thread-local runtime instance
//
// In WASM, there is only one thread, so this effectively provides a global runtime.
// On non-WASM platforms, each thread gets its own runtime instance.
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
///
/// # Example
///
/// ```
/// use reinhardt_reactive::{Signal, with_runtime};
///
/// let count = Signal::new(0);
/// assert_eq!(with_runtime(|rt| rt.subscriber_count(count.id())), 0);
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Runs `f` as one batch: effects invalidated inside it run once, after the
/// outermost batch returns.
///
/// Batches nest. Effects queued while the queue is draining are drained in
/// the same flush. If `f` panics the queue is discarded.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use reinhardt_reactive::{Effect, Signal, batch_effects};
///
/// let first = Signal::new(1);
/// let second = Signal::new(2);
/// let runs = Rc::new(Cell::new(0));
///
/// let _effect = Effect::new({
/// 	let (first, second, runs) = (first.clone(), second.clone(), runs.clone());
/// 	move || {
/// 		let _ = first.get() + second.get();
/// 		runs.set(runs.get() + 1);
/// 	}
/// });
///
/// batch_effects(|| {
/// 	first.set(10);
/// 	second.set(20);
/// });
/// assert_eq!(runs.get(), 2);
/// ```
pub fn batch_effects<R>(f: impl FnOnce() -> R) -> R {
	with_runtime(Runtime::begin_batch);
	let batch = BatchGuard;
	let value = f();
	drop(batch);
	value
}

struct BatchGuard;

impl Drop for BatchGuard {
	fn drop(&mut self) {
		let flush = !std::thread::panicking();
		let _ = try_with_runtime(|rt| rt.end_batch(flush));
	}
}

/// Runs `f` without recording any reads into the current observer.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
	with_runtime(|rt| rt.untracked(f))
}

/// Replaces the configuration of this thread's runtime.
pub fn configure_runtime(config: RuntimeConfig) {
	tracing::debug!(?config, "reactive runtime configured");
	with_runtime(|rt| rt.set_config(config));
}

/// Returns the configuration of this thread's runtime.
pub fn runtime_config() -> RuntimeConfig {
	with_runtime(Runtime::config)
}
