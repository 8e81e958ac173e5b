//! The retained component tree.
//!
//! A [`Component`] is a node of the logical UI tree. It may own a host
//! [`Node`] (an element or text) or be a *group* that only organizes its
//! children; a group's children are spliced into the nearest ancestor that
//! owns a host node, in tree order.
//!
//! ## Ownership
//!
//! Children form an intrusive doubly linked list. A parent owns its first
//! child and every child owns its next sibling; `last_child`,
//! `prev_sibling` and `parent` are weak. Dropping the last handle to a
//! parent releases the whole subtree without recursion on the sibling
//! chain.
//!
//! ## Lifecycle
//!
//! - **mount** listeners run when a component becomes part of a mounted
//!   tree, parents before children;
//! - **mounted** listeners run after the component's host nodes have been
//!   inserted into the host tree;
//! - **update** listeners run on every [`update`](Component::update) pass,
//!   parents before children, skipping subtrees without update listeners;
//! - **unmount** listeners run when the component leaves a mounted tree.
//!
//! The tree operations live in submodules: `tree` (insert/remove/reconcile),
//! `lifecycle` (mount/unmount/update), `native` (host node splicing) and
//! `boundary` (error and suspense propagation).

mod boundary;
mod lifecycle;
mod native;
mod tree;

use core::cell::{Cell, RefCell};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::any::Any;
use std::borrow::Cow;
use std::rc::{Rc, Weak};

use reinhardt_dom::Node;
use reinhardt_ui_utils::ThinVec;

use crate::error::{UiError, UiResult};

/// Callback for mount, mounted and unmount events.
pub type Listener = Rc<dyn Fn(&Component) -> UiResult<()>>;

/// Callback for update passes.
pub type UpdateListener = Rc<dyn Fn(&Component) -> UiResult<UpdateFlow>>;

/// Error handler. Returns `true` when the error was handled.
pub type ErrorHandler = Rc<dyn Fn(&Component, &UiError) -> bool>;

/// Receives the pending-work count of the subtree it is installed on.
pub type SuspenseHandler = Rc<dyn Fn(&Component, usize)>;

/// What an update listener asks of the rest of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateFlow {
	/// Carry on into the children.
	#[default]
	Continue,
	/// The children were rebuilt or replaced; do not update them this pass.
	SkipChildren,
}

#[derive(Default)]
pub(crate) struct Links {
	parent: Weak<ComponentInner>,
	first_child: Option<Component>,
	last_child: Weak<ComponentInner>,
	prev_sibling: Weak<ComponentInner>,
	next_sibling: Option<Component>,
}

#[derive(Default)]
pub(crate) struct Listeners {
	mount: ThinVec<Listener>,
	mounted: ThinVec<Listener>,
	unmount: ThinVec<Listener>,
	update: ThinVec<UpdateListener>,
}

pub(crate) struct ComponentInner {
	node: Option<Node>,
	name: Option<Cow<'static, str>>,
	mounted: Cell<bool>,
	detached: Cell<bool>,
	links: RefCell<Links>,
	listeners: RefCell<Listeners>,
	/// Update listeners in this subtree, own included.
	update_total: Cell<usize>,
	error_handler: RefCell<Option<ErrorHandler>>,
	unhandled_error: RefCell<Option<UiError>>,
	/// Pending async work in this subtree that has not been absorbed by a
	/// descendant's suspense handler.
	suspense_count: Cell<usize>,
	suspense_handler: RefCell<Option<SuspenseHandler>>,
	contexts: RefCell<ThinVec<(usize, Rc<dyn Any>)>>,
}

impl Drop for ComponentInner {
	fn drop(&mut self) {
		// Unlink the sibling chain iteratively so long child lists do not
		// recurse once per sibling.
		let mut next = self.links.get_mut().first_child.take();
		while let Some(child) = next {
			next = child.inner.links.borrow_mut().next_sibling.take();
		}
	}
}

/// Handle to a component. Clones share the component; equality is identity.
#[derive(Clone)]
pub struct Component {
	pub(crate) inner: Rc<ComponentInner>,
}

/// Non-owning handle to a component.
#[derive(Clone, Default)]
pub struct WeakComponent(Weak<ComponentInner>);

impl WeakComponent {
	pub fn upgrade(&self) -> Option<Component> {
		self.0.upgrade().map(Component::from_inner)
	}
}

impl fmt::Debug for WeakComponent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.upgrade() {
			Some(component) => f.debug_tuple("WeakComponent").field(&component).finish(),
			None => f.write_str("WeakComponent(<dropped>)"),
		}
	}
}

impl Component {
	fn build(node: Option<Node>, name: Option<Cow<'static, str>>) -> Self {
		Self {
			inner: Rc::new(ComponentInner {
				node,
				name,
				mounted: Cell::new(false),
				detached: Cell::new(false),
				links: RefCell::new(Links::default()),
				listeners: RefCell::new(Listeners::default()),
				update_total: Cell::new(0),
				error_handler: RefCell::new(None),
				unhandled_error: RefCell::new(None),
				suspense_count: Cell::new(0),
				suspense_handler: RefCell::new(None),
				contexts: RefCell::new(ThinVec::new()),
			}),
		}
	}

	pub(crate) fn from_inner(inner: Rc<ComponentInner>) -> Self {
		Self { inner }
	}

	/// Creates a component owning `node`, or a group when `node` is `None`.
	pub fn new(node: Option<Node>) -> Self {
		Self::build(node, None)
	}

	/// Like [`new`](Component::new) with a name used in logs and `Debug`.
	pub fn named(node: Option<Node>, name: impl Into<Cow<'static, str>>) -> Self {
		Self::build(node, Some(name.into()))
	}

	/// Creates a component owning a new element.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> Self {
		Self::new(Some(Node::element(tag)))
	}

	/// Creates a group component without a host node.
	pub fn group() -> Self {
		Self::new(None)
	}

	/// Creates a named group component.
	pub fn group_named(name: impl Into<Cow<'static, str>>) -> Self {
		Self::named(None, name)
	}

	/// Creates a component owning a text node.
	pub fn text(content: impl Into<String>) -> Self {
		Self::new(Some(Node::text(content)))
	}

	pub fn downgrade(&self) -> WeakComponent {
		WeakComponent(Rc::downgrade(&self.inner))
	}

	/// Host node owned by this component, if any.
	pub fn node(&self) -> Option<&Node> {
		self.inner.node.as_ref()
	}

	pub fn name(&self) -> Option<&str> {
		self.inner.name.as_deref()
	}

	/// Name, tag or kind, for diagnostics.
	pub fn debug_name(&self) -> String {
		if let Some(name) = self.name() {
			return name.to_string();
		}
		match &self.inner.node {
			Some(node) => match node.tag_name() {
				Some(tag) => format!("<{tag}>"),
				None => "#text".to_string(),
			},
			None => "group".to_string(),
		}
	}

	pub fn is_mounted(&self) -> bool {
		self.inner.mounted.get()
	}

	/// Whether this component's host nodes are held out of the host tree.
	pub fn is_detached(&self) -> bool {
		self.inner.detached.get()
	}

	pub fn parent(&self) -> Option<Component> {
		self.inner
			.links
			.borrow()
			.parent
			.upgrade()
			.map(Component::from_inner)
	}

	pub fn first_child(&self) -> Option<Component> {
		self.inner.links.borrow().first_child.clone()
	}

	pub fn last_child(&self) -> Option<Component> {
		self.inner
			.links
			.borrow()
			.last_child
			.upgrade()
			.map(Component::from_inner)
	}

	pub fn next_sibling(&self) -> Option<Component> {
		self.inner.links.borrow().next_sibling.clone()
	}

	pub fn prev_sibling(&self) -> Option<Component> {
		self.inner
			.links
			.borrow()
			.prev_sibling
			.upgrade()
			.map(Component::from_inner)
	}

	/// Children in order.
	pub fn children(&self) -> Vec<Component> {
		let mut children = Vec::new();
		let mut current = self.first_child();
		while let Some(child) = current {
			current = child.next_sibling();
			children.push(child);
		}
		children
	}

	pub fn child_count(&self) -> usize {
		let mut count = 0;
		let mut current = self.first_child();
		while let Some(child) = current {
			count += 1;
			current = child.next_sibling();
		}
		count
	}

	/// Topmost ancestor, or `self`.
	pub fn root(&self) -> Component {
		let mut current = self.clone();
		while let Some(parent) = current.parent() {
			current = parent;
		}
		current
	}

	/// Whether `self` is a strict ancestor of `other`.
	pub fn is_ancestor_of(&self, other: &Component) -> bool {
		let mut current = other.parent();
		while let Some(component) = current {
			if component == *self {
				return true;
			}
			current = component.parent();
		}
		false
	}

	/// Registers a listener run when this component is mounted.
	pub fn on_mount(&self, listener: impl Fn(&Component) -> UiResult<()> + 'static) -> &Self {
		self.push_mount_listener(Rc::new(listener));
		self
	}

	/// Registers a listener run once this component's host nodes are in
	/// place after mounting.
	pub fn on_mounted(&self, listener: impl Fn(&Component) -> UiResult<()> + 'static) -> &Self {
		self.push_mounted_listener(Rc::new(listener));
		self
	}

	/// Registers a listener run when this component is unmounted.
	pub fn on_unmount(&self, listener: impl Fn(&Component) -> UiResult<()> + 'static) -> &Self {
		self.push_unmount_listener(Rc::new(listener));
		self
	}

	/// Registers a listener run on every update pass reaching this
	/// component.
	pub fn on_update(
		&self,
		listener: impl Fn(&Component) -> UiResult<UpdateFlow> + 'static,
	) -> &Self {
		self.push_update_listener(Rc::new(listener));
		self
	}

	pub(crate) fn push_mount_listener(&self, listener: Listener) {
		self.inner.listeners.borrow_mut().mount.push(listener);
	}

	pub(crate) fn push_mounted_listener(&self, listener: Listener) {
		self.inner.listeners.borrow_mut().mounted.push(listener);
	}

	pub(crate) fn push_unmount_listener(&self, listener: Listener) {
		self.inner.listeners.borrow_mut().unmount.push(listener);
	}

	pub(crate) fn push_update_listener(&self, listener: UpdateListener) {
		self.inner.listeners.borrow_mut().update.push(listener);
		self.propagate_update_total(1);
	}

	/// Number of update listeners in this subtree.
	pub fn update_listener_total(&self) -> usize {
		self.inner.update_total.get()
	}

	/// Adds `delta` to the update totals of this component and its
	/// ancestors.
	pub(crate) fn propagate_update_total(&self, delta: isize) {
		let mut current = Some(self.clone());
		while let Some(component) = current {
			let total = component.inner.update_total.get();
			component
				.inner
				.update_total
				.set(total.saturating_add_signed(delta));
			current = component.parent();
		}
	}

	/// Runs a lifecycle listener, routing a failure into the error path.
	pub(crate) fn invoke(&self, listener: &Listener) {
		if let Err(error) = listener(self) {
			self.inject_error(error);
		}
	}

	pub(crate) fn context_slot(&self, id: usize) -> Option<Rc<dyn Any>> {
		self.inner
			.contexts
			.borrow()
			.iter()
			.find(|(slot, _)| *slot == id)
			.map(|(_, value)| Rc::clone(value))
	}

	pub(crate) fn set_context_slot(&self, id: usize, value: Rc<dyn Any>) {
		let mut contexts = self.inner.contexts.borrow_mut();
		if let Some(entry) = contexts.iter_mut().find(|(slot, _)| *slot == id) {
			entry.1 = value;
			return;
		}
		contexts.push((id, value));
	}
}

impl PartialEq for Component {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for Component {}

impl Hash for Component {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::ptr::hash(Rc::as_ptr(&self.inner), state);
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component")
			.field("name", &self.debug_name())
			.field("mounted", &self.is_mounted())
			.field("detached", &self.is_detached())
			.field("children", &self.child_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_equality_is_identity() {
		let a = Component::element("div");
		let b = Component::element("div");

		assert_eq!(a, a.clone());
		assert_ne!(a, b);
	}

	#[rstest]
	#[case(Component::element("section"), "<section>")]
	#[case(Component::text("hi"), "#text")]
	#[case(Component::group(), "group")]
	#[case(Component::group_named("list"), "list")]
	fn test_debug_name(#[case] component: Component, #[case] expected: &str) {
		assert_eq!(component.debug_name(), expected);
	}

	#[rstest]
	fn test_update_listeners_are_counted_up_the_chain() {
		let parent = Component::group();
		let child = Component::group();
		parent.append_child(&child).unwrap();

		child.on_update(|_| Ok(UpdateFlow::Continue));
		child.on_update(|_| Ok(UpdateFlow::Continue));

		assert_eq!(child.update_listener_total(), 2);
		assert_eq!(parent.update_listener_total(), 2);
	}

	#[rstest]
	fn test_dropping_parent_releases_long_sibling_chain() {
		let parent = Component::group();
		let kept = Component::text("kept");
		for _ in 0..50_000 {
			parent.append_child(&Component::group()).unwrap();
		}
		parent.append_child(&kept).unwrap();

		drop(parent);

		assert!(kept.parent().is_none());
		assert!(kept.prev_sibling().is_none());
	}

	#[rstest]
	fn test_weak_handle_does_not_keep_component_alive() {
		let component = Component::group();
		let weak = component.downgrade();
		assert_eq!(weak.upgrade(), Some(component.clone()));

		drop(component);

		assert!(weak.upgrade().is_none());
	}
}
