//! Host nodes.
//!
//! A [`Node`] is a cheap, reference-counted handle. Two handles compare equal
//! only if they point at the same node. Parents own their children; the
//! child's back-pointer to its parent is weak.

use core::cell::RefCell;
use core::fmt;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::error::{DomError, DomResult};
use crate::event::{Event, EventListener};

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// An element with a lower-case tag name.
	Element(Cow<'static, str>),
	/// A text node.
	Text,
	/// A comment node.
	Comment,
}

impl NodeKind {
	fn describe(&self) -> &'static str {
		match self {
			Self::Element(_) => "Element",
			Self::Text => "Text",
			Self::Comment => "Comment",
		}
	}
}

/// Value assigned through an element property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
	/// Cleared property.
	Null,
	Bool(bool),
	Number(f64),
	Text(String),
}

#[derive(Default)]
struct NodeState {
	parent: Weak<NodeInner>,
	children: Vec<Node>,
	text: String,
	attributes: BTreeMap<String, String>,
	properties: BTreeMap<String, PropertyValue>,
	style: BTreeMap<String, String>,
	listeners: Vec<(String, EventListener)>,
}

struct NodeInner {
	kind: NodeKind,
	state: RefCell<NodeState>,
}

/// Handle to a host node.
#[derive(Clone)]
pub struct Node {
	inner: Rc<NodeInner>,
}

impl Node {
	fn with_kind(kind: NodeKind, text: String) -> Self {
		Self {
			inner: Rc::new(NodeInner {
				kind,
				state: RefCell::new(NodeState {
					text,
					..NodeState::default()
				}),
			}),
		}
	}

	/// Creates an element. The tag is stored lower-cased.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let tag = if tag.bytes().any(|b| b.is_ascii_uppercase()) {
			Cow::Owned(tag.to_ascii_lowercase())
		} else {
			tag
		};
		Self::with_kind(NodeKind::Element(tag), String::new())
	}

	/// Creates a text node.
	pub fn text(content: impl Into<String>) -> Self {
		Self::with_kind(NodeKind::Text, content.into())
	}

	/// Creates a comment node.
	pub fn comment(content: impl Into<String>) -> Self {
		Self::with_kind(NodeKind::Comment, content.into())
	}

	pub fn kind(&self) -> &NodeKind {
		&self.inner.kind
	}

	/// Tag name for elements, `None` otherwise.
	pub fn tag_name(&self) -> Option<&str> {
		match &self.inner.kind {
			NodeKind::Element(tag) => Some(tag),
			_ => None,
		}
	}

	pub fn is_element(&self) -> bool {
		matches!(self.inner.kind, NodeKind::Element(_))
	}

	/// Text of a text or comment node; concatenated descendant text for
	/// elements.
	pub fn text_content(&self) -> String {
		match self.inner.kind {
			NodeKind::Element(_) => {
				let mut out = String::new();
				self.collect_text(&mut out);
				out
			}
			_ => self.inner.state.borrow().text.clone(),
		}
	}

	fn collect_text(&self, out: &mut String) {
		for child in self.child_nodes() {
			match child.kind() {
				NodeKind::Text => out.push_str(&child.inner.state.borrow().text),
				NodeKind::Element(_) => child.collect_text(out),
				NodeKind::Comment => {}
			}
		}
	}

	/// Replaces the data of a text or comment node.
	///
	/// On an element this replaces all children with a single text node.
	pub fn set_text(&self, content: &str) {
		if self.is_element() {
			let removed = std::mem::take(&mut self.inner.state.borrow_mut().children);
			for child in removed {
				child.inner.state.borrow_mut().parent = Weak::new();
			}
			if !content.is_empty() {
				let text = Node::text(content);
				text.inner.state.borrow_mut().parent = Rc::downgrade(&self.inner);
				self.inner.state.borrow_mut().children.push(text);
			}
			return;
		}
		let mut state = self.inner.state.borrow_mut();
		if state.text != content {
			state.text.clear();
			state.text.push_str(content);
		}
	}

	pub fn parent_node(&self) -> Option<Node> {
		self.inner
			.state
			.borrow()
			.parent
			.upgrade()
			.map(|inner| Node { inner })
	}

	pub fn child_nodes(&self) -> Vec<Node> {
		self.inner.state.borrow().children.clone()
	}

	pub fn child_count(&self) -> usize {
		self.inner.state.borrow().children.len()
	}

	pub fn first_child(&self) -> Option<Node> {
		self.inner.state.borrow().children.first().cloned()
	}

	pub fn last_child(&self) -> Option<Node> {
		self.inner.state.borrow().children.last().cloned()
	}

	pub fn next_sibling(&self) -> Option<Node> {
		let parent = self.parent_node()?;
		let state = parent.inner.state.borrow();
		let index = state.children.iter().position(|child| child == self)?;
		state.children.get(index + 1).cloned()
	}

	/// Whether `other` is this node or one of its descendants.
	pub fn contains(&self, other: &Node) -> bool {
		let mut current = Some(other.clone());
		while let Some(node) = current {
			if node == *self {
				return true;
			}
			current = node.parent_node();
		}
		false
	}

	/// Inserts `child` before `reference`, or appends it when `reference` is
	/// `None`.
	///
	/// A child that already has a parent is moved.
	pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> DomResult<()> {
		if !self.is_element() {
			return Err(DomError::NotAContainer(self.inner.kind.describe()));
		}
		if child.contains(self) {
			return Err(DomError::HierarchyRequest);
		}
		if let Some(reference) = reference {
			if reference.parent_node().as_ref() != Some(self) {
				return Err(self.not_a_child());
			}
		}
		// Inserting a node before itself leaves it in place.
		if reference == Some(child) {
			return Ok(());
		}

		if let Some(old_parent) = child.parent_node() {
			old_parent.detach(child);
		}
		let mut state = self.inner.state.borrow_mut();
		let index = match reference {
			Some(reference) => state
				.children
				.iter()
				.position(|existing| existing == reference)
				.unwrap_or(state.children.len()),
			None => state.children.len(),
		};
		state.children.insert(index, child.clone());
		drop(state);
		child.inner.state.borrow_mut().parent = Rc::downgrade(&self.inner);
		Ok(())
	}

	/// Appends `child`, moving it if it already has a parent.
	pub fn append_child(&self, child: &Node) -> DomResult<()> {
		self.insert_before(child, None)
	}

	/// Removes `child` from this node.
	pub fn remove_child(&self, child: &Node) -> DomResult<()> {
		if child.parent_node().as_ref() != Some(self) {
			return Err(self.not_a_child());
		}
		self.detach(child);
		Ok(())
	}

	fn detach(&self, child: &Node) {
		self.inner
			.state
			.borrow_mut()
			.children
			.retain(|existing| existing != child);
		child.inner.state.borrow_mut().parent = Weak::new();
	}

	fn not_a_child(&self) -> DomError {
		DomError::NotAChild {
			parent: self
				.tag_name()
				.unwrap_or(self.inner.kind.describe())
				.to_string(),
		}
	}

	pub fn set_attribute(&self, name: &str, value: &str) {
		self.inner
			.state
			.borrow_mut()
			.attributes
			.insert(name.to_string(), value.to_string());
	}

	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.inner.state.borrow().attributes.get(name).cloned()
	}

	pub fn has_attribute(&self, name: &str) -> bool {
		self.inner.state.borrow().attributes.contains_key(name)
	}

	pub fn remove_attribute(&self, name: &str) {
		self.inner.state.borrow_mut().attributes.remove(name);
	}

	/// Attributes in name order.
	pub fn attributes(&self) -> Vec<(String, String)> {
		self.inner
			.state
			.borrow()
			.attributes
			.iter()
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect()
	}

	/// Whether `name` is a live property of this element rather than an
	/// attribute.
	///
	/// Properties hold state that diverges from the markup once the user
	/// interacts with the element, such as an input's current value.
	pub fn has_property(&self, name: &str) -> bool {
		let Some(tag) = self.tag_name() else {
			return false;
		};
		matches!(
			(tag, name),
			("input", "value" | "checked" | "indeterminate" | "disabled")
				| ("textarea", "value" | "disabled")
				| ("select", "value" | "selectedIndex" | "disabled")
				| ("option", "selected" | "value")
				| ("button", "disabled")
		)
	}

	/// Assigns a property. Returns `false` if the element has no such
	/// property.
	pub fn set_property(&self, name: &str, value: PropertyValue) -> bool {
		if !self.has_property(name) {
			tracing::trace!(name, "ignored assignment to unknown property");
			return false;
		}
		self.inner
			.state
			.borrow_mut()
			.properties
			.insert(name.to_string(), value);
		true
	}

	pub fn property(&self, name: &str) -> Option<PropertyValue> {
		self.inner.state.borrow().properties.get(name).cloned()
	}

	/// Sets one inline style declaration, or clears it with `None`.
	pub fn set_style_property(&self, name: &str, value: Option<&str>) {
		let mut state = self.inner.state.borrow_mut();
		match value {
			Some(value) => {
				state.style.insert(name.to_string(), value.to_string());
			}
			None => {
				state.style.remove(name);
			}
		}
	}

	pub fn style_property(&self, name: &str) -> Option<String> {
		self.inner.state.borrow().style.get(name).cloned()
	}

	/// Inline style serialized as `name: value; ...` in name order.
	pub fn style_text(&self) -> String {
		self.inner
			.state
			.borrow()
			.style
			.iter()
			.map(|(name, value)| format!("{name}: {value}"))
			.collect::<Vec<_>>()
			.join("; ")
	}

	pub fn add_event_listener(&self, event_type: &str, listener: EventListener) {
		self.inner
			.state
			.borrow_mut()
			.listeners
			.push((event_type.to_string(), listener));
	}

	/// Number of listeners registered for `event_type`.
	pub fn listener_count(&self, event_type: &str) -> usize {
		self.inner
			.state
			.borrow()
			.listeners
			.iter()
			.filter(|(kind, _)| kind == event_type)
			.count()
	}

	/// Calls every listener registered for the event's type, in
	/// registration order. Returns the number of listeners invoked.
	pub fn dispatch_event(&self, event: &Event) -> usize {
		let listeners: Vec<EventListener> = self
			.inner
			.state
			.borrow()
			.listeners
			.iter()
			.filter(|(kind, _)| kind == event.event_type())
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		let event = event.targeted(self);
		for listener in &listeners {
			listener(&event);
		}
		listeners.len()
	}

	pub(crate) fn with_state<R>(&self, f: impl FnOnce(&NodeStateView<'_>) -> R) -> R {
		let state = self.inner.state.borrow();
		f(&NodeStateView {
			text: &state.text,
			attributes: &state.attributes,
		})
	}
}

/// Read-only view used by the serializer.
pub(crate) struct NodeStateView<'a> {
	pub(crate) text: &'a str,
	pub(crate) attributes: &'a BTreeMap<String, String>,
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for Node {}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.inner.kind {
			NodeKind::Element(tag) => f
				.debug_struct("Element")
				.field("tag", tag)
				.field("children", &self.child_count())
				.finish(),
			NodeKind::Text => f.debug_tuple("Text").field(&self.text_content()).finish(),
			NodeKind::Comment => f.debug_tuple("Comment").field(&self.text_content()).finish(),
		}
	}
}
