//! Events dispatched to host nodes.

use std::rc::Rc;

use crate::Node;

/// Callback registered with [`Node::add_event_listener`].
pub type EventListener = Rc<dyn Fn(&Event)>;

/// A host event.
///
/// Events carry an optional string payload, standing in for the value of an
/// input element at the time the event fired.
#[derive(Debug, Clone)]
pub struct Event {
	event_type: String,
	value: Option<String>,
	target: Option<Node>,
}

impl Event {
	/// Creates an event of the given type (`"click"`, `"input"`, ...).
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			value: None,
			target: None,
		}
	}

	/// Attaches a payload value.
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Event type.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Payload value, if any.
	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}

	/// Node the event was dispatched to. Set by [`Node::dispatch_event`].
	pub fn target(&self) -> Option<&Node> {
		self.target.as_ref()
	}

	pub(crate) fn targeted(&self, target: &Node) -> Self {
		Self {
			target: Some(target.clone()),
			..self.clone()
		}
	}
}
