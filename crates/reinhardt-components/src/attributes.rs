//! Attribute, property, style and event binding.
//!
//! [`Component::set_attributes`] is the entry point element builders use.
//! Keys are interpreted as follows:
//!
//! | key | input |
//! |-----|-------|
//! | `onmount`, `onmounted`, `onunmount` | [`AttrInput::Lifecycle`] |
//! | `onupdate` | [`AttrInput::Update`] |
//! | `style` | [`AttrInput::Style`] |
//! | `on<event>` | [`AttrInput::Handler`] |
//! | anything else | [`AttrInput::Value`] |
//!
//! Values are assigned as element properties when the host node has a
//! property of that name, otherwise as attributes: `false` and
//! [`AttrValue::Absent`] remove the attribute and `true` sets it empty.

use std::borrow::Cow;
use std::rc::Rc;

use reinhardt_dom::{Event, Node, PropertyValue};
use reinhardt_reactive::{Computed, Signal, batch_effects};

use crate::component::{Component, Listener, UpdateFlow, UpdateListener};
use crate::error::{TreeError, TreeResult, UiResult};
use crate::watch::{Watchable, partial_eq};

/// Value bound to an attribute or property.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
	/// No attribute; clears a property.
	#[default]
	Absent,
	Bool(bool),
	Number(f64),
	Text(Cow<'static, str>),
}

impl AttrValue {
	fn to_property(&self) -> PropertyValue {
		match self {
			Self::Absent => PropertyValue::Null,
			Self::Bool(value) => PropertyValue::Bool(*value),
			Self::Number(value) => PropertyValue::Number(*value),
			Self::Text(value) => PropertyValue::Text(value.to_string()),
		}
	}

	fn apply(&self, node: &Node, name: &str) {
		if node.has_property(name) {
			node.set_property(name, self.to_property());
			return;
		}
		match self {
			Self::Absent | Self::Bool(false) => node.remove_attribute(name),
			Self::Bool(true) => node.set_attribute(name, ""),
			Self::Number(value) => node.set_attribute(name, &value.to_string()),
			Self::Text(value) => node.set_attribute(name, value),
		}
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<&'static str> for AttrValue {
	fn from(value: &'static str) -> Self {
		Self::Text(Cow::Borrowed(value))
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Text(Cow::Owned(value))
	}
}

macro_rules! attr_value_from_number {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for AttrValue {
				fn from(value: $ty) -> Self {
					Self::Number(value as f64)
				}
			}
		)*
	};
}

attr_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Absent, Into::into)
	}
}

/// Event handler bound with an `on<event>` key.
pub type EventHandler = Rc<dyn Fn(&Event) -> UiResult<()>>;

/// What can be bound to a key.
pub enum AttrInput {
	Value(Watchable<AttrValue>),
	/// Style properties; `None` removes a property.
	Style(Vec<(Cow<'static, str>, Watchable<Option<String>>)>),
	Handler(EventHandler),
	Lifecycle(Listener),
	Update(UpdateListener),
}

impl AttrInput {
	pub fn value(value: impl Into<AttrValue>) -> Self {
		Self::Value(Watchable::Value(value.into()))
	}

	/// Value re-read on every update pass.
	pub fn reactive<T: Into<AttrValue>>(read: impl Fn() -> T + 'static) -> Self {
		Self::Value(Watchable::reactive(move || read().into()))
	}

	pub fn handler(handler: impl Fn(&Event) -> UiResult<()> + 'static) -> Self {
		Self::Handler(Rc::new(handler))
	}

	pub fn lifecycle(listener: impl Fn(&Component) -> UiResult<()> + 'static) -> Self {
		Self::Lifecycle(Rc::new(listener))
	}

	pub fn update(listener: impl Fn(&Component) -> UiResult<UpdateFlow> + 'static) -> Self {
		Self::Update(Rc::new(listener))
	}

	pub fn style<K>(properties: impl IntoIterator<Item = (K, Watchable<Option<String>>)>) -> Self
	where
		K: Into<Cow<'static, str>>,
	{
		Self::Style(
			properties
				.into_iter()
				.map(|(name, value)| (name.into(), value))
				.collect(),
		)
	}

	fn kind(&self) -> &'static str {
		match self {
			Self::Value(_) => "value",
			Self::Style(_) => "style",
			Self::Handler(_) => "handler",
			Self::Lifecycle(_) => "lifecycle listener",
			Self::Update(_) => "update listener",
		}
	}
}

impl From<AttrValue> for AttrInput {
	fn from(value: AttrValue) -> Self {
		Self::Value(Watchable::Value(value))
	}
}

macro_rules! attr_input_from_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for AttrInput {
				fn from(value: $ty) -> Self {
					Self::value(value)
				}
			}
		)*
	};
}

attr_input_from_value!(bool, &'static str, String, i32, i64, u32, u64, usize, f64);

impl<T: Clone + Into<AttrValue> + 'static> From<Signal<T>> for AttrInput {
	fn from(signal: Signal<T>) -> Self {
		Self::reactive(move || signal.get())
	}
}

impl<T: Clone + Into<AttrValue> + 'static> From<Computed<T>> for AttrInput {
	fn from(computed: Computed<T>) -> Self {
		Self::reactive(move || computed.get())
	}
}

fn is_reserved(key: &str) -> bool {
	matches!(key, "onmount" | "onmounted" | "onunmount" | "onupdate" | "style")
}

impl Component {
	/// Binds every `(key, input)` pair. Stops at the first invalid pair.
	pub fn set_attributes<K: AsRef<str>>(
		&self,
		attributes: impl IntoIterator<Item = (K, AttrInput)>,
	) -> TreeResult<()> {
		for (key, input) in attributes {
			self.set_attribute(key.as_ref(), input)?;
		}
		Ok(())
	}

	/// Binds one attribute; see the module docs for how keys are read.
	pub fn set_attribute(&self, key: &str, input: impl Into<AttrInput>) -> TreeResult<()> {
		match (key, input.into()) {
			("onmount", AttrInput::Lifecycle(listener)) => self.push_mount_listener(listener),
			("onmounted", AttrInput::Lifecycle(listener)) => self.push_mounted_listener(listener),
			("onunmount", AttrInput::Lifecycle(listener)) => self.push_unmount_listener(listener),
			("onupdate", AttrInput::Update(listener)) => self.push_update_listener(listener),
			("style", AttrInput::Style(properties)) => self.bind_style(properties)?,
			(key, input) if is_reserved(key) => {
				return Err(TreeError::InvalidAttribute(format!(
					"`{key}` does not accept a {}",
					input.kind()
				)));
			}
			(key, AttrInput::Handler(handler)) => match key.strip_prefix("on") {
				Some(event) if !event.is_empty() => self.bind_event(event, handler)?,
				_ => {
					return Err(TreeError::InvalidAttribute(format!(
						"`{key}` is not an event key"
					)));
				}
			},
			(key, AttrInput::Value(value)) => self.bind_value(key, value)?,
			(key, input) => {
				return Err(TreeError::InvalidAttribute(format!(
					"`{key}` does not accept a {}",
					input.kind()
				)));
			}
		}
		Ok(())
	}

	fn require_node(&self, operation: &'static str) -> TreeResult<&Node> {
		self.node().ok_or(TreeError::NodeRequired(operation))
	}

	fn bind_value(&self, key: &str, value: Watchable<AttrValue>) -> TreeResult<()> {
		self.require_node("attribute binding")?;
		let name = key.to_string();
		self.watch_value(value, partial_eq(), move |component, value| {
			if let Some(node) = component.node() {
				value.apply(node, &name);
			}
			Ok(UpdateFlow::Continue)
		});
		Ok(())
	}

	fn bind_style(
		&self,
		properties: Vec<(Cow<'static, str>, Watchable<Option<String>>)>,
	) -> TreeResult<()> {
		self.require_node("style binding")?;
		for (name, value) in properties {
			self.watch_value(value, partial_eq(), move |component, value| {
				if let Some(node) = component.node() {
					node.set_style_property(&name, value.as_deref());
				}
				Ok(UpdateFlow::Continue)
			});
		}
		Ok(())
	}

	/// Runs `handler` for `event`, then updates the whole tree so state the
	/// handler changed is reflected.
	fn bind_event(&self, event: &str, handler: EventHandler) -> TreeResult<()> {
		let node = self.require_node("event binding")?;
		let handle = self.downgrade();
		node.add_event_listener(
			&event.to_ascii_lowercase(),
			Rc::new(move |event: &Event| {
				let Some(component) = handle.upgrade() else {
					return;
				};
				if let Err(error) = batch_effects(|| handler(event)) {
					component.inject_error(error);
				}
				component.root().update();
			}),
		);
		Ok(())
	}
}
