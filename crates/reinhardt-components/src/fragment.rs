//! Fragments: what a render function returns.
//!
//! A [`Fragment`] is flattened into a list of components before it is
//! placed in the tree. Adjacent static text is merged into a single text
//! node; reactive and asynchronous text each get a text component that
//! rewrites its node when the value arrives or changes.

use core::fmt;
use std::borrow::Cow;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use reinhardt_reactive::{Computed, Signal};

use crate::component::Component;
use crate::error::TreeResult;
use crate::watch::Watchable;

/// Renderable content.
#[derive(Default)]
pub enum Fragment {
	#[default]
	Empty,
	/// Static text.
	Text(Cow<'static, str>),
	/// Text re-read on every update pass.
	Reactive(Rc<dyn Fn() -> String>),
	/// Text that is still loading.
	Future(LocalBoxFuture<'static, String>),
	Component(Component),
	Sequence(Vec<Fragment>),
}

impl Fragment {
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(text.into())
	}

	/// Text computed by `read`, refreshed on update passes.
	pub fn reactive<T: Display>(read: impl Fn() -> T + 'static) -> Self {
		Self::Reactive(Rc::new(move || read().to_string()))
	}

	/// Text produced by `future`, counted as pending work until it resolves.
	pub fn future<T: Display>(future: impl Future<Output = T> + 'static) -> Self {
		Self::Future(future.map(|value| value.to_string()).boxed_local())
	}

	/// Flattens the fragment into the components to insert, in order.
	pub fn into_components(self) -> Vec<Component> {
		let mut components = Vec::new();
		let mut text = String::new();
		self.flatten_into(&mut components, &mut text);
		flush_text(&mut components, &mut text);
		components
	}

	fn flatten_into(self, components: &mut Vec<Component>, text: &mut String) {
		match self {
			Self::Empty => {}
			Self::Text(value) => text.push_str(&value),
			Self::Reactive(read) => {
				flush_text(components, text);
				components.push(dynamic_text(Watchable::Reactive(read)));
			}
			Self::Future(future) => {
				flush_text(components, text);
				components.push(dynamic_text(Watchable::Future(future)));
			}
			Self::Component(component) => {
				flush_text(components, text);
				components.push(component);
			}
			Self::Sequence(items) => {
				for item in items {
					item.flatten_into(components, text);
				}
			}
		}
	}
}

fn flush_text(components: &mut Vec<Component>, text: &mut String) {
	if !text.is_empty() {
		components.push(Component::text(std::mem::take(text)));
	}
}

fn dynamic_text(value: Watchable<String>) -> Component {
	let component = Component::text(String::new());
	component.add_value_watcher(value, true, |component, text: &String| {
		if let Some(node) = component.node() {
			node.set_text(text);
		}
		Ok(())
	});
	component
}

impl fmt::Debug for Fragment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Self::Reactive(_) => f.write_str("Reactive"),
			Self::Future(_) => f.write_str("Future"),
			Self::Component(component) => f.debug_tuple("Component").field(component).finish(),
			Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
		}
	}
}

impl From<()> for Fragment {
	fn from((): ()) -> Self {
		Self::Empty
	}
}

impl From<&'static str> for Fragment {
	fn from(text: &'static str) -> Self {
		Self::Text(Cow::Borrowed(text))
	}
}

impl From<String> for Fragment {
	fn from(text: String) -> Self {
		Self::Text(Cow::Owned(text))
	}
}

impl From<Cow<'static, str>> for Fragment {
	fn from(text: Cow<'static, str>) -> Self {
		Self::Text(text)
	}
}

macro_rules! fragment_from_display {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Fragment {
				fn from(value: $ty) -> Self {
					Self::Text(Cow::Owned(value.to_string()))
				}
			}
		)*
	};
}

fragment_from_display!(
	bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl From<Component> for Fragment {
	fn from(component: Component) -> Self {
		Self::Component(component)
	}
}

impl<T: Into<Fragment>> From<Option<T>> for Fragment {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Empty, Into::into)
	}
}

impl<T: Into<Fragment>> From<Vec<T>> for Fragment {
	fn from(items: Vec<T>) -> Self {
		Self::Sequence(items.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Fragment>, const N: usize> From<[T; N]> for Fragment {
	fn from(items: [T; N]) -> Self {
		Self::Sequence(items.into_iter().map(Into::into).collect())
	}
}

impl<T: Display + Clone + 'static> From<Signal<T>> for Fragment {
	fn from(signal: Signal<T>) -> Self {
		Self::reactive(move || signal.get())
	}
}

impl<T: Display + Clone + 'static> From<Computed<T>> for Fragment {
	fn from(computed: Computed<T>) -> Self {
		Self::reactive(move || computed.get())
	}
}

/// Conversion into a single component.
pub trait IntoComponent {
	fn into_component(self) -> Component;
}

impl IntoComponent for Component {
	fn into_component(self) -> Component {
		self
	}
}

impl IntoComponent for Fragment {
	fn into_component(self) -> Component {
		Component::from_fragment(self)
	}
}

impl Component {
	/// Builds a component from `fragment`: the component itself when the
	/// fragment flattens to exactly one, otherwise a group holding them.
	pub fn from_fragment(fragment: impl Into<Fragment>) -> Component {
		let mut components = fragment.into().into_components();
		if components.len() == 1 {
			if let Some(component) = components.pop() {
				return component;
			}
		}
		let group = Component::group();
		for component in components {
			// Only fails for components already placed elsewhere.
			if let Err(error) = group.append_child(&component) {
				group.inject_error(error.into());
			}
		}
		group
	}

	/// Appends the components of `fragment` as children.
	pub fn append_fragment(&self, fragment: impl Into<Fragment>) -> TreeResult<()> {
		for component in fragment.into().into_components() {
			self.append_child(&component)?;
		}
		Ok(())
	}
}
