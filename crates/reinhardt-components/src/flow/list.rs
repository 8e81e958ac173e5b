use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::component::{Component, UpdateFlow};
use crate::fragment::{Fragment, IntoComponent};
use crate::watch::Watchable;

/// Renders one component per item, reusing components by key.
///
/// When the list changes, items whose key is still present keep their
/// component (and its state); only new keys are rendered and the children
/// are reordered with the minimum number of moves. If the keys come out in
/// the same order as the current children nothing is touched.
///
/// Keys must be unique; an item whose key was already seen in the same list
/// is skipped with a warning.
///
/// ```
/// use reinhardt_components::{For, IntoComponent};
/// use reinhardt_dom::Node;
///
/// let list = For::new(vec!["a", "b", "c"], |item| item.to_uppercase()).into_component();
///
/// let container = Node::element("ul");
/// let _root = list.attach_to(&container).unwrap();
/// assert_eq!(container.inner_html(), "ABC");
/// ```
pub struct For<T, K> {
	items: Watchable<Vec<T>>,
	key: Rc<dyn Fn(&T) -> K>,
	render: Rc<dyn Fn(&T) -> Fragment>,
}

impl<T: Clone + Hash + Eq + 'static> For<T, T> {
	/// Keys every item by its own value.
	pub fn new<F: Into<Fragment>>(
		items: impl Into<Watchable<Vec<T>>>,
		render: impl Fn(&T) -> F + 'static,
	) -> Self {
		Self::keyed(items, T::clone, render)
	}
}

impl<T: 'static, K: Hash + Eq + 'static> For<T, K> {
	/// Keys every item with `key`.
	pub fn keyed<F: Into<Fragment>>(
		items: impl Into<Watchable<Vec<T>>>,
		key: impl Fn(&T) -> K + 'static,
		render: impl Fn(&T) -> F + 'static,
	) -> Self {
		Self {
			items: items.into(),
			key: Rc::new(key),
			render: Rc::new(move |item: &T| -> Fragment { render(item).into() }),
		}
	}
}

impl<T: 'static, K: Hash + Eq + 'static> IntoComponent for For<T, K> {
	fn into_component(self) -> Component {
		let Self { items, key, render } = self;
		let group = Component::group_named("for");
		let cache: RefCell<HashMap<K, Component>> = RefCell::new(HashMap::new());

		// Items are compared by key below, so every pass re-reads the list.
		group.watch_value(items, None, move |group, items| {
			let mut previous = cache.take();
			let mut current = HashMap::with_capacity(items.len());
			let mut desired = Vec::with_capacity(items.len());
			for (index, item) in items.iter().enumerate() {
				let item_key = key(item);
				if current.contains_key(&item_key) {
					tracing::warn!(index, "duplicate key in keyed list; item skipped");
					continue;
				}
				let component = previous
					.remove(&item_key)
					.unwrap_or_else(|| Component::from_fragment(render(item)));
				desired.push(component.clone());
				current.insert(item_key, component);
			}
			*cache.borrow_mut() = current;

			if !group.children_match(&desired) {
				group.replace_children(desired)?;
			}
			// Reused items still need this pass.
			Ok(UpdateFlow::Continue)
		});
		group
	}
}
