use std::cell::RefCell;
use std::rc::Rc;

use crate::component::{Component, UpdateFlow};
use crate::fragment::{Fragment, IntoComponent};
use crate::watch::{Watchable, partial_eq};

/// Renders `render(i)` for every index below a watched count.
///
/// Growing appends the new indices; shrinking removes from the end. Indices
/// that stay below the count keep their components.
pub struct Repeat {
	count: Watchable<usize>,
	render: Rc<dyn Fn(usize) -> Fragment>,
}

impl Repeat {
	pub fn new<F: Into<Fragment>>(
		count: impl Into<Watchable<usize>>,
		render: impl Fn(usize) -> F + 'static,
	) -> Self {
		Self {
			count: count.into(),
			render: Rc::new(move |index| -> Fragment { render(index).into() }),
		}
	}
}

impl IntoComponent for Repeat {
	fn into_component(self) -> Component {
		let Self { count, render } = self;
		let group = Component::group_named("repeat");
		let rendered: RefCell<Vec<Component>> = RefCell::new(Vec::new());

		group.watch_value(count, partial_eq(), move |group, &count| {
			let len = rendered.borrow().len();
			if count > len {
				for index in len..count {
					let component = Component::from_fragment(render(index));
					group.append_child(&component)?;
					rendered.borrow_mut().push(component);
				}
			} else if count < len {
				let removed: Vec<Component> = rendered.borrow_mut().drain(count..).collect();
				for component in removed.iter().rev() {
					if component.parent().as_ref() == Some(group) {
						group.remove_child(component)?;
					}
				}
			}
			Ok(UpdateFlow::Continue)
		});
		group
	}
}

#[cfg(test)]
mod tests {
	use reinhardt_dom::Node;
	use reinhardt_reactive::Signal;
	use rstest::rstest;
	use serial_test::serial;

	use super::*;

	#[rstest]
	#[serial]
	fn test_grow_and_shrink_keep_leading_items() {
		// Arrange
		let count = Signal::new(2_usize);
		let repeat = Repeat::new(count.clone(), |index| format!("<{index}>")).into_component();
		let container = Node::element("div");
		let root = repeat.attach_to(&container).unwrap();
		let first = repeat.first_child();
		assert_eq!(container.inner_html(), "&lt;0&gt;&lt;1&gt;");

		// Act
		count.set(4);
		root.update();
		let grown = container.inner_html();
		count.set(1);
		root.update();

		// Assert
		assert_eq!(grown, "&lt;0&gt;&lt;1&gt;&lt;2&gt;&lt;3&gt;");
		assert_eq!(container.inner_html(), "&lt;0&gt;");
		assert_eq!(repeat.first_child(), first);
	}

	#[rstest]
	#[case(0, "")]
	#[case(3, "xxx")]
	fn test_constant_count(#[case] count: usize, #[case] expected: &str) {
		let container = Node::element("p");

		let _root = Repeat::new(count, |_| "x")
			.into_component()
			.attach_to(&container)
			.unwrap();

		assert_eq!(container.inner_html(), expected);
	}
}
