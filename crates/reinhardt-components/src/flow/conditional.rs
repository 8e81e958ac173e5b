use std::cell::RefCell;
use std::rc::Rc;

use super::{Render, render_fn};
use crate::component::{Component, UpdateFlow};
use crate::fragment::{Fragment, IntoComponent};
use crate::watch::{Watchable, partial_eq};

enum Arm<T> {
	Case(T, Render),
	When(Rc<dyn Fn(&T) -> bool>, Render),
}

impl<T: PartialEq> Arm<T> {
	fn matches(&self, value: &T) -> bool {
		match self {
			Self::Case(expected, _) => expected == value,
			Self::When(predicate, _) => predicate(value),
		}
	}

	fn render(&self) -> &Render {
		match self {
			Self::Case(_, render) | Self::When(_, render) => render,
		}
	}
}

/// Renders the first arm matching the watched value.
///
/// Each arm's content is built the first time the arm is selected and kept
/// while the `Match` lives, so switching back to an arm restores the same
/// components with their state.
///
/// ```
/// use reinhardt_components::{IntoComponent, Match};
/// use reinhardt_dom::Node;
///
/// let status = Match::new(404_u16)
/// 	.case(200, || "ok")
/// 	.when(|code| *code >= 500, || "server error")
/// 	.otherwise(|| "client error")
/// 	.into_component();
///
/// let container = Node::element("span");
/// status.attach_to(&container).unwrap();
/// assert_eq!(container.inner_html(), "client error");
/// ```
pub struct Match<T> {
	value: Watchable<T>,
	arms: Vec<Arm<T>>,
	otherwise: Option<Render>,
}

impl<T: PartialEq + 'static> Match<T> {
	pub fn new(value: impl Into<Watchable<T>>) -> Self {
		Self {
			value: value.into(),
			arms: Vec::new(),
			otherwise: None,
		}
	}

	/// Arm selected when the value equals `expected`.
	pub fn case<F: Into<Fragment>>(mut self, expected: T, render: impl Fn() -> F + 'static) -> Self {
		self.arms.push(Arm::Case(expected, render_fn(render)));
		self
	}

	/// Arm selected when `predicate` holds.
	pub fn when<F: Into<Fragment>>(
		mut self,
		predicate: impl Fn(&T) -> bool + 'static,
		render: impl Fn() -> F + 'static,
	) -> Self {
		self.arms.push(Arm::When(Rc::new(predicate), render_fn(render)));
		self
	}

	/// Content when no arm matches. Without it nothing is rendered.
	pub fn otherwise<F: Into<Fragment>>(mut self, render: impl Fn() -> F + 'static) -> Self {
		self.otherwise = Some(render_fn(render));
		self
	}

	fn build(self, name: &'static str) -> Component {
		let Self {
			value,
			arms,
			otherwise,
		} = self;
		let group = Component::group_named(name);
		let fallback = arms.len();
		// Slot `arms.len()` caches the `otherwise` content.
		let cache: RefCell<Vec<Option<Component>>> = RefCell::new(vec![None; arms.len() + 1]);
		let selected: RefCell<Option<Option<usize>>> = RefCell::new(None);

		group.watch_value(value, partial_eq(), move |group, value| {
			let branch = arms
				.iter()
				.position(|arm| arm.matches(value))
				.or_else(|| otherwise.as_ref().map(|_| fallback));
			if *selected.borrow() == Some(branch) {
				return Ok(UpdateFlow::Continue);
			}

			let children = match branch {
				Some(index) => {
					let cached = cache.borrow()[index].clone();
					let component = match cached {
						Some(component) => component,
						None => {
							let render = match arms.get(index) {
								Some(arm) => arm.render(),
								None => match otherwise.as_ref() {
									Some(render) => render,
									None => return Ok(UpdateFlow::Continue),
								},
							};
							let component = Component::from_fragment(render());
							cache.borrow_mut()[index] = Some(component.clone());
							component
						}
					};
					vec![component]
				}
				None => Vec::new(),
			};
			group.replace_children(children)?;
			*selected.borrow_mut() = Some(branch);
			// New content was mounted and updated when it was inserted.
			Ok(UpdateFlow::SkipChildren)
		});
		group
	}
}

impl<T: PartialEq + 'static> IntoComponent for Match<T> {
	fn into_component(self) -> Component {
		self.build("match")
	}
}

/// Renders `then` while the condition holds, otherwise the `otherwise`
/// content if any.
///
/// ```
/// use reinhardt_components::{If, IntoComponent};
/// use reinhardt_reactive::Signal;
///
/// let logged_in = Signal::new(false);
/// let greeting = If::new(logged_in.clone(), || "Welcome back")
/// 	.otherwise(|| "Please sign in")
/// 	.into_component();
/// ```
pub struct If {
	condition: Watchable<bool>,
	then: Render,
	otherwise: Option<Render>,
}

impl If {
	pub fn new<F: Into<Fragment>>(
		condition: impl Into<Watchable<bool>>,
		then: impl Fn() -> F + 'static,
	) -> Self {
		Self {
			condition: condition.into(),
			then: render_fn(then),
			otherwise: None,
		}
	}

	pub fn otherwise<F: Into<Fragment>>(mut self, render: impl Fn() -> F + 'static) -> Self {
		self.otherwise = Some(render_fn(render));
		self
	}
}

impl IntoComponent for If {
	fn into_component(self) -> Component {
		Match {
			value: self.condition,
			arms: vec![Arm::Case(true, self.then)],
			otherwise: self.otherwise,
		}
		.build("if")
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use reinhardt_dom::Node;
	use reinhardt_reactive::Signal;
	use rstest::rstest;
	use serial_test::serial;

	use super::*;

	fn mounted(component: Component) -> (Node, Component) {
		let container = Node::element("div");
		let root = component.attach_to(&container).unwrap();
		(container, root)
	}

	#[rstest]
	#[serial]
	fn test_if_swaps_branches() {
		let visible = Signal::new(true);
		let (container, root) = mounted(
			If::new(visible.clone(), || "shown")
				.otherwise(|| "hidden")
				.into_component(),
		);
		assert_eq!(container.inner_html(), "shown");

		visible.set(false);
		root.update();
		assert_eq!(container.inner_html(), "hidden");

		visible.set(true);
		root.update();
		assert_eq!(container.inner_html(), "shown");
	}

	#[rstest]
	#[serial]
	fn test_if_without_otherwise_renders_nothing() {
		let visible = Signal::new(false);
		let (container, root) = mounted(If::new(visible.clone(), || "x").into_component());
		assert_eq!(container.inner_html(), "");

		visible.set(true);
		root.update();

		assert_eq!(container.inner_html(), "x");
	}

	#[rstest]
	#[serial]
	fn test_branch_content_is_built_once() {
		// Arrange
		let tab = Signal::new(0_u8);
		let builds = Rc::new(Cell::new(0));
		let counter = builds.clone();
		let (container, root) = mounted(
			Match::new(tab.clone())
				.case(0, move || {
					counter.set(counter.get() + 1);
					"first"
				})
				.otherwise(|| "other")
				.into_component(),
		);

		// Act
		for value in [1, 0, 1, 0] {
			tab.set(value);
			root.update();
		}

		// Assert
		assert_eq!(builds.get(), 1);
		assert_eq!(container.inner_html(), "first");
	}

	#[rstest]
	#[serial]
	#[case(3, "small")]
	#[case(50, "medium")]
	#[case(500, "large")]
	fn test_when_arms_are_tried_in_order(#[case] size: u32, #[case] expected: &str) {
		let (container, _root) = mounted(
			Match::new(size)
				.when(|size| *size < 10, || "small")
				.when(|size| *size < 100, || "medium")
				.otherwise(|| "large")
				.into_component(),
		);

		assert_eq!(container.inner_html(), expected);
	}

	#[rstest]
	#[serial]
	fn test_branch_swap_unmounts_old_content() {
		let flag = Signal::new(true);
		let unmounted = Rc::new(Cell::new(false));
		let seen = unmounted.clone();
		let (_, root) = mounted(
			If::new(flag.clone(), move || {
				let seen = seen.clone();
				let branch = Component::text("on");
				branch.on_unmount(move |_| {
					seen.set(true);
					Ok(())
				});
				branch
			})
			.into_component(),
		);

		flag.set(false);
		root.update();

		assert!(unmounted.get());
	}

	#[rstest]
	#[serial]
	fn test_failed_switch_is_retried_on_next_change() {
		// Arrange
		let count = Signal::new(0_u32);
		let badge = Component::element("b");
		let holder = Component::group();
		holder.append_child(&badge).unwrap();
		let shown = badge.clone();
		let (container, root) = mounted(
			Match::new(count.clone())
				.when(|count| *count > 0, move || shown.clone())
				.otherwise(|| "none")
				.into_component(),
		);

		// Act
		count.set(1);
		root.update();
		let while_attached = container.inner_html();
		holder.remove_child(&badge).unwrap();
		count.set(2);
		root.update();

		// Assert
		assert_eq!(while_attached, "none");
		assert_eq!(container.inner_html(), "<b></b>");
		assert!(root.take_unhandled_error().is_some());
	}
}
