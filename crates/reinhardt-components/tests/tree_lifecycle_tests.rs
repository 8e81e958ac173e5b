//! Integration tests for the component tree
//!
//! These tests verify:
//! 1. Mount and unmount listeners run parents first, with the right flag
//! 2. Host nodes follow the component order through arbitrary reorders
//! 3. Update passes only visit subtrees with update listeners
//! 4. Context values are scoped to the providing subtree

use proptest::prelude::*;
use reinhardt_components::{Component, Context, TreeError, UiError, UpdateFlow};
use reinhardt_dom::Node;
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn traced(name: &'static str, log: &Log) -> Component {
	let component = Component::group_named(name);
	let (mount, mounted, unmount) = (log.clone(), log.clone(), log.clone());
	component
		.on_mount(move |_| {
			mount.borrow_mut().push(format!("mount {name}"));
			Ok(())
		})
		.on_mounted(move |_| {
			mounted.borrow_mut().push(format!("mounted {name}"));
			Ok(())
		})
		.on_unmount(move |_| {
			unmount.borrow_mut().push(format!("unmount {name}"));
			Ok(())
		});
	component
}

fn text_children(labels: &[usize]) -> Vec<Component> {
	labels
		.iter()
		.map(|label| Component::text(label.to_string()))
		.collect()
}

/// Attaching a subtree mounts it top-down, then fires `mounted` listeners
#[rstest]
fn test_attach_runs_full_lifecycle_in_order() {
	// Arrange
	let log: Log = Rc::default();
	let app = traced("app", &log);
	let header = traced("header", &log);
	let body = traced("body", &log);
	app.append_child(&header).unwrap();
	app.append_child(&body).unwrap();
	let container = Node::element("main");

	// Act
	let root = app.attach_to(&container).unwrap();
	root.unmount();

	// Assert
	assert_eq!(
		*log.borrow(),
		[
			"mount app",
			"mount header",
			"mount body",
			"mounted app",
			"mounted header",
			"mounted body",
			"unmount app",
			"unmount header",
			"unmount body",
		]
	);
	assert!(!body.is_mounted());
}

/// A child moved between mounted parents is unmounted, then mounted again
#[rstest]
fn test_moving_child_between_parents_remounts_it() {
	// Arrange
	let log: Log = Rc::default();
	let left = Component::element("section");
	let right = Component::element("aside");
	let item = traced("item", &log);
	item.append_child(&Component::text("payload")).unwrap();
	let app = Component::group();
	app.append_child(&left).unwrap();
	app.append_child(&right).unwrap();
	left.append_child(&item).unwrap();
	let container = Node::element("div");
	let _root = app.attach_to(&container).unwrap();
	log.borrow_mut().clear();

	// Act
	left.remove_child(&item).unwrap();
	right.append_child(&item).unwrap();

	// Assert
	assert_eq!(*log.borrow(), ["unmount item", "mount item", "mounted item"]);
	assert_eq!(
		container.inner_html(),
		"<section></section><aside>payload</aside>"
	);
}

#[rstest]
fn test_structural_errors_leave_tree_untouched() {
	let parent = Component::element("ul");
	let child = Component::text("a");
	parent.append_child(&child).unwrap();
	let other = Component::element("ol");

	assert_eq!(other.append_child(&child), Err(TreeError::AlreadyAttached));
	assert_eq!(child.append_child(&parent), Err(TreeError::AncestorInsertion));
	assert_eq!(other.remove_child(&child), Err(TreeError::NotAChild));
	assert_eq!(parent.children(), [child]);
}

/// Updates reach only the listeners below subtrees that have any
#[rstest]
fn test_update_pass_visits_listener_subtrees_only() {
	// Arrange
	let visits = Rc::new(RefCell::new(Vec::new()));
	let app = Component::group_named("app");
	let quiet = Component::group_named("quiet");
	let busy = Component::group_named("busy");
	let leaf = Component::text("leaf");
	let log = visits.clone();
	leaf.on_update(move |_| {
		log.borrow_mut().push("leaf");
		Ok(UpdateFlow::Continue)
	});
	quiet.append_child(&Component::text("static")).unwrap();
	busy.append_child(&leaf).unwrap();
	app.append_child(&quiet).unwrap();
	app.append_child(&busy).unwrap();
	let container = Node::element("div");
	let root = app.attach_to(&container).unwrap();
	visits.borrow_mut().clear();

	// Act
	root.update();
	root.update();

	// Assert
	assert_eq!(*visits.borrow(), ["leaf", "leaf"]);
	assert_eq!(quiet.update_listener_total(), 0);
	assert_eq!(app.update_listener_total(), 1);
}

#[rstest]
fn test_context_is_scoped_to_provider_subtree() {
	let theme: Context<&'static str> = Context::new("theme");
	let app = Component::group();
	let themed = Component::group();
	let plain = Component::group();
	let leaf = Component::text("leaf");
	themed.provide_context(&theme, "dark");
	themed.append_child(&leaf).unwrap();
	app.append_child(&themed).unwrap();
	app.append_child(&plain).unwrap();

	assert_eq!(leaf.get_context(&theme).unwrap(), "dark");
	assert_eq!(plain.try_get_context(&theme), None);
	assert!(matches!(
		plain.get_context(&theme),
		Err(UiError::MissingContext(_))
	));
}

/// An error raised while a subtree is unattached surfaces once it is
/// attached under a handler
#[rstest]
fn test_unhandled_error_is_raised_again_on_insertion() {
	// Arrange
	let caught = Rc::new(Cell::new(0));
	let orphan = Component::group();
	orphan.inject_error(UiError::message("early"));
	let parent = Component::group();
	let counter = caught.clone();
	parent.set_error_handler(move |_, error| {
		assert_eq!(error.to_string(), "early");
		counter.set(counter.get() + 1);
		true
	});

	// Act
	parent.append_child(&orphan).unwrap();

	// Assert
	assert_eq!(caught.get(), 1);
	assert!(orphan.unhandled_error().is_none());
}

fn arrangement() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
	let pool: Vec<usize> = (0..8).collect();
	(
		proptest::sample::subsequence(pool.clone(), 0..=8).prop_shuffle(),
		proptest::sample::subsequence(pool, 0..=8).prop_shuffle(),
	)
}

proptest! {
	/// Any reorder keeps identity for shared children and host order in sync
	#[test]
	fn test_replace_children_matches_desired_order((initial, desired) in arrangement()) {
		let pool = text_children(&(0..8).collect::<Vec<_>>());
		let list = Component::element("ol");
		let container = Node::element("div");
		let root = list.attach_to(&container).unwrap();
		let pick = |labels: &[usize]| -> Vec<Component> {
			labels.iter().map(|&label| pool[label].clone()).collect()
		};
		list.replace_children(pick(&initial)).unwrap();

		list.replace_children(pick(&desired)).unwrap();

		prop_assert!(list.children_match(&pick(&desired)));
		let expected: String = desired.iter().map(|label| label.to_string()).collect();
		prop_assert_eq!(list.node().unwrap().text_content(), expected);
		for (label, component) in pool.iter().enumerate() {
			prop_assert_eq!(component.is_mounted(), desired.contains(&label));
		}
		root.unmount();
	}
}
