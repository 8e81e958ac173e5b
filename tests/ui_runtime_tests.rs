//! End-to-end tests through the `reinhardt_ui` facade
//!
//! These tests verify:
//! 1. Keyed lists reconcile with the minimal edit script and keep identity
//! 2. Batched writes re-run effects once and the tree shows the final state
//! 3. Error boundaries recover through their reset handle
//! 4. Async content resolves into place under a suspense boundary

use futures::channel::oneshot;
use futures::executor::LocalPool;
use reinhardt_ui::components::{ResetHandle, clear_spawner};
use reinhardt_ui::prelude::*;
use reinhardt_ui::utils::levenshtein_distance;
use rstest::rstest;
use serial_test::serial;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[rstest]
#[serial]
fn test_keyed_list_follows_edit_script() {
	// Arrange
	let letters = Signal::new("abcdefgh".chars().collect::<Vec<_>>());
	let list = For::new(letters.clone(), |letter: &char| letter.to_string()).into_component();
	let container = Node::element("p");
	let root = list.attach_to(&container).unwrap();
	let before = list.children();

	// Act
	letters.set("bCdDefh".chars().collect());
	root.update();

	// Assert
	let after = list.children();
	assert_eq!(container.inner_html(), "bCdDefh");
	for (new_index, old_index) in [(0, 1), (2, 3), (4, 4), (5, 5), (6, 7)] {
		assert_eq!(after[new_index], before[old_index]);
	}
	let old: Vec<char> = "abcdefgh".chars().collect();
	let new: Vec<char> = "bCdDefh".chars().collect();
	assert_eq!(levenshtein_distance(&old, &new, |a, b| a == b), 4);
}

/// Two writes in one batch produce one effect run and one rendered total
#[rstest]
#[serial]
fn test_batched_writes_render_final_total() {
	// Arrange
	let price = Signal::new(3_u32);
	let quantity = Signal::new(2_u32);
	let total = Computed::new({
		let (price, quantity) = (price.clone(), quantity.clone());
		move || price.get() * quantity.get()
	});
	let effect_runs = Rc::new(Cell::new(0));
	let _effect = Effect::new({
		let (total, effect_runs) = (total.clone(), effect_runs.clone());
		move || {
			let _ = total.get();
			effect_runs.set(effect_runs.get() + 1);
		}
	});
	let label = Component::element("span");
	label.append_fragment(total.clone()).unwrap();
	let container = Node::element("div");
	let root = label.attach_to(&container).unwrap();

	// Act
	batch_effects(|| {
		price.set(5);
		quantity.set(4);
	});
	root.update();

	// Assert
	assert_eq!(effect_runs.get(), 2);
	assert_eq!(container.inner_html(), "<span>20</span>");
}

#[rstest]
#[serial]
fn test_boundary_recovers_after_reset() {
	// Arrange
	let healthy = Signal::new(false);
	let reset_slot: Rc<RefCell<Option<ResetHandle>>> = Rc::default();
	let boundary = ErrorBoundary::new(
		{
			let healthy = healthy.clone();
			move || {
				let panel = Component::element("section");
				panel.append_fragment("ready").unwrap();
				let healthy = healthy.clone();
				panel.on_mount(move |_| {
					if healthy.get() {
						Ok(())
					} else {
						Err(UiError::message("not ready"))
					}
				});
				panel
			}
		},
		{
			let reset_slot = reset_slot.clone();
			move |error: &UiError, reset: ResetHandle| {
				*reset_slot.borrow_mut() = Some(reset);
				format!("failed: {error}")
			}
		},
	)
	.into_component();
	let container = Node::element("main");
	let _root = boundary.attach_to(&container).unwrap();
	let failed = container.inner_html();

	// Act
	healthy.set(true);
	let reset = reset_slot.borrow_mut().take().unwrap();
	reset.reset();

	// Assert
	assert_eq!(failed, "failed: not ready");
	assert_eq!(container.inner_html(), "<section>ready</section>");
}

#[rstest]
#[serial]
fn test_async_content_replaces_fallback() {
	// Arrange
	let mut pool = LocalPool::new();
	set_local_spawner(pool.spawner());
	let (sender, receiver) = oneshot::channel::<Vec<&'static str>>();
	let page = Lazy::future(move || async move {
		let names = receiver.await.unwrap_or_default();
		For::new(names, |name: &&'static str| {
			let item = Component::element("li");
			item.append_fragment(*name).unwrap();
			item
		})
	});
	let list = Component::element("ul");
	list.append_fragment(Suspense::new("loading", page)).unwrap();
	let container = Node::element("div");
	let _root = list.attach_to(&container).unwrap();

	// Act
	pool.run_until_stalled();
	let pending = container.inner_html();
	sender.send(vec!["ada", "grace"]).unwrap();
	pool.run_until_stalled();

	// Assert
	assert_eq!(pending, "<ul>loading</ul>");
	assert_eq!(container.inner_html(), "<ul><li>ada</li><li>grace</li></ul>");
	clear_spawner();
}
