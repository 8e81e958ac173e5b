//! Mount, unmount and update traversals.
//!
//! All three traversals re-check the mounted flag after every listener:
//! a listener may tear the tree down, and the walk stops rather than touch
//! a subtree that has already left the mounted tree.

use reinhardt_dom::Node;

use super::{Component, Listener, UpdateFlow};
use crate::error::TreeResult;

impl Component {
	/// Mounts this component and its subtree, runs the initial update pass,
	/// then fires the collected `mounted` listeners.
	pub fn mount(&self) {
		if self.is_mounted() {
			return;
		}
		let mut mounted = Vec::new();
		self.mount_subtree(&mut mounted);
		self.update();
		for (component, listener) in mounted {
			if component.is_mounted() {
				component.invoke(&listener);
			}
		}
	}

	/// Marks the subtree mounted, parents before children, collecting the
	/// `mounted` listeners to fire once host nodes are in place.
	pub(crate) fn mount_subtree(&self, mounted: &mut Vec<(Component, Listener)>) {
		if self.is_mounted() {
			return;
		}
		self.inner.mounted.set(true);
		if let Some(name) = self.name() {
			tracing::debug!(component = name, "mounting");
		}

		let listeners = self.inner.listeners.borrow().mount.to_vec();
		for listener in &listeners {
			self.invoke(listener);
			if !self.is_mounted() {
				return;
			}
		}
		mounted.extend(
			self.inner
				.listeners
				.borrow()
				.mounted
				.iter()
				.map(|listener| (self.clone(), listener.clone())),
		);

		let mut current = self.first_child();
		while let Some(child) = current {
			child.mount_subtree(mounted);
			if !self.is_mounted() {
				return;
			}
			// A listener removed the child: restart, mounted children are
			// skipped.
			current = if child.parent().as_ref() == Some(self) {
				child.next_sibling()
			} else {
				self.first_child()
			};
		}
	}

	/// Unmounts this component and its subtree, parents before children.
	///
	/// The mounted flag is cleared before the component's own unmount
	/// listeners run.
	pub fn unmount(&self) {
		if !self.is_mounted() {
			return;
		}
		self.inner.mounted.set(false);
		if let Some(name) = self.name() {
			tracing::debug!(component = name, "unmounting");
		}

		let listeners = self.inner.listeners.borrow().unmount.to_vec();
		for listener in &listeners {
			self.invoke(listener);
			if self.is_mounted() {
				return;
			}
		}

		let mut current = self.first_child();
		while let Some(child) = current {
			child.unmount();
			if self.is_mounted() {
				return;
			}
			current = if child.parent().as_ref() == Some(self) {
				child.next_sibling()
			} else {
				self.first_child()
			};
		}
	}

	/// Runs an update pass over the mounted subtree.
	///
	/// Subtrees without update listeners are not visited. A listener
	/// returning [`UpdateFlow::SkipChildren`] keeps the pass out of this
	/// component's children.
	pub fn update(&self) {
		if !self.is_mounted() || self.inner.update_total.get() == 0 {
			return;
		}

		let listeners = self.inner.listeners.borrow().update.to_vec();
		let mut flow = UpdateFlow::Continue;
		for listener in &listeners {
			match listener(self) {
				Ok(UpdateFlow::SkipChildren) => flow = UpdateFlow::SkipChildren,
				Ok(UpdateFlow::Continue) => {}
				Err(error) => self.inject_error(error),
			}
			if !self.is_mounted() {
				return;
			}
		}
		if flow == UpdateFlow::SkipChildren {
			return;
		}

		let mut current = self.first_child();
		while let Some(child) = current {
			let following = child.next_sibling();
			child.update();
			if !self.is_mounted() {
				return;
			}
			current = if child.parent().as_ref() == Some(self) {
				child.next_sibling()
			} else {
				// The child left during its own pass: resume at the sibling
				// that followed it, if that one is still ours.
				following.filter(|next| next.parent().as_ref() == Some(self))
			};
		}
	}

	/// Mounts this component into `container`.
	///
	/// Returns the root component wrapping the container; drop it to let the
	/// tree go, or call [`unmount`](Component::unmount) on it first to run
	/// unmount listeners.
	pub fn attach_to(&self, container: &Node) -> TreeResult<Component> {
		let root = Component::named(Some(container.clone()), "root");
		root.mount();
		root.append_child(self)?;
		Ok(root)
	}
}
