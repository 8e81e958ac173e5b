//! Structural operations: insertion, removal and child reconciliation.

use std::collections::HashSet;
use std::rc::{Rc, Weak};

use reinhardt_ui_utils::{EditOperation, calc_levenshtein_operations};

use super::{Component, Listener};
use crate::error::{TreeError, TreeResult};

impl Component {
	/// Inserts `child` before `before`, or appends it when `before` is `None`.
	///
	/// The child must be detached from any parent. If `self` is mounted the
	/// child is mounted and receives an update pass before its host nodes
	/// are spliced in; its `mounted` listeners run last. An error the child
	/// could not handle while it had no parent is re-raised here.
	pub fn insert_before(&self, child: &Component, before: Option<&Component>) -> TreeResult<()> {
		if child == self {
			return Err(TreeError::SelfInsertion);
		}
		if child.parent().is_some() {
			return Err(TreeError::AlreadyAttached);
		}
		if child.is_ancestor_of(self) {
			return Err(TreeError::AncestorInsertion);
		}
		if let Some(before) = before {
			if before.parent().as_ref() != Some(self) {
				return Err(TreeError::NotAChild);
			}
		}

		self.link_child(child, before);

		let update_total = child.inner.update_total.get();
		if update_total > 0 {
			self.propagate_update_total(update_total as isize);
		}
		if child.contributes_suspense() {
			let pending = child.suspense_count();
			if pending > 0 {
				self.adjust_suspense(pending as isize);
			}
		}

		let mut mounted: Vec<(Component, Listener)> = Vec::new();
		if self.is_mounted() && !child.is_mounted() {
			child.mount_subtree(&mut mounted);
			child.update();
		}

		// Listeners above may already have moved the child elsewhere.
		if child.parent().as_ref() == Some(self) {
			child.attach_native()?;
		}

		for (component, listener) in mounted {
			if component.is_mounted() {
				component.invoke(&listener);
			}
		}

		if let Some(error) = child.take_unhandled_error() {
			self.inject_error(error);
		}
		Ok(())
	}

	/// Appends `child` as the last child.
	pub fn append_child(&self, child: &Component) -> TreeResult<()> {
		self.insert_before(child, None)
	}

	/// Removes `child`, unmounting it first if it is mounted.
	///
	/// Unmount listeners may remove the child themselves; that is not an
	/// error.
	pub fn remove_child(&self, child: &Component) -> TreeResult<()> {
		if child.parent().as_ref() != Some(self) {
			return Err(TreeError::NotAChild);
		}
		if child.is_mounted() {
			child.unmount();
			if child.parent().as_ref() != Some(self) {
				return Ok(());
			}
		}

		if !child.is_detached() {
			child.detach_native()?;
		}

		let pending = if child.contributes_suspense() {
			child.suspense_count()
		} else {
			0
		};
		let update_total = child.inner.update_total.get();
		if pending > 0 {
			self.adjust_suspense(-(pending as isize));
		}
		if update_total > 0 {
			self.propagate_update_total(-(update_total as isize));
		}

		self.unlink_child(child);
		Ok(())
	}

	/// Puts `new` where `old` is.
	pub fn replace_child(&self, old: &Component, new: &Component) -> TreeResult<()> {
		if old.parent().as_ref() != Some(self) {
			return Err(TreeError::NotAChild);
		}
		if old == new {
			return Ok(());
		}
		self.insert_before(new, Some(old))?;
		self.remove_child(old)
	}

	/// Reconciles the children of `self` with `desired`.
	///
	/// Children present in both lists keep their identity and state;
	/// children no longer desired are removed and new ones inserted. Every
	/// desired component must be unattached or already a child of `self`,
	/// and may appear only once. Returns the number of edit operations
	/// applied.
	pub fn replace_children(&self, desired: Vec<Component>) -> TreeResult<usize> {
		let mut wanted: HashSet<Component> = HashSet::with_capacity(desired.len());
		for component in &desired {
			if component == self {
				return Err(TreeError::SelfInsertion);
			}
			if !wanted.insert(component.clone()) {
				return Err(TreeError::DuplicateChild);
			}
			match component.parent() {
				Some(parent) if parent != *self => return Err(TreeError::AlreadyAttached),
				Some(_) => {}
				None if component.is_ancestor_of(self) => return Err(TreeError::AncestorInsertion),
				None => {}
			}
		}

		let current = self.children();
		let operations = calc_levenshtein_operations(&current, &desired, |a, b| a == b);
		let count = operations.len();

		for operation in operations {
			match operation {
				EditOperation::Insert { item, before, .. } => {
					self.place_child(&item, before.as_ref())?;
				}
				EditOperation::Replace {
					old, new, before, ..
				} => {
					self.place_child(&new, before.as_ref())?;
					// `old` may still be wanted further along; it is then
					// moved when its own operation is reached.
					if !wanted.contains(&old) && old.parent().as_ref() == Some(self) {
						self.remove_child(&old)?;
					}
				}
				EditOperation::Remove { item, .. } => {
					if !wanted.contains(&item) && item.parent().as_ref() == Some(self) {
						self.remove_child(&item)?;
					}
				}
			}
		}

		if count > 0 {
			tracing::trace!(
				component = %self.debug_name(),
				operations = count,
				"reconciled children"
			);
		}
		Ok(count)
	}

	/// Whether the children of `self` are exactly `desired`, in order.
	pub fn children_match(&self, desired: &[Component]) -> bool {
		let mut current = self.first_child();
		for expected in desired {
			match current {
				Some(child) if child == *expected => current = child.next_sibling(),
				_ => return false,
			}
		}
		current.is_none()
	}

	/// Moves or inserts `item` so it sits directly before `before`.
	fn place_child(&self, item: &Component, before: Option<&Component>) -> TreeResult<()> {
		if item.parent().as_ref() == Some(self) {
			if item.next_sibling().as_ref() == before {
				return Ok(());
			}
			self.remove_child(item)?;
		}
		self.insert_before(item, before)
	}

	fn link_child(&self, child: &Component, before: Option<&Component>) {
		let child_weak = Rc::downgrade(&child.inner);
		{
			let mut links = child.inner.links.borrow_mut();
			links.parent = Rc::downgrade(&self.inner);
		}

		match before {
			Some(before) => {
				let prev = before.inner.links.borrow().prev_sibling.clone();
				{
					let mut links = child.inner.links.borrow_mut();
					links.prev_sibling = prev.clone();
					links.next_sibling = Some(before.clone());
				}
				before.inner.links.borrow_mut().prev_sibling = child_weak;
				match prev.upgrade() {
					Some(prev) => prev.links.borrow_mut().next_sibling = Some(child.clone()),
					None => self.inner.links.borrow_mut().first_child = Some(child.clone()),
				}
			}
			None => {
				let last = self.inner.links.borrow().last_child.clone();
				{
					let mut links = child.inner.links.borrow_mut();
					links.prev_sibling = last.clone();
					links.next_sibling = None;
				}
				match last.upgrade() {
					Some(last) => last.links.borrow_mut().next_sibling = Some(child.clone()),
					None => self.inner.links.borrow_mut().first_child = Some(child.clone()),
				}
				self.inner.links.borrow_mut().last_child = child_weak;
			}
		}
	}

	fn unlink_child(&self, child: &Component) {
		let (prev, next) = {
			let mut links = child.inner.links.borrow_mut();
			links.parent = Weak::new();
			(
				std::mem::take(&mut links.prev_sibling),
				links.next_sibling.take(),
			)
		};

		match &next {
			Some(next) => next.inner.links.borrow_mut().prev_sibling = prev.clone(),
			None => self.inner.links.borrow_mut().last_child = prev.clone(),
		}
		match prev.upgrade() {
			Some(prev) => prev.links.borrow_mut().next_sibling = next,
			None => self.inner.links.borrow_mut().first_child = next,
		}
	}
}
