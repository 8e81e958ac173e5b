//! Splicing of host nodes.
//!
//! The logical tree and the host tree diverge wherever a group component
//! sits in between: a group's descendants are placed directly into the
//! nearest ancestor owning a host node. The functions here locate that host
//! and the anchor node a component's nodes go in front of.

use reinhardt_dom::Node;

use super::Component;
use crate::error::TreeResult;

impl Component {
	/// Host node this component's nodes are placed into, if it is currently
	/// placed anywhere.
	pub(crate) fn host_node(&self) -> Option<Node> {
		if self.is_detached() {
			return None;
		}
		let mut current = self.parent();
		while let Some(component) = current {
			if let Some(node) = component.node() {
				return Some(node.clone());
			}
			if component.is_detached() {
				return None;
			}
			current = component.parent();
		}
		None
	}

	/// Top-level host nodes of this component: its own node, or for a group
	/// the nodes of its attached descendants in order.
	pub fn native_nodes(&self) -> Vec<Node> {
		let mut nodes = Vec::new();
		self.collect_native_nodes(&mut nodes);
		nodes
	}

	fn collect_native_nodes(&self, nodes: &mut Vec<Node>) {
		if let Some(node) = self.node() {
			nodes.push(node.clone());
			return;
		}
		let mut current = self.first_child();
		while let Some(child) = current {
			if !child.is_detached() {
				child.collect_native_nodes(nodes);
			}
			current = child.next_sibling();
		}
	}

	/// First node of this subtree already placed in `host`.
	fn first_native_node_in(&self, host: &Node) -> Option<Node> {
		if let Some(node) = self.node() {
			return (node.parent_node().as_ref() == Some(host)).then(|| node.clone());
		}
		let mut current = self.first_child();
		while let Some(child) = current {
			if !child.is_detached() {
				if let Some(node) = child.first_native_node_in(host) {
					return Some(node);
				}
			}
			current = child.next_sibling();
		}
		None
	}

	/// Node in `host` that this component's nodes must precede, walking
	/// forward through siblings and up through group ancestors.
	fn following_native_node(&self, host: &Node) -> Option<Node> {
		let mut current = self.clone();
		loop {
			let mut sibling = current.next_sibling();
			while let Some(component) = sibling {
				if !component.is_detached() {
					if let Some(node) = component.first_native_node_in(host) {
						return Some(node);
					}
				}
				sibling = component.next_sibling();
			}
			let parent = current.parent()?;
			if parent.node().is_some() {
				return None;
			}
			current = parent;
		}
	}

	/// Inserts this component's nodes into its host at the right position.
	pub(crate) fn attach_native(&self) -> TreeResult<()> {
		let Some(host) = self.host_node() else {
			return Ok(());
		};
		let anchor = self.following_native_node(&host);
		for node in self.native_nodes() {
			host.insert_before(&node, anchor.as_ref())?;
		}
		Ok(())
	}

	/// Takes this component's nodes out of whatever host holds them.
	pub(crate) fn detach_native(&self) -> TreeResult<()> {
		for node in self.native_nodes() {
			if let Some(parent) = node.parent_node() {
				parent.remove_child(&node)?;
			}
		}
		Ok(())
	}

	/// Holds this component's nodes out of the host tree, or puts them back,
	/// without changing the logical tree or the mounted state.
	pub fn set_detached(&self, detached: bool) -> TreeResult<()> {
		if self.is_detached() == detached {
			return Ok(());
		}
		if detached {
			self.detach_native()?;
			self.inner.detached.set(true);
			Ok(())
		} else {
			self.inner.detached.set(false);
			self.attach_native()
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn text(value: &str) -> Component {
		Component::text(value)
	}

	#[rstest]
	fn test_group_children_are_spliced_into_host() {
		// Arrange
		let container = Component::element("div");
		let group = Component::group();
		container.append_child(&text("a")).unwrap();
		container.append_child(&group).unwrap();
		container.append_child(&text("d")).unwrap();

		// Act
		group.append_child(&text("b")).unwrap();
		group.append_child(&text("c")).unwrap();

		// Assert
		let div = container.node().unwrap();
		assert_eq!(div.inner_html(), "abcd");
		assert_eq!(group.native_nodes().len(), 2);
	}

	#[rstest]
	fn test_nested_groups_find_anchor_past_empty_siblings() {
		let container = Component::element("ul");
		let outer = Component::group();
		let inner = Component::group();
		let empty = Component::group();
		container.append_child(&outer).unwrap();
		outer.append_child(&inner).unwrap();
		outer.append_child(&empty).unwrap();
		container.append_child(&text("z")).unwrap();

		inner.append_child(&text("a")).unwrap();

		assert_eq!(container.node().unwrap().inner_html(), "az");
	}

	#[rstest]
	fn test_detach_hides_nodes_and_reattach_restores_order() {
		let container = Component::element("div");
		let group = Component::group();
		container.append_child(&text("a")).unwrap();
		container.append_child(&group).unwrap();
		container.append_child(&text("c")).unwrap();
		group.append_child(&text("b")).unwrap();
		let div = container.node().unwrap().clone();

		group.set_detached(true).unwrap();
		assert_eq!(div.inner_html(), "ac");

		group.append_child(&text("b2")).unwrap();
		assert_eq!(div.inner_html(), "ac");

		group.set_detached(false).unwrap();
		assert_eq!(div.inner_html(), "abb2c");
	}

	#[rstest]
	fn test_detached_sibling_is_not_used_as_anchor() {
		let container = Component::element("div");
		let first = Component::group();
		let hidden = text("hidden");
		container.append_child(&first).unwrap();
		container.append_child(&hidden).unwrap();
		hidden.set_detached(true).unwrap();

		first.append_child(&text("x")).unwrap();

		assert_eq!(container.node().unwrap().inner_html(), "x");
	}

	#[rstest]
	fn test_remove_child_takes_nodes_out() {
		let container = Component::element("div");
		let group = Component::group();
		container.append_child(&group).unwrap();
		group.append_child(&text("a")).unwrap();
		group.append_child(&text("b")).unwrap();

		container.remove_child(&group).unwrap();

		assert_eq!(container.node().unwrap().inner_html(), "");
		assert!(group.native_nodes().iter().all(|node| node.parent_node().is_none()));
	}
}
