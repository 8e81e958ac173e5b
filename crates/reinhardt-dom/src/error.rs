//! Error types for host node operations.

use thiserror::Error;

/// Errors raised by structural operations on [`Node`](crate::Node).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
	/// The reference node passed to `insert_before` or `remove_child` is not
	/// a child of the target.
	#[error("Node is not a child of <{parent}>")]
	NotAChild {
		/// Tag or kind of the parent the operation was invoked on.
		parent: String,
	},

	/// Inserting the node would create a cycle.
	#[error("Hierarchy request error: a node cannot be inserted into itself or its descendant")]
	HierarchyRequest,

	/// Text and comment nodes cannot have children.
	#[error("{0} nodes cannot contain children")]
	NotAContainer(&'static str),
}

/// Result alias for host node operations.
pub type DomResult<T> = Result<T, DomError>;
