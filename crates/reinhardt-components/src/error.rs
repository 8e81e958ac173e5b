//! Error types for the component tree.
//!
//! [`TreeError`] covers structural misuse (inserting a component twice,
//! building a cycle, unknown attribute keys). [`UiError`] is what flows
//! through the tree at runtime: listener failures, missing contexts, failed
//! async work. It is `Clone` so a boundary can hand the same error to its
//! fallback renderer and to logs.

use std::error::Error as StdError;
use std::rc::Rc;

use reinhardt_dom::DomError;
use thiserror::Error;

/// Errors raised by structural operations on the component tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
	/// The child already has a parent.
	#[error("Component is already attached to a parent")]
	AlreadyAttached,

	/// A component was inserted into itself.
	#[error("Component cannot be inserted into itself")]
	SelfInsertion,

	/// The child is an ancestor of the target.
	#[error("Component cannot be inserted into its own descendant")]
	AncestorInsertion,

	/// The reference component is not a child of the target.
	#[error("Reference component is not a child of this component")]
	NotAChild,

	/// The same component appears twice in a desired child list.
	#[error("Component appears more than once in the child list")]
	DuplicateChild,

	/// The operation needs a host node and the component has none.
	#[error("{0} requires a component with a host node")]
	NodeRequired(&'static str),

	/// Unknown attribute key or value kind.
	#[error("Invalid attribute: {0}")]
	InvalidAttribute(String),

	/// Host node operation failed.
	#[error("Host node error: {0}")]
	Dom(#[from] DomError),
}

/// Errors propagated through the component tree at runtime.
#[derive(Debug, Clone, Error)]
pub enum UiError {
	/// Structural error raised while reacting to a change.
	#[error(transparent)]
	Tree(#[from] TreeError),

	/// A context was requested but no ancestor provides it.
	#[error("No provider for context `{0}`")]
	MissingContext(&'static str),

	/// Async work was started but no spawner is installed on this thread.
	#[error("No local executor installed; call set_spawner or set_local_spawner first")]
	NoExecutor,

	/// The installed spawner refused the task.
	#[error("Failed to spawn task: {0}")]
	Spawn(String),

	/// Application-level failure.
	#[error("{0}")]
	Message(String),

	/// Application-level failure carrying a source error.
	#[error("{0}")]
	Custom(Rc<dyn StdError>),
}

impl UiError {
	/// Creates an application error from a message.
	pub fn message(message: impl Into<String>) -> Self {
		Self::Message(message.into())
	}

	/// Wraps any error type.
	pub fn custom(error: impl StdError + 'static) -> Self {
		Self::Custom(Rc::new(error))
	}
}

impl From<DomError> for UiError {
	fn from(error: DomError) -> Self {
		Self::Tree(TreeError::Dom(error))
	}
}

/// Result alias for structural operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Result alias for listeners and other runtime callbacks.
pub type UiResult<T> = Result<T, UiError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_tree_error_is_transparent_in_ui_error() {
		let error: UiError = TreeError::DuplicateChild.into();

		assert_eq!(
			error.to_string(),
			"Component appears more than once in the child list"
		);
	}

	#[rstest]
	fn test_dom_error_converts_through_tree_error() {
		let error: UiError = DomError::HierarchyRequest.into();

		assert!(matches!(error, UiError::Tree(TreeError::Dom(_))));
	}

	#[rstest]
	fn test_custom_error_keeps_message() {
		let io = std::io::Error::other("disk on fire");

		let error = UiError::custom(io);

		assert_eq!(error.to_string(), "disk on fire");
	}
}
