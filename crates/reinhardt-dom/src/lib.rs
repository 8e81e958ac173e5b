//! In-memory host node tree.
//!
//! The component tree in `reinhardt-components` renders into host nodes:
//! elements, text and comments with attributes, element properties, inline
//! style and event listeners. This crate provides a single-threaded
//! in-memory implementation with DOM-like structural semantics:
//!
//! - inserting a node that already has a parent moves it;
//! - inserting before a node that is not a child is an error;
//! - cycles are rejected.
//!
//! Nodes serialize to HTML with [`Node::outer_html`], which is how tests and
//! server-side rendering observe the result.
//!
//! ## Example
//!
//! ```
//! use reinhardt_dom::Node;
//!
//! let list = Node::element("ul");
//! let item = Node::element("li");
//! item.append_child(&Node::text("first")).unwrap();
//! list.append_child(&item).unwrap();
//!
//! assert_eq!(list.outer_html(), "<ul><li>first</li></ul>");
//! ```

pub mod error;
pub mod event;
mod html;
pub mod node;

pub use error::{DomError, DomResult};
pub use event::{Event, EventListener};
pub use node::{Node, NodeKind, PropertyValue};
