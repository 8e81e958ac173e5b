//! Retained component tree for the Reinhardt UI runtime.
//!
//! A [`Component`] wraps an optional host [`Node`](reinhardt_dom::Node) and
//! keeps an ordered list of children. Components are mounted into a host
//! tree, updated by explicit update passes, and unmounted when removed.
//! On top of the tree this crate provides:
//!
//! - [`Fragment`]: what render functions return, flattened into components;
//! - [`Watchable`] and [`Component::add_value_watcher`]: constant, reactive
//!   and asynchronous values;
//! - [`Component::set_attributes`]: attribute, property, style and event
//!   binding;
//! - [`Context`]: values scoped to a subtree;
//! - error propagation through [`Component::inject_error`] and suspense
//!   counting through [`Component::adjust_suspense`];
//! - the control flow combinators in [`flow`].
//!
//! Async work runs on a spawner the application installs with
//! [`set_spawner`] or [`set_local_spawner`].
//!
//! ## Example
//!
//! ```
//! use reinhardt_components::{Component, For, Fragment, If, IntoComponent};
//! use reinhardt_dom::Node;
//! use reinhardt_reactive::Signal;
//!
//! let items = Signal::new(vec!["milk", "eggs"]);
//! let show = Signal::new(true);
//!
//! let list = Component::element("ul");
//! list.append_fragment(For::new(items.clone(), |item| {
//! 	let li = Component::element("li");
//! 	li.append_fragment(*item).unwrap();
//! 	li
//! }))
//! .unwrap();
//!
//! let app = Component::group();
//! app.append_fragment(vec![
//! 	Fragment::from(If::new(show.clone(), || "Shopping list")),
//! 	Fragment::from(list),
//! ])
//! .unwrap();
//!
//! let container = Node::element("main");
//! let root = app.attach_to(&container).unwrap();
//! assert_eq!(
//! 	container.inner_html(),
//! 	"Shopping list<ul><li>milk</li><li>eggs</li></ul>"
//! );
//!
//! items.update(|items| items.push("bread"));
//! show.set(false);
//! root.update();
//! assert_eq!(
//! 	container.inner_html(),
//! 	"<ul><li>milk</li><li>eggs</li><li>bread</li></ul>"
//! );
//! ```

pub mod attributes;
pub mod component;
pub mod context;
pub mod error;
pub mod executor;
pub mod flow;
pub mod fragment;
pub mod watch;

pub use attributes::{AttrInput, AttrValue, EventHandler};
pub use component::{
	Component, ErrorHandler, Listener, SuspenseHandler, UpdateFlow, UpdateListener, WeakComponent,
};
pub use context::Context;
pub use error::{TreeError, TreeResult, UiError, UiResult};
pub use executor::{clear_spawner, has_spawner, set_local_spawner, set_spawner};
pub use flow::{ErrorBoundary, For, If, Lazy, Match, Repeat, ResetHandle, Suspense};
pub use fragment::{Fragment, IntoComponent};
pub use watch::Watchable;
