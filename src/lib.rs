//! # Reinhardt UI
//!
//! A fine-grained reactive UI runtime.
//!
//! State lives in [`Signal`]s and [`Computed`] values. The UI is a retained
//! tree of [`Component`]s rendering into host [`Node`]s; each component
//! re-reads only the values it watches during an update pass, so a change
//! touches just the nodes that depend on it.
//!
//! ## Crates
//!
//! - [`utils`] - `ThinVec` and the Levenshtein edit-script reconciler
//! - [`reactive`] - signals, computed values, effects and batching
//! - [`dom`] - the in-memory host node tree
//! - [`components`] - the component tree, lifecycle, boundaries and control
//!   flow
//!
//! ## Feature Flags
//!
//! - `serde` (default) - deserialize [`RuntimeConfig`] from configuration
//!   files
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_ui::prelude::*;
//!
//! let count = Signal::new(0);
//!
//! let button = Component::element("button");
//! button
//! 	.set_attribute(
//! 		"onclick",
//! 		AttrInput::handler({
//! 			let count = count.clone();
//! 			move |_| {
//! 				count.update(|n| *n += 1);
//! 				Ok(())
//! 			}
//! 		}),
//! 	)
//! 	.unwrap();
//! button
//! 	.append_fragment(Fragment::reactive({
//! 		let count = count.clone();
//! 		move || format!("clicked {} times", count.get())
//! 	}))
//! 	.unwrap();
//!
//! let container = Node::element("main");
//! let _root = button.attach_to(&container).unwrap();
//!
//! button.node().unwrap().dispatch_event(&Event::new("click"));
//! assert_eq!(container.inner_html(), "<button>clicked 1 times</button>");
//! ```

pub mod components;
pub mod dom;
pub mod reactive;
pub mod utils;

pub use components::{
	AttrInput, AttrValue, Component, Context, ErrorBoundary, For, Fragment, If, IntoComponent,
	Lazy, Match, Repeat, Suspense, TreeError, UiError, UpdateFlow, Watchable,
};
pub use dom::{Event, Node};
pub use reactive::{Computed, Effect, RuntimeConfig, Signal, batch_effects, untrack};

/// Everything an application usually needs, in one import.
pub mod prelude {
	pub use crate::components::{
		AttrInput, AttrValue, Component, Context, ErrorBoundary, For, Fragment, If, IntoComponent,
		Lazy, Match, Repeat, ResetHandle, Suspense, TreeError, TreeResult, UiError, UiResult,
		UpdateFlow, Watchable, set_local_spawner, set_spawner,
	};
	pub use crate::dom::{Event, Node};
	pub use crate::reactive::{Computed, Effect, Signal, batch_effects, untrack};
}
