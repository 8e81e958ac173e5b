//! Reactive primitives for the Reinhardt UI runtime.
//!
//! - [`Signal`]: a mutable source value.
//! - [`Computed`]: a lazily evaluated, cached derivation.
//! - [`Effect`]: a side effect re-run when what it read changes.
//! - [`batch_effects`]: coalesce many writes into one effect flush.
//!
//! All bookkeeping lives in a thread-local [`Runtime`]; reactive values are
//! `!Send` and belong to the thread that created them.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use reinhardt_reactive::{Computed, Effect, Signal, batch_effects};
//!
//! let first = Signal::new(String::from("Ada"));
//! let last = Signal::new(String::from("Lovelace"));
//! let full = Computed::new({
//! 	let (first, last) = (first.clone(), last.clone());
//! 	move || format!("{} {}", first.get(), last.get())
//! });
//!
//! let renders = Rc::new(Cell::new(0));
//! let _effect = Effect::new({
//! 	let (full, renders) = (full.clone(), renders.clone());
//! 	move || {
//! 		let _ = full.get();
//! 		renders.set(renders.get() + 1);
//! 	}
//! });
//!
//! batch_effects(|| {
//! 	first.set(String::from("Grace"));
//! 	last.set(String::from("Hopper"));
//! });
//! assert_eq!(full.get(), "Grace Hopper");
//! assert_eq!(renders.get(), 2);
//! ```

pub mod computed;
pub mod config;
pub mod effect;
pub mod runtime;
pub mod signal;

pub use computed::Computed;
pub use config::RuntimeConfig;
pub use effect::Effect;
pub use runtime::{
	NodeId, NodeType, Runtime, batch_effects, configure_runtime, runtime_config, untrack,
	with_runtime,
};
pub use signal::Signal;
