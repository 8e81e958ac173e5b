//! Signals, computed values and effects
//!
//! This module re-exports `reinhardt-reactive`. Reactive values are
//! thread-local; every read inside a [`Computed`] or [`Effect`] is tracked
//! automatically, and [`batch_effects`] defers effect re-runs until the
//! outermost batch exits.

pub use reinhardt_reactive::*;
