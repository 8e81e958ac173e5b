//! Utilities shared by the Reinhardt UI crates.
//!
//! - [`ThinVec`]: an append-mostly collection that does not allocate for zero
//!   or one element, used for per-component listener and context slots.
//! - [`levenshtein`]: minimal edit scripts between two sequences, used to
//!   reconcile a component's children against a desired list.

pub mod levenshtein;
pub mod thin_vec;

pub use levenshtein::{EditOperation, calc_levenshtein_operations, levenshtein_distance};
pub use thin_vec::ThinVec;
