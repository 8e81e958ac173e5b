//! Retained component tree and control flow
//!
//! This module re-exports `reinhardt-components`: the [`Component`] tree
//! with its lifecycle, attribute binding, context, error boundaries,
//! suspense and the keyed [`For`] list.

pub use reinhardt_components::*;
