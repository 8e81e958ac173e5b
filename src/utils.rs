//! Small containers and the edit-script reconciler

pub use reinhardt_ui_utils::*;
