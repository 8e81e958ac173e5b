//! In-memory host nodes the component tree renders into

pub use reinhardt_dom::*;
