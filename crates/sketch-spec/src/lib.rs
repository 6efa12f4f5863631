//! DesignSpec data model and structural validator for Sketch.
//!
//! The types here are the wire contract consumed by the design-tool plugin:
//! a page, one root frame, and a tree of text/button/container nodes.

pub mod context;
pub mod spec;
pub mod validate;
pub mod warning;

pub use context::*;
pub use spec::*;
pub use validate::*;
pub use warning::*;
