//! Repair and normalization passes.
//!
//! Three pure tree-rewriting passes applied in fixed order after schema
//! validation: empty-text repair, visual-default filling, then the
//! layout/surface classifier. Classification runs last because it reads
//! attributes the defaults pass may have just filled in; its warnings are
//! diagnostic only and never mutate the spec.

pub mod classify;
pub mod defaults;
pub mod text;

pub use classify::*;
pub use defaults::*;
pub use text::*;
