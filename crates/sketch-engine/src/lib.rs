//! Generation engine for Sketch.
//!
//! Wires rule selection, directive assembly, the backend call, and the
//! repair/normalization pipeline into one request-scoped flow:
//! prompt -> rules -> directive -> backend -> validate -> repair -> spec.

pub mod engine;
pub mod errors;
pub mod events;
pub mod mock;
pub mod repair;

pub use engine::*;
pub use errors::*;
pub use events::*;
pub use mock::*;
pub use repair::*;
