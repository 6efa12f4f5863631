//! Rule documents, rule selection, and directive assembly for Sketch.
//!
//! Rule documents are static JSON resources keyed by filename under a rules
//! directory. The loader reads them once per process, the assembler folds
//! the selected subset plus per-request options into one directive string.

pub mod assemble;
pub mod docs;
pub mod loader;

pub use assemble::*;
pub use docs::*;
pub use loader::*;
