//! Chat-completion client for the generation backend.
//!
//! The backend sits behind the [`CompletionBackend`] trait so the retry and
//! timeout policy in [`retry`] is testable against scripted fakes, without a
//! live network dependency.

pub mod backend;
pub mod errors;
pub mod retry;
pub mod types;

pub use backend::*;
pub use errors::*;
pub use retry::*;
pub use types::*;
