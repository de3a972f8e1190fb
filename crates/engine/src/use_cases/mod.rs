//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area.
//! Use cases orchestrate across ports to fulfill user stories.

pub mod generation;
pub mod prompt;

// Re-export main types
pub use generation::GenerationUseCases;
pub use prompt::{ComposePrompt, ComposeRequest};
