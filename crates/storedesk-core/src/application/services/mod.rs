//! Application services
//!
//! Use cases that orchestrate domain operations and provide the public API.

pub mod search_global;

pub use search_global::{SearchGlobalUseCase, SearchSettings};
