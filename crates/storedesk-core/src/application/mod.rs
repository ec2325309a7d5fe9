//! Application service layer
//!
//! This layer validates requests, orchestrates domain operations,
//! and provides the public API for the core functionality.

pub mod errors;
pub mod services;
pub mod validators;

pub use errors::{AppResult, ApplicationError};
pub use services::{SearchGlobalUseCase, SearchSettings};
pub use validators::SearchValidator;
