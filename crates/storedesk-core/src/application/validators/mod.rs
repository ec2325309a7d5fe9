//! Application validators
//!
//! Input validation for application operations.

pub mod search_validator;

pub use search_validator::SearchValidator;
