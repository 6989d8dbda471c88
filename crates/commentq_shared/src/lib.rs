//! Shared functionality
//!
//! Node identifiers and the error types used by every commentq crate.

pub mod errors;
pub mod node;
pub mod types;
