//! Core types, field specifications, and error handling.

pub mod error;
pub mod field;
pub mod input;
pub mod types;
